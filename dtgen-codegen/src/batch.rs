//! Batch generation.
//!
//! A [`DescriptorRegistry`] collects the descriptors of one run and rejects
//! duplicate `(full_name, version)` pairs. [`BatchGenerator`] renders every
//! registered descriptor independently: a failing descriptor is reported and
//! the others are still generated.

use std::collections::BTreeSet;
use std::thread;

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{DescriptorError, GeneratorError};
use crate::generator::{CodeGenerator, GeneratedCode, GeneratorConfig};
use crate::ir::{ArtifactKey, CompositeRef, TypeDescriptor, Version};

// =============================================================================
// Registry
// =============================================================================

/// Descriptors of one generation run, in registration order.
#[derive(Debug, Clone, Default)]
pub struct DescriptorRegistry {
    descriptors: Vec<TypeDescriptor>,

    /// Keys declared by more than one descriptor
    duplicates: BTreeSet<ArtifactKey>,
}

impl DescriptorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor.
    ///
    /// Registering a key that is already present marks every descriptor with
    /// that key as a duplicate and returns the duplicate error. Duplicates
    /// stay in the registry so that each occurrence is reported.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<(), DescriptorError> {
        let key = descriptor.artifact_key();
        let exists = self.descriptors.iter().any(|d| d.artifact_key() == key);
        self.descriptors.push(descriptor);
        if exists {
            self.duplicates.insert(key.clone());
            return Err(duplicate_error(&key));
        }
        Ok(())
    }

    /// Get the first descriptor registered under `key`.
    pub fn get(&self, key: &ArtifactKey) -> Option<&TypeDescriptor> {
        self.descriptors.iter().find(|d| d.artifact_key() == *key)
    }

    /// Check if `key` is declared more than once.
    pub fn is_duplicate(&self, key: &ArtifactKey) -> bool {
        self.duplicates.contains(key)
    }

    /// All registered descriptors, in registration order.
    pub fn descriptors(&self) -> &[TypeDescriptor] {
        &self.descriptors
    }

    /// Number of registered descriptors, duplicates included.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Composite references that no registered descriptor satisfies.
    ///
    /// Generated artifacts that reference such a type compile only if the
    /// referenced artifact is generated elsewhere.
    pub fn unresolved_dependencies(&self) -> Vec<(ArtifactKey, CompositeRef)> {
        let known: BTreeSet<ArtifactKey> =
            self.descriptors.iter().map(TypeDescriptor::artifact_key).collect();
        let mut unresolved = Vec::new();
        for descriptor in &self.descriptors {
            for dependency in descriptor.dependencies() {
                let key = ArtifactKey {
                    full_name: dependency.full_name.clone(),
                    version: dependency.version,
                };
                if !known.contains(&key) {
                    unresolved.push((descriptor.artifact_key(), dependency));
                }
            }
        }
        unresolved
    }
}

impl FromIterator<TypeDescriptor> for DescriptorRegistry {
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        let mut registry = Self::new();
        for descriptor in iter {
            // Duplicates are recorded and reported by the batch.
            let _ = registry.register(descriptor);
        }
        registry
    }
}

fn duplicate_error(key: &ArtifactKey) -> DescriptorError {
    DescriptorError::DuplicateArtifact {
        full_name: key.full_name.clone(),
        major: key.version.major,
        minor: key.version.minor,
    }
}

// =============================================================================
// Batch generation
// =============================================================================

/// One artifact that could not be generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{key}: {error}")]
pub struct BatchFailure {
    /// Identity of the failed artifact
    pub key: ArtifactKey,

    /// Source path of the failed descriptor, when known
    pub source_path: Option<String>,

    /// Why generation failed
    pub error: GeneratorError,
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Generated artifacts, in registration order
    pub outputs: Vec<GeneratedCode>,

    /// Index files produced after the batch
    pub index: Vec<GeneratedCode>,

    /// Artifacts that were not generated
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Check if every artifact was generated.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Every produced file: artifacts followed by index files.
    pub fn files(&self) -> impl Iterator<Item = &GeneratedCode> {
        self.outputs.iter().chain(self.index.iter())
    }
}

/// Renders a registry with one generator.
pub struct BatchGenerator<'a> {
    generator: &'a dyn CodeGenerator,
    config: &'a GeneratorConfig,
    workers: usize,
}

impl<'a> BatchGenerator<'a> {
    /// Create a batch generator running on the calling thread.
    pub fn new(generator: &'a dyn CodeGenerator, config: &'a GeneratorConfig) -> Self {
        Self {
            generator,
            config,
            workers: 1,
        }
    }

    /// Set the number of worker threads. `0` is treated as `1`.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Generate every descriptor of `registry`.
    ///
    /// Outputs keep registration order regardless of the worker count.
    pub fn run(&self, registry: &DescriptorRegistry) -> BatchReport {
        for (from, dependency) in registry.unresolved_dependencies() {
            warn!(
                artifact = %from,
                dependency = %dependency.full_name,
                version = %dependency.version,
                "referenced type is not part of this batch"
            );
        }

        let descriptors = registry.descriptors();
        let results = if self.workers == 1 || descriptors.len() < 2 {
            descriptors
                .iter()
                .map(|d| self.generate_one(registry, d))
                .collect::<Vec<_>>()
        } else {
            self.run_parallel(registry, descriptors)
        };

        let mut report = BatchReport::default();
        let mut generated = Vec::new();
        for (descriptor, result) in descriptors.iter().zip(results) {
            match result {
                Ok(code) => {
                    report.outputs.push(code);
                    generated.push(descriptor);
                }
                Err(error) => {
                    warn!(artifact = %descriptor.artifact_key(), %error, "artifact skipped");
                    report.failures.push(BatchFailure {
                        key: descriptor.artifact_key(),
                        source_path: descriptor.source_path.clone(),
                        error,
                    });
                }
            }
        }

        match self.generator.generate_index(&generated, self.config) {
            Ok(index) => report.index = index,
            Err(error) => report.failures.push(BatchFailure {
                key: ArtifactKey {
                    full_name: "<index>".to_string(),
                    version: Version::new(0, 0),
                },
                source_path: None,
                error,
            }),
        }

        debug!(
            generated = report.outputs.len(),
            failed = report.failures.len(),
            index = report.index.len(),
            "batch finished"
        );
        report
    }

    fn run_parallel(
        &self,
        registry: &DescriptorRegistry,
        descriptors: &[TypeDescriptor],
    ) -> Vec<Result<GeneratedCode, GeneratorError>> {
        let chunk_size = (descriptors.len() + self.workers - 1) / self.workers;
        thread::scope(|scope| {
            let handles: Vec<_> = descriptors
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|d| self.generate_one(registry, d))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            let mut results = Vec::with_capacity(descriptors.len());
            for (handle, chunk) in handles.into_iter().zip(descriptors.chunks(chunk_size)) {
                match handle.join() {
                    Ok(chunk_results) => results.extend(chunk_results),
                    Err(_) => results.extend(chunk.iter().map(|d| {
                        Err(GeneratorError::Unsupported {
                            generator: self.generator.id(),
                            what: format!("'{}' (generator panicked)", d.artifact_key()),
                        })
                    })),
                }
            }
            results
        })
    }

    fn generate_one(
        &self,
        registry: &DescriptorRegistry,
        descriptor: &TypeDescriptor,
    ) -> Result<GeneratedCode, GeneratorError> {
        let key = descriptor.artifact_key();
        if registry.is_duplicate(&key) {
            return Err(duplicate_error(&key).into());
        }
        self.generator.generate(descriptor, self.config)
    }
}
