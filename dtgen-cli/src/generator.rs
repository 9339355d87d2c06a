//! Project-level generation.
//!
//! Binds a [`Config`] to one `dtgen-codegen` backend and runs the batch,
//! support-library and option-check operations the commands need.

use std::num::NonZeroUsize;

use dtgen_codegen::generator::{assertions_for, check_compatibility, generator_for, ProvenanceMode};
use dtgen_codegen::ir::LanguageOptions;
use dtgen_codegen::{
    BatchGenerator, BatchReport, CodeGenerator, DescriptorRegistry, GeneratedCode,
    GeneratorConfig, OptionMismatchError,
};
use tracing::debug;

use crate::config::Config;
use crate::error::CliResult;

/// Generator for one project configuration.
pub struct ProjectGenerator {
    generator: Box<dyn CodeGenerator>,
    generator_config: GeneratorConfig,
    support: LanguageOptions,
    workers: usize,
}

impl ProjectGenerator {
    /// Create a generator for the configured target language.
    pub fn new(config: &Config) -> CliResult<Self> {
        let generator = generator_for(&config.output.language)?;
        let workers = match config.generation.workers {
            0 => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            n => n,
        };
        debug!(generator = generator.id(), workers, "project generator ready");
        Ok(Self {
            generator,
            generator_config: config.generator_config()?,
            support: config.support.clone(),
            workers,
        })
    }

    /// The backend in use.
    pub fn backend(&self) -> &dyn CodeGenerator {
        self.generator.as_ref()
    }

    /// Effective generator configuration.
    pub fn generator_config(&self) -> &GeneratorConfig {
        &self.generator_config
    }

    /// Generate every descriptor of `registry`.
    pub fn generate(&self, registry: &DescriptorRegistry) -> BatchReport {
        BatchGenerator::new(self.generator.as_ref(), &self.generator_config)
            .with_workers(self.workers)
            .run(registry)
    }

    /// Generate with the provenance block left out.
    ///
    /// This is the reference output `validate` compares existing files to.
    pub fn generate_normalized(&self, registry: &DescriptorRegistry) -> BatchReport {
        let config = self
            .generator_config
            .clone()
            .with_provenance(ProvenanceMode::Omit);
        BatchGenerator::new(self.generator.as_ref(), &config)
            .with_workers(self.workers)
            .run(registry)
    }

    /// Render the support library with the `[support]` options.
    pub fn support(&self) -> CliResult<Vec<GeneratedCode>> {
        Ok(self
            .generator
            .generate_support(&self.support, &self.generator_config)?)
    }

    /// Report every option mismatch between the descriptors and the support
    /// library, without compiling anything.
    ///
    /// This evaluates the same checks the generated compile-time assertions
    /// perform.
    pub fn check(&self, registry: &DescriptorRegistry) -> Vec<OptionMismatchError> {
        let recognized = self.generator.recognized_options();
        let support =
            LanguageOptions::effective(recognized, &LanguageOptions::new(), &self.support);

        registry
            .descriptors()
            .iter()
            .flat_map(|descriptor| {
                let effective = self
                    .generator_config
                    .effective_options(recognized, descriptor);
                let path = self
                    .generator
                    .artifact_path(descriptor, &self.generator_config);
                let source = descriptor.source_path.as_deref().unwrap_or(&path);
                check_compatibility(&assertions_for(recognized, &effective, source), &support)
            })
            .collect()
    }
}
