//! Descriptor loading.
//!
//! Turns scanned files into a [`DescriptorRegistry`]. A file holds either
//! one descriptor object or an array of them. A file that fails to load is
//! reported and skipped; the remaining files still load.

use std::path::Path;

use dtgen_codegen::{DescriptorError, DescriptorRegistry, TypeDescriptor};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::scanner::SourceFile;

/// Result of loading a set of files.
#[derive(Debug, Default)]
pub struct Loaded {
    /// Every descriptor that parsed, in file order.
    pub registry: DescriptorRegistry,

    /// Files that could not be loaded.
    pub errors: Vec<LoadError>,
}

impl Loaded {
    /// Split into the registry and a single error collapsing every load
    /// failure, if there was one.
    pub fn into_parts(self) -> (DescriptorRegistry, Option<LoadError>) {
        let mut errors = self.errors;
        let error = match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(LoadError::Multiple(errors)),
        };
        (self.registry, error)
    }
}

/// Loader for descriptor documents.
#[derive(Debug, Default)]
pub struct DescriptorLoader;

impl DescriptorLoader {
    /// Create a new loader.
    pub fn new() -> Self {
        Self
    }

    /// Parse the descriptors of one file.
    ///
    /// Descriptors without a `source_path` get the file's path relative to
    /// the scan root, so assertion messages name the file they came from.
    pub fn load_file(&self, file: &SourceFile) -> Result<Vec<TypeDescriptor>, LoadError> {
        let value: Value = serde_json::from_str(&file.content)
            .map_err(|e| LoadError::descriptor(&file.path, DescriptorError::from(e)))?;

        let values = match value {
            Value::Array(items) => items,
            object @ Value::Object(_) => vec![object],
            _ => {
                return Err(LoadError::NotADescriptor {
                    file: file.path.clone(),
                })
            }
        };

        let source = display_path(&file.relative_path);
        values
            .into_iter()
            .map(|value| {
                let mut descriptor: TypeDescriptor = serde_json::from_value(value)
                    .map_err(|e| LoadError::descriptor(&file.path, DescriptorError::from(e)))?;
                if descriptor.source_path.is_none() {
                    descriptor.source_path = Some(source.clone());
                }
                Ok(descriptor)
            })
            .collect()
    }

    /// Load every file, collecting failures instead of stopping at the first.
    ///
    /// Duplicate `(full_name, version)` pairs stay in the registry; batch
    /// generation reports every occurrence.
    pub fn load(&self, files: &[SourceFile]) -> Loaded {
        let mut loaded = Loaded::default();
        for file in files {
            match self.load_file(file) {
                Ok(descriptors) => {
                    debug!(
                        file = %file.relative_path.display(),
                        count = descriptors.len(),
                        "loaded descriptors"
                    );
                    for descriptor in descriptors {
                        if let Err(error) = loaded.registry.register(descriptor) {
                            warn!(
                                file = %file.relative_path.display(),
                                %error,
                                "duplicate descriptor"
                            );
                        }
                    }
                }
                Err(error) => {
                    warn!(%error, "skipping descriptor file");
                    loaded.errors.push(error);
                }
            }
        }
        loaded
    }
}

/// Forward-slash form of a relative path.
fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(relative: &str, content: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from("/defs").join(relative),
            relative_path: PathBuf::from(relative),
            content: content.to_string(),
        }
    }

    const MSG: &str = r#"{
        "full_name": "pkg.Msg",
        "version": { "major": 1, "minor": 0 },
        "union": true,
        "fields": [{ "name": "a", "type": { "kind": "unsigned", "bits": 8 } }]
    }"#;

    #[test]
    fn test_load_object_defaults_source_path() {
        let descriptors = DescriptorLoader::new()
            .load_file(&file("pkg/Msg.1.0.json", MSG))
            .unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].source_path.as_deref(), Some("pkg/Msg.1.0.json"));
    }

    #[test]
    fn test_load_array_keeps_explicit_source_path() {
        let content = r#"[
            { "full_name": "a.A", "version": { "major": 1, "minor": 0 }, "source_path": "a/A.1.0.dsdl" },
            { "full_name": "a.B", "version": { "major": 2, "minor": 1 } }
        ]"#;
        let descriptors = DescriptorLoader::new()
            .load_file(&file("all.json", content))
            .unwrap();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].source_path.as_deref(), Some("a/A.1.0.dsdl"));
        assert_eq!(descriptors[1].source_path.as_deref(), Some("all.json"));
    }

    #[test]
    fn test_load_rejects_scalars_and_bad_json() {
        let loader = DescriptorLoader::new();
        assert!(matches!(
            loader.load_file(&file("x.json", "42")),
            Err(LoadError::NotADescriptor { .. })
        ));
        assert!(matches!(
            loader.load_file(&file("y.json", "{ nope")),
            Err(LoadError::Descriptor {
                source: DescriptorError::Parse(_),
                ..
            })
        ));
    }

    #[test]
    fn test_load_isolates_failures() {
        let files = [
            file("bad.json", "[1, 2"),
            file("pkg/Msg.1.0.json", MSG),
            file("pkg/Again.json", MSG),
        ];
        let loaded = DescriptorLoader::new().load(&files);

        assert_eq!(loaded.registry.len(), 2);
        assert_eq!(loaded.errors.len(), 1);
        let key = loaded.registry.descriptors()[0].artifact_key();
        assert!(loaded.registry.is_duplicate(&key));
        let (registry, error) = loaded.into_parts();
        assert_eq!(registry.len(), 2);
        assert!(matches!(error, Some(LoadError::Descriptor { .. })));
    }
}
