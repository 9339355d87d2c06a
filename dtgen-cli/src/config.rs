//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `dtgen.toml` files
//! and merging with command-line arguments.

use std::path::{Path, PathBuf};

use dtgen_codegen::generator::{
    GeneratorConfig, IndentStyle, LineEnding, ProvenanceMode, VariantStrategy, GENERATOR_IDS,
};
use dtgen_codegen::ir::LanguageOptions;
use serde::Deserialize;

use crate::error::{CliResult, ConfigError};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "dtgen.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,

    /// Rendering settings.
    pub generation: GenerationConfig,

    /// Language option defaults, overlaid by each descriptor's own options.
    pub language_options: LanguageOptions,

    /// Options the support library is built with.
    pub support: LanguageOptions,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for generated files.
    pub dir: PathBuf,

    /// Target language: `cpp` or `rust`.
    pub language: String,

    /// Extension of generated C++ headers.
    pub header_extension: String,

    /// Line ending style.
    pub line_ending: LineEnding,
}

/// Provenance block setting as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvenanceSetting {
    #[default]
    Timestamp,
    Pinned,
    Omit,
}

/// Rendering settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// How union types are represented.
    pub variant_strategy: VariantStrategy,

    /// Provenance block handling.
    pub provenance: ProvenanceSetting,

    /// Timestamp written when `provenance = "pinned"`.
    pub pinned_timestamp: Option<String>,

    /// Whether to emit documentation comments.
    pub generate_docs: bool,

    /// Indentation style.
    pub indent: IndentStyle,

    /// Number of worker threads; `0` uses the available parallelism.
    pub workers: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./generated"),
            language: "cpp".to_string(),
            header_extension: "hpp".to_string(),
            line_ending: LineEnding::default(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            variant_strategy: VariantStrategy::default(),
            provenance: ProvenanceSetting::default(),
            pinned_timestamp: None,
            generate_docs: true,
            indent: IndentStyle::default(),
            workers: 1,
        }
    }
}

impl Config {
    /// Build the generator configuration described by this file.
    pub fn generator_config(&self) -> CliResult<GeneratorConfig> {
        let provenance = match self.generation.provenance {
            ProvenanceSetting::Timestamp => ProvenanceMode::Timestamp,
            ProvenanceSetting::Omit => ProvenanceMode::Omit,
            ProvenanceSetting::Pinned => match &self.generation.pinned_timestamp {
                Some(timestamp) => ProvenanceMode::Pinned(timestamp.clone()),
                None => {
                    return Err(ConfigError::invalid_value(
                        "generation.pinned_timestamp",
                        "required when provenance = \"pinned\"",
                    )
                    .into())
                }
            },
        };

        Ok(GeneratorConfig::new()
            .with_variant_strategy(self.generation.variant_strategy)
            .with_provenance(provenance)
            .with_generate_docs(self.generation.generate_docs)
            .with_indent(self.generation.indent)
            .with_line_ending(self.output.line_ending)
            .with_header_extension(self.output.header_extension.clone())
            .with_default_options(self.language_options.clone()))
    }

    /// Check values that deserialize fine but make no sense.
    pub fn validate(&self) -> CliResult<()> {
        if !GENERATOR_IDS.contains(&self.output.language.as_str()) {
            return Err(ConfigError::invalid_value(
                "output.language",
                format!(
                    "'{}' is not one of {}",
                    self.output.language,
                    GENERATOR_IDS.join(", ")
                ),
            )
            .into());
        }
        let extension = &self.output.header_extension;
        if extension.is_empty() || extension.contains(['.', '/', '\\']) {
            return Err(ConfigError::invalid_value(
                "output.header_extension",
                format!("'{}' is not a bare file extension", extension),
            )
            .into());
        }
        Ok(())
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// Without a path, `dtgen.toml` in the working directory is used when it
    /// exists and the defaults otherwise. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::not_found(path.to_path_buf()).into())
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(CONFIG_FILENAME),
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        Self::parse(&config_path, &content)
    }

    /// Parse configuration text read from `path`.
    pub fn parse(path: &Path, content: &str) -> CliResult<Config> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ConfigError::invalid_toml(path.to_path_buf(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(ref language) = args.language {
            config.output.language = language.clone();
        }

        if let Some(strategy) = args.variant_strategy {
            config.generation.variant_strategy = strategy;
        }

        if let Some(workers) = args.workers {
            config.generation.workers = workers;
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# dtgen configuration file

[output]
# Output directory for generated files
dir = "./generated"

# Target language (cpp, rust)
language = "cpp"

# Extension of generated C++ headers
header_extension = "hpp"

# Line endings (lf, crlf)
line_ending = "lf"

[generation]
# Union representation (auto, library, fallback)
# auto uses std::variant from C++17 on and the built-in storage before that
variant_strategy = "auto"

# Provenance comment block (timestamp, pinned, omit)
provenance = "timestamp"

# Timestamp written when provenance = "pinned"
# pinned_timestamp = "2024-01-01T00:00:00Z"

# Whether to copy descriptor documentation into generated code
generate_docs = true

# Indentation (spaces2, spaces4, tabs)
indent = "spaces4"

# Worker threads (0 = available parallelism)
workers = 1

[language_options]
# Defaults applied to every descriptor; a descriptor's own options win
std = "c++14"
exceptions_enabled = false
enable_serialization_asserts = false
omit_float_serialization_support = false
target_endianness = "any"

[support]
# Options the support library is built with
# Generated code fails to compile against a support library built differently
std = "c++14"
exceptions_enabled = false
enable_serialization_asserts = false
omit_float_serialization_support = false
target_endianness = "any"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Target language override.
    pub language: Option<String>,

    /// Variant strategy override.
    pub variant_strategy: Option<VariantStrategy>,

    /// Worker count override.
    pub workers: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtgen_codegen::ir::{OptionValue, EXCEPTIONS_ENABLED, STD};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.dir, PathBuf::from("./generated"));
        assert_eq!(config.output.language, "cpp");
        assert_eq!(config.output.header_extension, "hpp");
        assert_eq!(config.generation.variant_strategy, VariantStrategy::Auto);
        assert_eq!(config.generation.provenance, ProvenanceSetting::Timestamp);
        assert!(config.generation.generate_docs);
        assert!(config.language_options.is_empty());
        assert!(config.support.is_empty());
    }

    #[test]
    fn test_default_config_content_parses() {
        let config = ConfigManager::parse(
            Path::new(CONFIG_FILENAME),
            ConfigManager::default_config_content(),
        )
        .unwrap();
        assert_eq!(config.output.language, "cpp");
        assert_eq!(config.generation.indent, IndentStyle::Spaces4);
        assert_eq!(config.language_options.get_str(STD), Some("c++14"));
        assert_eq!(config.support.get_bool(EXCEPTIONS_ENABLED), Some(false));
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[output]
dir = "./include"
language = "rust"
header_extension = "h"

[generation]
variant_strategy = "fallback"
provenance = "pinned"
pinned_timestamp = "2024-01-01T00:00:00Z"
generate_docs = false
indent = "tabs"

[language_options]
exceptions_enabled = true

[support]
exceptions_enabled = true
std = "c++17"
"#;

        let config = ConfigManager::parse(Path::new("dtgen.toml"), toml).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("./include"));
        assert_eq!(config.output.language, "rust");
        assert_eq!(config.generation.variant_strategy, VariantStrategy::Fallback);
        assert_eq!(
            config.language_options.get(EXCEPTIONS_ENABLED),
            Some(&OptionValue::Bool(true))
        );
        assert_eq!(config.support.get_str(STD), Some("c++17"));

        let generator = config.generator_config().unwrap();
        assert_eq!(
            generator.provenance,
            ProvenanceMode::Pinned("2024-01-01T00:00:00Z".to_string())
        );
        assert_eq!(generator.indent, IndentStyle::Tabs);
        assert_eq!(generator.header_extension, "h");
        assert!(!generator.generate_docs);
    }

    #[test]
    fn test_pinned_provenance_requires_timestamp() {
        let toml = "[generation]\nprovenance = \"pinned\"\n";
        let config = ConfigManager::parse(Path::new("dtgen.toml"), toml).unwrap();
        assert!(matches!(
            config.generator_config(),
            Err(crate::error::CliError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let toml = "[output]\nlanguage = \"java\"\n";
        let err = ConfigManager::parse(Path::new("dtgen.toml"), toml).unwrap_err();
        assert!(err.to_string().contains("output.language"));
    }

    #[test]
    fn test_invalid_toml_names_file() {
        let err = ConfigManager::parse(Path::new("broken.toml"), "[output\n").unwrap_err();
        assert!(matches!(
            err,
            crate::error::CliError::Config(ConfigError::InvalidToml { .. })
        ));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_merge_cli_args() {
        let args = CliArgs {
            output: Some(PathBuf::from("./custom")),
            language: Some("rust".to_string()),
            ..Default::default()
        };

        let merged = ConfigManager::merge_cli_args(Config::default(), &args);
        assert_eq!(merged.output.dir, PathBuf::from("./custom"));
        assert_eq!(merged.output.language, "rust");
        assert_eq!(merged.generation.variant_strategy, VariantStrategy::Auto);
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let err = ConfigManager::load(Some(Path::new("/nonexistent/dtgen.toml"))).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CliError::Config(ConfigError::NotFound { .. })
        ));
    }
}
