//! Error types for the CLI.
//!
//! Every failure the `dtgen` binary can report is a [`CliError`]. Library
//! errors from `dtgen-codegen` are wrapped, not re-rendered.

use std::path::PathBuf;

use dtgen_codegen::{BatchFailure, DescriptorError, GeneratorError, OptionMismatchError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error during descriptor discovery.
    #[error("Failed to scan directory: {0}")]
    Scan(#[from] ScanError),

    /// Error loading descriptor files.
    #[error("Failed to load descriptors: {0}")]
    Load(#[from] LoadError),

    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error from the code generator itself.
    #[error("Failed to generate code: {0}")]
    Generate(#[from] GeneratorError),

    /// One or more artifacts of a batch failed.
    #[error("{} artifact(s) failed to generate", .0.len())]
    Batch(Vec<BatchFailure>),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Generated files are missing or out of date.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Descriptors disagree with the support library options.
    #[error("{} language option mismatch(es) against the support library", .0.len())]
    Mismatch(Vec<OptionMismatchError>),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// Out-of-date output and option mismatches exit with `2`, everything
    /// else with `1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Mismatch(_) => 2,
            _ => 1,
        }
    }
}

/// Error during descriptor discovery.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Directory does not exist.
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// No descriptor files found in directory.
    #[error("No descriptor files found in: {path}")]
    NoDescriptors { path: PathBuf },

    /// Invalid filter pattern.
    #[error("Invalid filter pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// IO error during scanning.
    #[error("IO error scanning {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from ignore crate walker.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Error turning a descriptor file into descriptors.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file is not a descriptor document.
    #[error("{file}: {source}")]
    Descriptor {
        file: PathBuf,
        #[source]
        source: DescriptorError,
    },

    /// The file holds a JSON value that is neither an object nor an array.
    #[error("{file}: expected a descriptor object or an array of descriptors")]
    NotADescriptor { file: PathBuf },

    /// Multiple load errors collected.
    #[error("Multiple load errors:\n{}", format_errors(.0))]
    Multiple(Vec<LoadError>),
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_errors(errors: &[LoadError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("  {}. {}", i + 1, e))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ScanError {
    /// Create a directory not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::DirectoryNotFound { path }
    }

    /// Create a no descriptors error.
    pub fn no_descriptors(path: PathBuf) -> Self {
        Self::NoDescriptors { path }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

impl LoadError {
    /// Create a descriptor error for `file`.
    pub fn descriptor(file: impl Into<PathBuf>, source: impl Into<DescriptorError>) -> Self {
        Self::Descriptor {
            file: file.into(),
            source: source.into(),
        }
    }
}

impl ConfigError {
    /// Create a not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
