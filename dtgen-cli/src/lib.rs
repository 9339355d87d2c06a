//! # dtgen-cli
//!
//! CLI library for generating C++ headers and Rust modules from type
//! descriptor documents.
//!
//! This crate provides the core functionality for the `dtgen` CLI tool:
//! descriptor discovery, loading, generation and file output.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`scanner`] - Descriptor file discovery and filtering
//! - [`loader`] - JSON descriptor loading into a registry
//! - [`generator`] - Generation, support-library output and option checks
//! - [`writer`] - File output, dry-run and up-to-date checks
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod generator;
pub mod loader;
pub mod scanner;
pub mod writer;

pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::ProjectGenerator;
pub use loader::{DescriptorLoader, Loaded};
pub use scanner::{DescriptorScanner, SourceFile};
pub use writer::{FileStatus, FileWriter, WriteResult};
