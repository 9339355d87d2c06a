//! # dtgen-codegen
//!
//! Code generators turning type descriptors into C++ headers and Rust
//! modules.
//!
//! ## Architecture
//!
//! ```text
//! JSON descriptor → ir::TypeDescriptor → validate → CodeGenerator → GeneratedCode
//!                                                    ├── cpp  (one header per type + support library)
//!                                                    └── rust (one module per type + mod.rs tree)
//! ```
//!
//! - [`ir`] - the descriptor model, language options and validation
//! - [`generator`] - the [`CodeGenerator`] trait and both backends
//! - [`batch`] - registry and batch runs with per-artifact error isolation
//! - [`error`] - error types
//!
//! ## Example
//!
//! ```rust
//! use dtgen_codegen::generator::{generator_for, GeneratorConfig, ProvenanceMode};
//! use dtgen_codegen::ir::TypeDescriptor;
//!
//! let descriptor = TypeDescriptor::from_json(r#"{
//!     "full_name": "pkg.Msg",
//!     "version": { "major": 1, "minor": 0 },
//!     "union": true,
//!     "fields": [
//!         { "name": "a", "type": { "kind": "unsigned", "bits": 8 } },
//!         { "name": "b", "type": { "kind": "float", "bits": 32 } }
//!     ]
//! }"#).unwrap();
//!
//! let generator = generator_for("cpp").unwrap();
//! let config = GeneratorConfig::default().with_provenance(ProvenanceMode::Omit);
//! let header = generator.generate(&descriptor, &config).unwrap();
//! assert!(header.code.contains("static constexpr std::size_t MAX_INDEX = 2U;"));
//! ```

pub mod batch;
pub mod error;
pub mod generator;
pub mod ir;

pub use batch::{BatchFailure, BatchGenerator, BatchReport, DescriptorRegistry};
pub use error::{CodegenResult, DescriptorError, GeneratorError, OptionMismatchError};
pub use generator::{generator_for, CodeGenerator, GeneratedCode, GeneratorConfig};
pub use ir::TypeDescriptor;
