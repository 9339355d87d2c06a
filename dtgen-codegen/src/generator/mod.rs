//! Code generator module.
//!
//! This module defines the code generator trait, the pieces shared by all
//! backends, and the C++ and Rust backends.

pub mod compat;
pub mod cpp;
pub mod provenance;
pub mod rust;
pub mod scope;
pub mod source;
pub mod traits;

pub use compat::{assertions_for, check_compatibility, AssertedValue, CompatibilityAssertion};
pub use provenance::{strip_provenance, Provenance, GENERATOR_IDENTITY, PROVENANCE_MARKER};
pub use scope::MemberScope;
pub use source::SourceWriter;
pub use traits::{
    CodeGenerator, GeneratedCode, GeneratorConfig, GeneratorFeature, IndentStyle, LineEnding,
    ProvenanceMode, VariantStrategy,
};

use crate::error::{CodegenResult, GeneratorError};

/// Identifiers of the built-in generators.
pub const GENERATOR_IDS: &[&str] = &["cpp", "rust"];

/// Look up a built-in generator by identifier.
pub fn generator_for(id: &str) -> CodegenResult<Box<dyn CodeGenerator>> {
    match id {
        "cpp" | "c++" => Ok(Box::new(cpp::CppGenerator::new())),
        "rust" | "rs" => Ok(Box::new(rust::RustGenerator::new())),
        other => Err(GeneratorError::UnknownGenerator(other.to_string())),
    }
}
