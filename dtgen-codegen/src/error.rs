//! Error types for descriptor validation and code generation.

use thiserror::Error;

/// Result type for code generation.
pub type CodegenResult<T> = Result<T, GeneratorError>;

/// A type descriptor is structurally invalid for this generator.
///
/// Raised before any output is produced. In batch generation it aborts only
/// the artifact it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("invalid full name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("union '{type_name}' declares no alternatives")]
    EmptyUnion { type_name: String },

    #[error("union '{type_name}' alternative '{field}' has void type")]
    VoidAlternative { type_name: String, field: String },

    #[error("'{type_name}' declares member '{member}' more than once")]
    DuplicateMember { type_name: String, member: String },

    #[error("'{type_name}' field #{index} has no name")]
    UnnamedField { type_name: String, index: usize },

    #[error("'{type_name}' member '{member}' has invalid type: {reason}")]
    InvalidType {
        type_name: String,
        member: String,
        reason: String,
    },

    #[error("'{type_name}' constant '{constant}' is invalid: {reason}")]
    InvalidConstant {
        type_name: String,
        constant: String,
        reason: String,
    },

    #[error("'{type_name}' language option '{option}' is invalid: {reason}")]
    InvalidOption {
        type_name: String,
        option: String,
        reason: String,
    },

    #[error("'{full_name}' version {major}.{minor} is declared more than once")]
    DuplicateArtifact {
        full_name: String,
        major: u8,
        minor: u8,
    },

    #[error("failed to parse descriptor: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for DescriptorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Generated code and the support library disagree on a language option.
///
/// The generated compile-time assertions are what enforce this. The error
/// value exists so tooling can report a mismatch before compiling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source_file}: language option '{option}' is {generated} in generated code but the support library was built with {support}")]
pub struct OptionMismatchError {
    pub option: String,
    pub source_file: String,
    pub generated: String,
    pub support: String,
}

/// Error that occurred during code generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// Alternative 0 of a union cannot be default-constructed.
    #[error("union '{type_name}' alternative 0 '{alternative}' cannot be default-constructed: {reason}")]
    Construction {
        type_name: String,
        alternative: String,
        reason: String,
    },

    #[error("generator '{generator}' does not support {what}")]
    Unsupported {
        generator: &'static str,
        what: String,
    },

    #[error("unknown generator '{0}'")]
    UnknownGenerator(String),
}

impl GeneratorError {
    /// Create a construction error for alternative 0 of `type_name`.
    pub fn construction(
        type_name: impl Into<String>,
        alternative: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Construction {
            type_name: type_name.into(),
            alternative: alternative.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error comes from the descriptor itself.
    pub fn is_descriptor_error(&self) -> bool {
        matches!(self, Self::Descriptor(_))
    }
}
