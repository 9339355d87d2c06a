//! Intermediate representation of type descriptors.
//!
//! The IR is the read-only input of every generator. It deserializes from
//! the JSON documents handed over by the schema front end.

mod descriptor;
mod options;
mod types;
mod validation;

pub use descriptor::{ArtifactKey, Constant, ConstantValue, Field, TypeDescriptor};
pub use options::{
    option_hash, parse_cpp_standard, LanguageOptions, OptionDefault, OptionValue,
    RecognizedOption, CPP_OPTIONS, CPP_STANDARDS, ENABLE_SERIALIZATION_ASSERTS, ENDIANNESS_VALUES,
    EXCEPTIONS_ENABLED, OMIT_FLOAT_SERIALIZATION_SUPPORT, RUST_OPTIONS, STD, TARGET_ENDIANNESS,
};
pub use types::{CompositeRef, DataType, Version};
pub use validation::{is_identifier, validate_descriptor, validate_full_name};
