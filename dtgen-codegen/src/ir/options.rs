//! Language option IR.
//!
//! Language options are named switches fixed at generation time for an
//! artifact and, independently, at build time for the support library.
//! Generated code asserts at compile time that both sides agree.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use dtgen::options::option_hash;

/// Value of a single language option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl OptionValue {
    /// Get the boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Type name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Ordered mapping of option name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageOptions {
    values: BTreeMap<String, OptionValue>,
}

impl LanguageOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, returning the updated set.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set an option.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Get an option value.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Get a boolean option.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(OptionValue::as_bool)
    }

    /// Get a string option.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(OptionValue::as_str)
    }

    /// Check if an option is set.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate options in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no option is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return a copy of `self` with every option of `other` applied on top.
    pub fn overlay(&self, other: &LanguageOptions) -> Self {
        let mut merged = self.clone();
        for (name, value) in &other.values {
            merged.values.insert(name.clone(), value.clone());
        }
        merged
    }

    /// Names not present in `recognized`.
    pub fn unknown_names<'a>(&'a self, recognized: &'a [RecognizedOption]) -> Vec<&'a str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|name| !recognized.iter().any(|r| r.name == *name))
            .collect()
    }

    /// Option set holding the default of every recognized option.
    pub fn defaults_for(recognized: &[RecognizedOption]) -> Self {
        let mut options = Self::new();
        for option in recognized {
            options.insert(option.name, option.default.to_value());
        }
        options
    }

    /// Effective options for one artifact.
    ///
    /// Recognized defaults, overlaid by generator defaults, overlaid by the
    /// descriptor's own options.
    pub fn effective(
        recognized: &[RecognizedOption],
        generator_defaults: &LanguageOptions,
        descriptor: &LanguageOptions,
    ) -> Self {
        Self::defaults_for(recognized)
            .overlay(generator_defaults)
            .overlay(descriptor)
    }

    /// C++ standard revision selected by the `std` option, e.g. `17` for `c++17`.
    pub fn cpp_standard(&self) -> Option<u16> {
        parse_cpp_standard(self.get_str(STD)?)
    }
}

impl FromIterator<(String, OptionValue)> for LanguageOptions {
    fn from_iter<I: IntoIterator<Item = (String, OptionValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Recognized options
// =============================================================================

/// C++ language standard.
pub const STD: &str = "std";
/// Whether exceptions are used for error signaling.
pub const EXCEPTIONS_ENABLED: &str = "exceptions_enabled";
/// Whether serialization routines assert their preconditions.
pub const ENABLE_SERIALIZATION_ASSERTS: &str = "enable_serialization_asserts";
/// Whether float serialization support is left out.
pub const OMIT_FLOAT_SERIALIZATION_SUPPORT: &str = "omit_float_serialization_support";
/// Endianness the build targets.
pub const TARGET_ENDIANNESS: &str = "target_endianness";

/// Default value of a recognized option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDefault {
    Bool(bool),
    Str(&'static str),
}

impl OptionDefault {
    /// Convert to an owned option value.
    pub fn to_value(self) -> OptionValue {
        match self {
            Self::Bool(b) => OptionValue::Bool(b),
            Self::Str(s) => OptionValue::Str(s.to_string()),
        }
    }
}

/// An option a backend knows how to assert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognizedOption {
    /// Option name
    pub name: &'static str,

    /// Value used when nothing else sets the option
    pub default: OptionDefault,

    /// Accepted string values; empty for boolean options
    pub allowed: &'static [&'static str],
}

impl RecognizedOption {
    const fn flag(name: &'static str) -> Self {
        Self {
            name,
            default: OptionDefault::Bool(false),
            allowed: &[],
        }
    }

    const fn choice(
        name: &'static str,
        default: &'static str,
        allowed: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            default: OptionDefault::Str(default),
            allowed,
        }
    }

    /// Check that `value` has the right type and, for strings, an accepted value.
    pub fn check(&self, value: &OptionValue) -> Result<(), String> {
        match (self.default, value) {
            (OptionDefault::Bool(_), OptionValue::Bool(_)) => Ok(()),
            (OptionDefault::Str(_), OptionValue::Str(s)) => {
                if self.allowed.contains(&s.as_str()) {
                    Ok(())
                } else {
                    Err(format!(
                        "'{}' is not one of {}",
                        s,
                        self.allowed.join(", ")
                    ))
                }
            }
            (OptionDefault::Bool(_), other) => {
                Err(format!("expected a boolean, found {}", other.kind()))
            }
            (OptionDefault::Str(_), other) => {
                Err(format!("expected a string, found {}", other.kind()))
            }
        }
    }
}

/// Endianness values accepted by `target_endianness`.
pub const ENDIANNESS_VALUES: &[&str] = &["any", "big", "little"];

/// C++ standard values accepted by `std`.
pub const CPP_STANDARDS: &[&str] = &["c++14", "c++17", "c++20"];

/// Options asserted by the C++ backend.
pub const CPP_OPTIONS: &[RecognizedOption] = &[
    RecognizedOption::choice(STD, "c++14", CPP_STANDARDS),
    RecognizedOption::flag(EXCEPTIONS_ENABLED),
    RecognizedOption::flag(ENABLE_SERIALIZATION_ASSERTS),
    RecognizedOption::flag(OMIT_FLOAT_SERIALIZATION_SUPPORT),
    RecognizedOption::choice(TARGET_ENDIANNESS, "any", ENDIANNESS_VALUES),
];

/// Options asserted by the Rust backend.
pub const RUST_OPTIONS: &[RecognizedOption] = &[
    RecognizedOption::flag(ENABLE_SERIALIZATION_ASSERTS),
    RecognizedOption::flag(OMIT_FLOAT_SERIALIZATION_SUPPORT),
    RecognizedOption::choice(TARGET_ENDIANNESS, "any", ENDIANNESS_VALUES),
];

/// Parse `c++NN` into `NN`.
pub fn parse_cpp_standard(value: &str) -> Option<u16> {
    value.strip_prefix("c++")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_values() {
        let options: LanguageOptions =
            serde_json::from_str(r#"{"std": "c++17", "exceptions_enabled": true, "level": 3}"#)
                .unwrap();
        assert_eq!(options.get_str(STD), Some("c++17"));
        assert_eq!(options.get_bool(EXCEPTIONS_ENABLED), Some(true));
        assert_eq!(options.get("level"), Some(&OptionValue::Int(3)));
        assert_eq!(options.cpp_standard(), Some(17));
    }

    #[test]
    fn test_effective_layers_defaults() {
        let generator = LanguageOptions::new()
            .with(EXCEPTIONS_ENABLED, true)
            .with(STD, "c++17");
        let descriptor = LanguageOptions::new().with(STD, "c++20");

        let effective = LanguageOptions::effective(CPP_OPTIONS, &generator, &descriptor);
        assert_eq!(effective.get_str(STD), Some("c++20"));
        assert_eq!(effective.get_bool(EXCEPTIONS_ENABLED), Some(true));
        assert_eq!(effective.get_bool(ENABLE_SERIALIZATION_ASSERTS), Some(false));
        assert_eq!(effective.get_str(TARGET_ENDIANNESS), Some("any"));
        assert_eq!(effective.len(), CPP_OPTIONS.len());
    }

    #[test]
    fn test_unknown_names() {
        let options = LanguageOptions::new()
            .with(STD, "c++14")
            .with("enable_override_variant", true);
        assert_eq!(
            options.unknown_names(CPP_OPTIONS),
            vec!["enable_override_variant"]
        );
        assert_eq!(
            options.unknown_names(RUST_OPTIONS),
            vec!["enable_override_variant", "std"]
        );
    }

    #[test]
    fn test_recognized_option_check() {
        let std = CPP_OPTIONS[0];
        assert!(std.check(&"c++17".into()).is_ok());
        assert!(std.check(&"c++98".into()).is_err());
        assert!(std.check(&true.into()).is_err());

        let exceptions = CPP_OPTIONS[1];
        assert!(exceptions.check(&false.into()).is_ok());
        assert_eq!(
            exceptions.check(&OptionValue::Int(1)),
            Err("expected a boolean, found integer".to_string())
        );
    }

    #[test]
    fn test_rust_options_match_runtime() {
        let names: Vec<&str> = RUST_OPTIONS.iter().map(|o| o.name).collect();
        assert_eq!(names, dtgen::options::RECOGNIZED);
    }

    #[test]
    fn test_parse_cpp_standard() {
        assert_eq!(parse_cpp_standard("c++14"), Some(14));
        assert_eq!(parse_cpp_standard("gnu++17"), None);
    }
}
