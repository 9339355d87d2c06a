//! Compatibility assertion protocol.
//!
//! For every recognized language option, generated code carries a
//! compile-time equality check between the value it was generated with and
//! the value the support library reports it was built with. Any single
//! mismatch fails the build with a message naming the option and the
//! source file. Backends render the checks in their own syntax from the
//! [`CompatibilityAssertion`] values built here.

use std::fmt;

use crate::error::OptionMismatchError;
use crate::ir::{option_hash, LanguageOptions, OptionValue, RecognizedOption};

/// Value an assertion compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertedValue {
    /// Boolean option
    Bool(bool),

    /// String option, compared through its [`option_hash`]
    Hashed { text: String, hash: u32 },
}

impl AssertedValue {
    /// Convert an option value into an assertable integral value.
    ///
    /// Integer options have no counterpart in the support library and are
    /// not asserted.
    pub fn from_option(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::Bool(b) => Some(Self::Bool(*b)),
            OptionValue::Str(s) => Some(Self::Hashed {
                text: s.clone(),
                hash: option_hash(s),
            }),
            OptionValue::Int(_) => None,
        }
    }
}

impl fmt::Display for AssertedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Hashed { text, .. } => write!(f, "\"{}\"", text),
        }
    }
}

/// One compile-time option check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityAssertion {
    /// Option name
    pub option: &'static str,

    /// Value the artifact was generated with
    pub value: AssertedValue,

    /// Source file named in the failure message
    pub source: String,
}

impl CompatibilityAssertion {
    /// Failure message emitted with the check.
    pub fn message(&self) -> String {
        format!(
            "{} is trying to use a support library that was compiled with different language options: {}",
            self.source, self.option
        )
    }

    /// Whether a support library built with `support` would pass this check.
    ///
    /// `support` is the support library's effective option set. An option it
    /// does not set fails the check.
    pub fn is_satisfied_by(&self, support: &LanguageOptions) -> bool {
        support
            .get(self.option)
            .and_then(AssertedValue::from_option)
            .is_some_and(|value| value == self.value)
    }

    /// Describe the mismatch against `support`, if any.
    pub fn mismatch(&self, support: &LanguageOptions) -> Option<OptionMismatchError> {
        if self.is_satisfied_by(support) {
            return None;
        }
        Some(OptionMismatchError {
            option: self.option.to_string(),
            source_file: self.source.clone(),
            generated: self.value.to_string(),
            support: support
                .get(self.option)
                .map(|v| match v {
                    OptionValue::Str(s) => format!("\"{}\"", s),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| "<unset>".to_string()),
        })
    }
}

/// Build the assertions for one artifact.
///
/// `effective` must already include the defaults of every recognized
/// option. Assertions follow the order of `recognized`.
pub fn assertions_for(
    recognized: &[RecognizedOption],
    effective: &LanguageOptions,
    source: &str,
) -> Vec<CompatibilityAssertion> {
    recognized
        .iter()
        .filter_map(|option| {
            let value = AssertedValue::from_option(effective.get(option.name)?)?;
            Some(CompatibilityAssertion {
                option: option.name,
                value,
                source: source.to_string(),
            })
        })
        .collect()
}

/// Report every assertion that would fail against `support`.
pub fn check_compatibility(
    assertions: &[CompatibilityAssertion],
    support: &LanguageOptions,
) -> Vec<OptionMismatchError> {
    assertions
        .iter()
        .filter_map(|assertion| assertion.mismatch(support))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CPP_OPTIONS, EXCEPTIONS_ENABLED, STD, TARGET_ENDIANNESS};

    fn effective(overrides: LanguageOptions) -> LanguageOptions {
        LanguageOptions::effective(CPP_OPTIONS, &LanguageOptions::new(), &overrides)
    }

    #[test]
    fn test_one_assertion_per_recognized_option() {
        let options = effective(LanguageOptions::new().with("custom", 3i64));
        let assertions = assertions_for(CPP_OPTIONS, &options, "pkg/Msg.1.0.dsdl");
        let names: Vec<&str> = assertions.iter().map(|a| a.option).collect();
        assert_eq!(
            names,
            vec![
                STD,
                EXCEPTIONS_ENABLED,
                "enable_serialization_asserts",
                "omit_float_serialization_support",
                TARGET_ENDIANNESS,
            ]
        );
    }

    #[test]
    fn test_string_options_are_hashed() {
        let options = effective(LanguageOptions::new().with(TARGET_ENDIANNESS, "little"));
        let assertions = assertions_for(CPP_OPTIONS, &options, "x");
        let endianness = assertions
            .iter()
            .find(|a| a.option == TARGET_ENDIANNESS)
            .unwrap();
        assert_eq!(
            endianness.value,
            AssertedValue::Hashed {
                text: "little".to_string(),
                hash: option_hash("little"),
            }
        );
    }

    #[test]
    fn test_exceptions_mismatch_detected_for_one_header_only() {
        let support = effective(LanguageOptions::new().with(EXCEPTIONS_ENABLED, true));

        let header_on = effective(LanguageOptions::new().with(EXCEPTIONS_ENABLED, true));
        let header_off = effective(LanguageOptions::new().with(EXCEPTIONS_ENABLED, false));

        let on = assertions_for(CPP_OPTIONS, &header_on, "on.dsdl");
        let off = assertions_for(CPP_OPTIONS, &header_off, "off.dsdl");

        assert!(check_compatibility(&on, &support).is_empty());

        let mismatches = check_compatibility(&off, &support);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].option, EXCEPTIONS_ENABLED);
        assert_eq!(mismatches[0].source_file, "off.dsdl");
        assert_eq!(mismatches[0].generated, "false");
        assert_eq!(mismatches[0].support, "true");
    }

    #[test]
    fn test_unset_support_option_fails() {
        let assertion = CompatibilityAssertion {
            option: STD,
            value: AssertedValue::from_option(&"c++17".into()).unwrap(),
            source: "x".to_string(),
        };
        let mismatch = assertion.mismatch(&LanguageOptions::new()).unwrap();
        assert_eq!(mismatch.support, "<unset>");
        assert_eq!(mismatch.generated, "\"c++17\"");
    }

    #[test]
    fn test_message_names_option_and_source() {
        let assertion = CompatibilityAssertion {
            option: EXCEPTIONS_ENABLED,
            value: AssertedValue::Bool(false),
            source: "pkg/Msg.1.0.dsdl".to_string(),
        };
        let message = assertion.message();
        assert!(message.starts_with("pkg/Msg.1.0.dsdl "));
        assert!(message.ends_with(": exceptions_enabled"));
    }
}
