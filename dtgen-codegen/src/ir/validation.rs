//! Descriptor validation.
//!
//! Every structural check a generator relies on happens here, before any
//! text is produced.

use std::collections::HashSet;

use tracing::warn;

use super::descriptor::{Constant, ConstantValue, TypeDescriptor};
use super::options::RecognizedOption;
use super::types::DataType;
use crate::error::DescriptorError;

/// Validate a descriptor.
///
/// `recognized` is the option table of the backend that will render the
/// descriptor. Recognized options with a wrong type or value are rejected;
/// unknown names are only logged.
pub fn validate_descriptor(
    descriptor: &TypeDescriptor,
    recognized: &[RecognizedOption],
) -> Result<(), DescriptorError> {
    validate_full_name(&descriptor.full_name)?;
    let type_name = descriptor.full_name.as_str();

    if descriptor.is_union {
        if descriptor.fields.is_empty() {
            return Err(DescriptorError::EmptyUnion {
                type_name: type_name.to_string(),
            });
        }
        if let Some(field) = descriptor.fields.iter().find(|f| f.data_type.is_void()) {
            return Err(DescriptorError::VoidAlternative {
                type_name: type_name.to_string(),
                field: field.name.clone(),
            });
        }
    }

    let mut members = HashSet::new();
    for (index, field) in descriptor.fields.iter().enumerate() {
        if field.name.is_empty() {
            if field.data_type.is_void() {
                field
                    .data_type
                    .check()
                    .map_err(|reason| DescriptorError::InvalidType {
                        type_name: type_name.to_string(),
                        member: format!("#{}", index),
                        reason,
                    })?;
                continue;
            }
            return Err(DescriptorError::UnnamedField {
                type_name: type_name.to_string(),
                index,
            });
        }

        validate_member_name(type_name, &field.name)?;
        if !members.insert(field.name.as_str()) {
            return Err(DescriptorError::DuplicateMember {
                type_name: type_name.to_string(),
                member: field.name.clone(),
            });
        }
        field
            .data_type
            .check()
            .map_err(|reason| DescriptorError::InvalidType {
                type_name: type_name.to_string(),
                member: field.name.clone(),
                reason,
            })?;
    }

    for constant in &descriptor.constants {
        validate_member_name(type_name, &constant.name)?;
        if !members.insert(constant.name.as_str()) {
            return Err(DescriptorError::DuplicateMember {
                type_name: type_name.to_string(),
                member: constant.name.clone(),
            });
        }
        validate_constant(constant).map_err(|reason| DescriptorError::InvalidConstant {
            type_name: type_name.to_string(),
            constant: constant.name.clone(),
            reason,
        })?;
    }

    for (name, value) in descriptor.language_options.iter() {
        match recognized.iter().find(|r| r.name == name) {
            Some(option) => {
                option
                    .check(value)
                    .map_err(|reason| DescriptorError::InvalidOption {
                        type_name: type_name.to_string(),
                        option: name.to_string(),
                        reason,
                    })?
            }
            None => warn!(
                type_name,
                option = name,
                "unknown language option is carried but not asserted"
            ),
        }
    }

    Ok(())
}

/// Validate a dotted full name.
pub fn validate_full_name(full_name: &str) -> Result<(), DescriptorError> {
    let invalid = |reason: &str| DescriptorError::InvalidName {
        name: full_name.to_string(),
        reason: reason.to_string(),
    };

    if full_name.is_empty() {
        return Err(invalid("name is empty"));
    }
    for component in full_name.split('.') {
        if component.is_empty() {
            return Err(invalid("empty name component"));
        }
        if !is_identifier(component) {
            return Err(invalid(
                "components must start with a letter and contain only letters, digits and underscores",
            ));
        }
    }
    Ok(())
}

fn validate_member_name(type_name: &str, name: &str) -> Result<(), DescriptorError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(DescriptorError::InvalidType {
            type_name: type_name.to_string(),
            member: name.to_string(),
            reason: "member name is not an identifier".to_string(),
        })
    }
}

/// Check `[A-Za-z][A-Za-z0-9_]*`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_constant(constant: &Constant) -> Result<(), String> {
    if !constant.data_type.is_primitive() {
        return Err(format!(
            "type {} is not primitive",
            constant.data_type.display_name()
        ));
    }
    constant.data_type.check()?;

    match (&constant.data_type, constant.value) {
        (DataType::Boolean, ConstantValue::Bool(_)) => Ok(()),
        (DataType::Boolean, _) => Err("boolean constant needs a boolean literal".to_string()),
        (DataType::Float { .. }, value) => value
            .as_f64()
            .map(|_| ())
            .ok_or_else(|| "float constant needs a numeric literal".to_string()),
        (ty, value) => {
            let (min, max) = integer_range(ty);
            let v = value
                .as_integer()
                .ok_or_else(|| format!("{} constant needs an integer literal", ty.display_name()))?;
            if v < min || v > max {
                Err(format!(
                    "value {} does not fit {} ({}..={})",
                    v,
                    ty.display_name(),
                    min,
                    max
                ))
            } else {
                Ok(())
            }
        }
    }
}

/// Inclusive value range of an integral primitive.
fn integer_range(ty: &DataType) -> (i128, i128) {
    match *ty {
        DataType::Unsigned { bits } => (0, (1i128 << u32::from(bits)) - 1),
        DataType::Signed { bits } => {
            let half = 1i128 << (u32::from(bits) - 1);
            (-half, half - 1)
        }
        // byte and utf8 are octets
        _ => (0, 255),
    }
}
