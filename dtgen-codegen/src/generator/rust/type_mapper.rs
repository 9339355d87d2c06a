//! Descriptor type to Rust type mapping.

use super::identifiers::relative_type_path;
use crate::generator::cpp::type_mapper::storage_width;
use crate::ir::{ConstantValue, DataType};

/// Largest array length the standard library implements `Default` for.
pub const MAX_DEFAULT_ARRAY_LEN: u32 = 32;

/// Maps descriptor data types to Rust types for one generated module.
#[derive(Debug, Clone, Copy)]
pub struct RustTypeMapper {
    /// Namespace depth of the module the types are written into
    depth: usize,
}

impl RustTypeMapper {
    /// Create a mapper for a module nested `depth` namespaces deep.
    pub fn new(depth: usize) -> Self {
        Self { depth }
    }

    /// Map a data type to its Rust spelling.
    pub fn map_type(&self, ty: &DataType) -> String {
        match ty {
            DataType::Boolean => "bool".to_string(),
            DataType::Unsigned { bits } => format!("u{}", storage_width(*bits)),
            DataType::Signed { bits } => format!("i{}", storage_width(*bits)),
            DataType::Float { bits } if *bits > 32 => "f64".to_string(),
            DataType::Float { .. } => "f32".to_string(),
            DataType::Byte | DataType::Utf8 => "u8".to_string(),
            DataType::Void { .. } => "()".to_string(),
            DataType::FixedArray { element, capacity } => {
                format!("[{}; {}]", self.map_type(element), capacity)
            }
            DataType::VariableArray { element, .. } => format!("Vec<{}>", self.map_type(element)),
            DataType::Composite { full_name, version } => {
                relative_type_path(full_name, *version, self.depth)
            }
        }
    }

    /// Expression producing the default value of `ty`.
    pub fn default_expr(&self, ty: &DataType) -> String {
        match ty {
            DataType::FixedArray { element, .. } => format!(
                "::core::array::from_fn(|_| {})",
                self.default_expr(element)
            ),
            _ => "Default::default()".to_string(),
        }
    }

    /// Render a constant literal for a primitive type.
    pub fn constant_literal(&self, ty: &DataType, value: &ConstantValue) -> String {
        match (ty, value) {
            (_, ConstantValue::Bool(b)) => b.to_string(),
            (DataType::Float { .. }, v) => {
                let mut text = format!("{:?}", v.as_f64().unwrap_or_default());
                if !text.contains(['.', 'e', 'E']) {
                    text.push_str(".0");
                }
                text
            }
            (_, v) => v.as_integer().unwrap_or_default().to_string(),
        }
    }
}

/// Whether the Rust type of `ty` implements `Default`.
///
/// Generated composites always do. Fixed arrays only do up to
/// [`MAX_DEFAULT_ARRAY_LEN`] elements.
pub fn implements_default(ty: &DataType) -> bool {
    match ty {
        DataType::FixedArray { element, capacity } => {
            *capacity <= MAX_DEFAULT_ARRAY_LEN && implements_default(element)
        }
        _ => true,
    }
}
