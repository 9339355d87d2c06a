//! Descriptor type to C++ type mapping.

use std::collections::BTreeSet;

use super::identifiers::{header_path, qualified_name};
use crate::ir::{ConstantValue, DataType};

/// Maps descriptor data types to C++ types.
#[derive(Debug, Clone)]
pub struct CppTypeMapper {
    header_extension: String,
}

impl Default for CppTypeMapper {
    fn default() -> Self {
        Self::new("hpp")
    }
}

impl CppTypeMapper {
    /// Create a mapper whose composite includes use `header_extension`.
    pub fn new(header_extension: impl Into<String>) -> Self {
        Self {
            header_extension: header_extension.into(),
        }
    }

    /// Map a data type to its C++ spelling.
    pub fn map_type(&self, ty: &DataType) -> String {
        match ty {
            DataType::Boolean => "bool".to_string(),
            DataType::Unsigned { bits } => format!("std::uint{}_t", storage_width(*bits)),
            DataType::Signed { bits } => format!("std::int{}_t", storage_width(*bits)),
            DataType::Float { bits } if *bits > 32 => "double".to_string(),
            DataType::Float { .. } => "float".to_string(),
            DataType::Byte | DataType::Utf8 => "std::uint8_t".to_string(),
            // Padding has no member; callers skip void fields.
            DataType::Void { .. } => "void".to_string(),
            DataType::FixedArray { element, capacity } => {
                format!("std::array<{}, {}>", self.map_type(element), capacity)
            }
            DataType::VariableArray { element, .. } => {
                format!("std::vector<{}>", self.map_type(element))
            }
            DataType::Composite { full_name, version } => qualified_name(full_name, *version),
        }
    }

    /// Collect the standard headers `ty` needs.
    pub fn collect_std_headers(&self, ty: &DataType, out: &mut BTreeSet<&'static str>) {
        match ty {
            DataType::Unsigned { .. }
            | DataType::Signed { .. }
            | DataType::Byte
            | DataType::Utf8 => {
                out.insert("cstdint");
            }
            DataType::FixedArray { element, .. } => {
                out.insert("array");
                self.collect_std_headers(element, out);
            }
            DataType::VariableArray { element, .. } => {
                out.insert("vector");
                self.collect_std_headers(element, out);
            }
            _ => {}
        }
    }

    /// Header path of a composite type, if `ty` is or contains one.
    pub fn collect_dependency_headers(&self, ty: &DataType, out: &mut BTreeSet<String>) {
        let mut refs = Vec::new();
        ty.collect_composites(&mut refs);
        for r in refs {
            out.insert(header_path(&r.full_name, r.version, &self.header_extension));
        }
    }

    /// Render a constant literal for a primitive type.
    pub fn constant_literal(&self, ty: &DataType, value: &ConstantValue) -> String {
        match (ty, value) {
            (_, ConstantValue::Bool(b)) => b.to_string(),
            (DataType::Float { bits }, v) => {
                let f = v.as_f64().unwrap_or_default();
                let mut text = format!("{:?}", f);
                if !text.contains(['.', 'e', 'E']) {
                    text.push_str(".0");
                }
                if *bits <= 32 {
                    text.push('F');
                }
                text
            }
            (DataType::Signed { .. }, ConstantValue::Int(i)) if *i == i64::MIN => {
                format!("({} - 1)", i64::MIN + 1)
            }
            (DataType::Signed { .. }, v) => v.as_integer().unwrap_or_default().to_string(),
            (_, v) => format!("{}U", v.as_integer().unwrap_or_default()),
        }
    }
}

/// Smallest standard integer width holding `bits`.
pub fn storage_width(bits: u8) -> u8 {
    match bits {
        0..=8 => 8,
        9..=16 => 16,
        17..=32 => 32,
        _ => 64,
    }
}
