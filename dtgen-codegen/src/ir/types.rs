//! Data type IR definitions.
//!
//! This module defines the types a field or constant can have in a
//! type descriptor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic version of a type description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    /// Create a new version.
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Reference to another composite type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompositeRef {
    /// Dotted full name, e.g. `pkg.sub.Msg`
    pub full_name: String,

    /// Referenced version
    pub version: Version,
}

/// Data type of a field or constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataType {
    /// Single-bit boolean
    Boolean,

    /// Unsigned integer of 1..=64 bits
    Unsigned { bits: u8 },

    /// Signed integer of 2..=64 bits
    Signed { bits: u8 },

    /// IEEE 754 float of 16, 32 or 64 bits
    Float { bits: u8 },

    /// Opaque byte
    Byte,

    /// UTF-8 code unit
    Utf8,

    /// Padding of 1..=64 bits, only valid as an unnamed record field
    Void { bits: u8 },

    /// Array with exactly `capacity` elements
    FixedArray {
        element: Box<DataType>,
        capacity: u32,
    },

    /// Array with at most `capacity` elements
    VariableArray {
        element: Box<DataType>,
        capacity: u32,
    },

    /// Nested composite type
    Composite {
        full_name: String,
        version: Version,
    },
}

impl DataType {
    /// Create an unsigned integer type.
    pub fn unsigned(bits: u8) -> Self {
        Self::Unsigned { bits }
    }

    /// Create a signed integer type.
    pub fn signed(bits: u8) -> Self {
        Self::Signed { bits }
    }

    /// Create a float type.
    pub fn float(bits: u8) -> Self {
        Self::Float { bits }
    }

    /// Create a void padding type.
    pub fn void(bits: u8) -> Self {
        Self::Void { bits }
    }

    /// Create a fixed-capacity array type.
    pub fn fixed_array(element: DataType, capacity: u32) -> Self {
        Self::FixedArray {
            element: Box::new(element),
            capacity,
        }
    }

    /// Create a variable-length array type.
    pub fn variable_array(element: DataType, capacity: u32) -> Self {
        Self::VariableArray {
            element: Box::new(element),
            capacity,
        }
    }

    /// Create a composite reference type.
    pub fn composite(full_name: impl Into<String>, version: Version) -> Self {
        Self::Composite {
            full_name: full_name.into(),
            version,
        }
    }

    /// Check if this is padding.
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void { .. })
    }

    /// Check if this is a primitive scalar (valid as a constant type).
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Boolean
                | Self::Unsigned { .. }
                | Self::Signed { .. }
                | Self::Float { .. }
                | Self::Byte
                | Self::Utf8
        )
    }

    /// Check if this type or any array element is a float.
    pub fn contains_float(&self) -> bool {
        match self {
            Self::Float { .. } => true,
            Self::FixedArray { element, .. } | Self::VariableArray { element, .. } => {
                element.contains_float()
            }
            _ => false,
        }
    }

    /// Short human-readable name, e.g. `uint8` or `float32[4]`.
    pub fn display_name(&self) -> String {
        match self {
            Self::Boolean => "bool".to_string(),
            Self::Unsigned { bits } => format!("uint{}", bits),
            Self::Signed { bits } => format!("int{}", bits),
            Self::Float { bits } => format!("float{}", bits),
            Self::Byte => "byte".to_string(),
            Self::Utf8 => "utf8".to_string(),
            Self::Void { bits } => format!("void{}", bits),
            Self::FixedArray { element, capacity } => {
                format!("{}[{}]", element.display_name(), capacity)
            }
            Self::VariableArray { element, capacity } => {
                format!("{}[<={}]", element.display_name(), capacity)
            }
            Self::Composite { full_name, version } => format!("{}.{}", full_name, version),
        }
    }

    /// Collect every composite referenced by this type, including through arrays.
    pub fn collect_composites(&self, out: &mut Vec<CompositeRef>) {
        match self {
            Self::Composite { full_name, version } => out.push(CompositeRef {
                full_name: full_name.clone(),
                version: *version,
            }),
            Self::FixedArray { element, .. } | Self::VariableArray { element, .. } => {
                element.collect_composites(out)
            }
            _ => {}
        }
    }

    /// Check bit widths and capacities, returning the reason on failure.
    pub fn check(&self) -> Result<(), String> {
        match self {
            Self::Unsigned { bits } | Self::Void { bits } if !(1..=64).contains(bits) => {
                Err(format!("bit width {} is outside 1..=64", bits))
            }
            Self::Signed { bits } if !(2..=64).contains(bits) => {
                Err(format!("signed bit width {} is outside 2..=64", bits))
            }
            Self::Float { bits } if !matches!(bits, 16 | 32 | 64) => {
                Err(format!("float width {} is not 16, 32 or 64", bits))
            }
            Self::FixedArray { element, capacity } | Self::VariableArray { element, capacity } => {
                if *capacity == 0 {
                    return Err("array capacity must be positive".to_string());
                }
                if element.is_void() {
                    return Err("array element cannot be void".to_string());
                }
                element.check()
            }
            _ => Ok(()),
        }
    }
}
