//! Type descriptor IR definitions.
//!
//! A [`TypeDescriptor`] is the read-only input model for one composite type:
//! an ordered field list, an ordered constant list, the union flag, and the
//! identity and metadata of the type. Once loaded it is never mutated by the
//! generators.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::options::LanguageOptions;
use super::types::{CompositeRef, DataType, Version};
use crate::error::DescriptorError;

/// Description of one composite type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Dotted namespace path, e.g. `pkg.sub.Msg`
    pub full_name: String,

    /// Semantic version
    pub version: Version,

    /// Whether the type is deprecated
    #[serde(default)]
    pub deprecated: bool,

    /// Fixed port identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_port_id: Option<u16>,

    /// Documentation text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// Path of the definition this descriptor was produced from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,

    /// Whether the fields are mutually exclusive alternatives
    #[serde(default, rename = "union")]
    pub is_union: bool,

    /// Fields in declaration order; for a union, the alternatives in index order
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Constants in declaration order
    #[serde(default)]
    pub constants: Vec<Constant>,

    /// Language options requested for this type
    #[serde(default)]
    pub language_options: LanguageOptions,
}

impl TypeDescriptor {
    /// Create a record descriptor with no members.
    pub fn new(full_name: impl Into<String>, version: Version) -> Self {
        Self {
            full_name: full_name.into(),
            version,
            deprecated: false,
            fixed_port_id: None,
            doc: None,
            source_path: None,
            is_union: false,
            fields: Vec::new(),
            constants: Vec::new(),
            language_options: LanguageOptions::default(),
        }
    }

    /// Create a union descriptor with no alternatives.
    pub fn union(full_name: impl Into<String>, version: Version) -> Self {
        Self::new(full_name, version).with_union(true)
    }

    /// Parse a descriptor from JSON text.
    pub fn from_json(text: &str) -> Result<Self, DescriptorError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Set the union flag.
    pub fn with_union(mut self, is_union: bool) -> Self {
        self.is_union = is_union;
        self
    }

    /// Set the deprecation flag.
    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Set the fixed port identifier.
    pub fn with_fixed_port_id(mut self, port_id: u16) -> Self {
        self.fixed_port_id = Some(port_id);
        self
    }

    /// Set documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set the source path.
    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Add a field (or alternative).
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a constant.
    pub fn with_constant(mut self, constant: Constant) -> Self {
        self.constants.push(constant);
        self
    }

    /// Set a language option.
    pub fn with_option(
        mut self,
        name: impl Into<String>,
        value: impl Into<super::options::OptionValue>,
    ) -> Self {
        self.language_options.insert(name, value);
        self
    }

    /// Namespace components, e.g. `["pkg", "sub"]` for `pkg.sub.Msg`.
    pub fn namespace(&self) -> Vec<&str> {
        let mut parts: Vec<&str> = self.full_name.split('.').collect();
        parts.pop();
        parts
    }

    /// Short name, e.g. `Msg` for `pkg.sub.Msg`.
    pub fn short_name(&self) -> &str {
        self.full_name
            .rsplit('.')
            .next()
            .unwrap_or(self.full_name.as_str())
    }

    /// Identity of the generated artifact.
    pub fn artifact_key(&self) -> ArtifactKey {
        ArtifactKey {
            full_name: self.full_name.clone(),
            version: self.version,
        }
    }

    /// Fields that carry a value (not padding).
    pub fn value_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.data_type.is_void())
    }

    /// Composite types referenced by any field, sorted and de-duplicated.
    pub fn dependencies(&self) -> Vec<CompositeRef> {
        let mut refs = Vec::new();
        for field in &self.fields {
            field.data_type.collect_composites(&mut refs);
        }
        refs.sort();
        refs.dedup();
        refs
    }

    /// Check if any field uses a float type.
    pub fn uses_floats(&self) -> bool {
        self.fields.iter().any(|f| f.data_type.contains_float())
            || self.constants.iter().any(|c| c.data_type.contains_float())
    }
}

/// Identity of a generated artifact: `(full_name, version)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactKey {
    pub full_name: String,
    pub version: Version,
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.full_name, self.version)
    }
}

/// A field of a record or an alternative of a union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name; empty for padding
    #[serde(default)]
    pub name: String,

    /// Field type
    #[serde(rename = "type")]
    pub data_type: DataType,

    /// Documentation text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            doc: None,
        }
    }

    /// Create an unnamed padding field.
    pub fn padding(bits: u8) -> Self {
        Self::new("", DataType::void(bits))
    }

    /// Set documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// A named scalar constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    /// Constant name
    pub name: String,

    /// Constant type (primitive)
    #[serde(rename = "type")]
    pub data_type: DataType,

    /// Literal value
    pub value: ConstantValue,

    /// Documentation text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Constant {
    /// Create a new constant.
    pub fn new(name: impl Into<String>, data_type: DataType, value: ConstantValue) -> Self {
        Self {
            name: name.into(),
            data_type,
            value,
            doc: None,
        }
    }
}

/// Literal value of a constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstantValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl ConstantValue {
    /// Integer value widened to `i128`, if integral.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Self::Int(i) => Some(i128::from(*i)),
            Self::UInt(u) => Some(i128::from(*u)),
            _ => None,
        }
    }

    /// Numeric value as `f64`, if numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::UInt(u) => Some(*u as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(_) => None,
        }
    }
}
