//! Rust module emitter.
//!
//! Renders the items of one generated module: compatibility checks against
//! `dtgen::options`, the type definition, its `Default` impl, associated
//! constants and accessors, and the `dtgen::Composite` impl.
//!
//! Records become structs with public fields. Unions become either a
//! `dtgen::Variant` over a `dtgen::variant!` storage union, or a native
//! `enum`, depending on [`UnionStyle`].

use super::identifiers::{escape_identifier, index_constant, type_name, variant_name};
use super::type_mapper::RustTypeMapper;
use crate::error::DescriptorError;
use crate::generator::compat::{AssertedValue, CompatibilityAssertion};
use crate::generator::scope::MemberScope;
use crate::generator::source::SourceWriter;
use crate::generator::traits::GeneratorConfig;
use crate::ir::{DataType, Field, TypeDescriptor};

/// Name of the field holding a union's storage.
pub const UNION_FIELD: &str = "value";

/// How a union composite is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionStyle {
    /// `dtgen::Variant` over a storage union declared with `dtgen::variant!`
    Storage,

    /// Native `enum`
    Enum,
}

/// Check that the identifiers emitted for `descriptor` are unique.
///
/// Struct fields, union storage fields and enum variants each form one
/// scope; associated constants and methods of the inherent impl form
/// another, which also holds `MAX_INDEX`, `index` and the `INDEX_*`
/// constants of unions. `a` and `A` both become `INDEX_A`; `type` and
/// `type_` both become the field `type_`.
pub fn check_member_names(
    descriptor: &TypeDescriptor,
    style: UnionStyle,
) -> Result<(), DescriptorError> {
    let type_name = descriptor.full_name.as_str();
    let mut items = MemberScope::new(type_name);
    if descriptor.is_union {
        items = items.with_reserved(["MAX_INDEX"]);
        if style == UnionStyle::Enum {
            items = items.with_reserved(["index"]);
        }
    }
    for constant in &descriptor.constants {
        items.declare(escape_identifier(&constant.name), &constant.name)?;
    }

    let mut fields = MemberScope::new(type_name);
    if !descriptor.is_union {
        for field in descriptor.value_fields() {
            fields.declare(escape_identifier(&field.name), &field.name)?;
        }
        return Ok(());
    }

    for field in &descriptor.fields {
        let name = &field.name;
        match style {
            UnionStyle::Storage => {
                fields.declare(escape_identifier(name), name)?;
                items.declare(format!("set_{}", name), name)?;
            }
            UnionStyle::Enum => fields.declare(variant_name(name), name)?,
        }
        items.declare(index_constant(name), name)?;
        items.declare(format!("is_{}", name), name)?;
        items.declare(format!("get_{}", name), name)?;
        items.declare(format!("get_{}_mut", name), name)?;
    }
    Ok(())
}

/// Renders module items into a [`SourceWriter`].
#[derive(Debug, Clone)]
pub struct RustEmitter<'a> {
    mapper: RustTypeMapper,
    config: &'a GeneratorConfig,
}

impl<'a> RustEmitter<'a> {
    pub fn new(mapper: RustTypeMapper, config: &'a GeneratorConfig) -> Self {
        Self { mapper, config }
    }

    // =========================================================================
    // Compatibility checks
    // =========================================================================

    /// Render one `const` assertion per option check.
    pub fn emit_assertions(&self, w: &mut SourceWriter, assertions: &[CompatibilityAssertion]) {
        for assertion in assertions {
            let constant = format!("::dtgen::options::{}", assertion.option.to_uppercase());
            let condition = match &assertion.value {
                AssertedValue::Bool(true) => format!("{},", constant),
                AssertedValue::Bool(false) => format!("!{},", constant),
                AssertedValue::Hashed { text, hash } => {
                    format!("{} == 0x{:08X}, // \"{}\"", constant, hash, text)
                }
            };
            w.line("const _: () = assert!(");
            w.indent();
            w.line(condition);
            w.line(format!("\"{}\"", escape_str(&assertion.message())));
            w.dedent();
            w.line(");");
        }
        if !assertions.is_empty() {
            w.blank();
        }
    }

    // =========================================================================
    // Type definitions
    // =========================================================================

    /// Render the full type definition for `descriptor`.
    ///
    /// `style` is only consulted for unions.
    pub fn emit_type(&self, w: &mut SourceWriter, descriptor: &TypeDescriptor, style: UnionStyle) {
        match (descriptor.is_union, style) {
            (false, _) => self.emit_record(w, descriptor),
            (true, UnionStyle::Storage) => self.emit_storage_union(w, descriptor),
            (true, UnionStyle::Enum) => self.emit_enum_union(w, descriptor),
        }
        w.blank();
        self.emit_composite_impl(w, descriptor);
    }

    fn emit_record(&self, w: &mut SourceWriter, descriptor: &TypeDescriptor) {
        let name = type_name(descriptor.short_name(), descriptor.version);

        self.emit_type_header(w, descriptor);
        w.line(format!("pub struct {} {{", name));
        w.indent();
        for field in &descriptor.fields {
            if let DataType::Void { bits } = field.data_type {
                w.line(format!("// {}-bit padding", bits));
                continue;
            }
            self.emit_docs(w, field.doc.as_deref());
            if let DataType::VariableArray { capacity, .. } = field.data_type {
                w.line(format!("// capacity: {}", capacity));
            }
            w.line(format!(
                "pub {}: {},",
                escape_identifier(&field.name),
                self.mapper.map_type(&field.data_type)
            ));
        }
        w.dedent();
        w.line("}");
        w.blank();

        w.line(format!("impl Default for {} {{", name));
        w.indent();
        w.line("fn default() -> Self {");
        w.indent();
        w.line("Self {");
        w.indent();
        for field in descriptor.value_fields() {
            w.line(format!(
                "{}: {},",
                escape_identifier(&field.name),
                self.mapper.default_expr(&field.data_type)
            ));
        }
        w.dedent();
        w.line("}");
        w.dedent();
        w.line("}");
        w.dedent();
        w.line("}");

        if !descriptor.constants.is_empty() {
            w.blank();
            w.line(format!("impl {} {{", name));
            w.indent();
            self.emit_constants(w, descriptor);
            w.dedent();
            w.line("}");
        }
    }

    fn emit_storage_union(&self, w: &mut SourceWriter, descriptor: &TypeDescriptor) {
        let name = type_name(descriptor.short_name(), descriptor.version);
        let storage = format!("{}_Alternatives", name);

        w.line("::dtgen::variant! {");
        w.indent();
        w.line(format!("/// Alternatives of [`{}`].", name));
        w.line(format!("pub union {} {{", storage));
        w.indent();
        for (index, field) in descriptor.fields.iter().enumerate() {
            w.line(format!(
                "{} => {}: {},",
                index,
                escape_identifier(&field.name),
                self.mapper.map_type(&field.data_type)
            ));
        }
        w.dedent();
        w.line("}");
        w.dedent();
        w.line("}");
        w.blank();

        self.emit_docs(w, descriptor.doc.as_deref());
        w.line("#[derive(Debug, Clone, PartialEq, Default)]");
        self.emit_deprecation(w, descriptor);
        w.line(format!("pub struct {} {{", name));
        w.indent();
        w.line(format!("pub {}: ::dtgen::Variant<{}>,", UNION_FIELD, storage));
        w.dedent();
        w.line("}");
        w.blank();

        w.line(format!("impl {} {{", name));
        w.indent();
        self.emit_constants(w, descriptor);
        self.emit_index_constants(w, &descriptor.fields);
        for (index, field) in descriptor.fields.iter().enumerate() {
            let ty = self.mapper.map_type(&field.data_type);
            w.blank();
            self.emit_docs(w, field.doc.as_deref());
            w.line(format!("pub fn is_{}(&self) -> bool {{", field.name));
            w.indent();
            w.line(format!(
                "self.{}.index() == Some(Self::{})",
                UNION_FIELD,
                index_constant(&field.name)
            ));
            w.dedent();
            w.line("}");
            w.blank();
            w.line(format!("pub fn get_{}(&self) -> Option<&{}> {{", field.name, ty));
            w.indent();
            w.line(format!("self.{}.get::<{}>()", UNION_FIELD, index));
            w.dedent();
            w.line("}");
            w.blank();
            w.line(format!(
                "pub fn get_{}_mut(&mut self) -> Option<&mut {}> {{",
                field.name, ty
            ));
            w.indent();
            w.line(format!("self.{}.get_mut::<{}>()", UNION_FIELD, index));
            w.dedent();
            w.line("}");
            w.blank();
            w.line(format!(
                "pub fn set_{}(&mut self, value: {ty}) -> &mut {ty} {{",
                field.name,
                ty = ty
            ));
            w.indent();
            w.line(format!("self.{}.emplace::<{}>(value)", UNION_FIELD, index));
            w.dedent();
            w.line("}");
        }
        w.dedent();
        w.line("}");
    }

    fn emit_enum_union(&self, w: &mut SourceWriter, descriptor: &TypeDescriptor) {
        let name = type_name(descriptor.short_name(), descriptor.version);

        self.emit_type_header(w, descriptor);
        w.line(format!("pub enum {} {{", name));
        w.indent();
        for field in &descriptor.fields {
            self.emit_docs(w, field.doc.as_deref());
            w.line(format!(
                "{}({}),",
                variant_name(&field.name),
                self.mapper.map_type(&field.data_type)
            ));
        }
        w.dedent();
        w.line("}");
        w.blank();

        // Alternative 0 is the default, as for the storage engine.
        if let Some(first) = descriptor.fields.first() {
            w.line(format!("impl Default for {} {{", name));
            w.indent();
            w.line("fn default() -> Self {");
            w.indent();
            w.line(format!(
                "Self::{}({})",
                variant_name(&first.name),
                self.mapper.default_expr(&first.data_type)
            ));
            w.dedent();
            w.line("}");
            w.dedent();
            w.line("}");
            w.blank();
        }

        w.line(format!("impl {} {{", name));
        w.indent();
        self.emit_constants(w, descriptor);
        self.emit_index_constants(w, &descriptor.fields);
        w.blank();
        w.line("/// Index of the live alternative.");
        w.line("pub fn index(&self) -> usize {");
        w.indent();
        w.line("match self {");
        w.indent();
        for field in &descriptor.fields {
            w.line(format!(
                "Self::{}(_) => Self::{},",
                variant_name(&field.name),
                index_constant(&field.name)
            ));
        }
        w.dedent();
        w.line("}");
        w.dedent();
        w.line("}");
        for field in &descriptor.fields {
            let ty = self.mapper.map_type(&field.data_type);
            let variant = variant_name(&field.name);
            w.blank();
            w.line(format!("pub fn is_{}(&self) -> bool {{", field.name));
            w.indent();
            w.line(format!("matches!(self, Self::{}(_))", variant));
            w.dedent();
            w.line("}");
            w.blank();
            w.line(format!("pub fn get_{}(&self) -> Option<&{}> {{", field.name, ty));
            w.indent();
            self.emit_enum_get(w, &variant);
            w.dedent();
            w.line("}");
            w.blank();
            w.line(format!(
                "pub fn get_{}_mut(&mut self) -> Option<&mut {}> {{",
                field.name, ty
            ));
            w.indent();
            self.emit_enum_get(w, &variant);
            w.dedent();
            w.line("}");
        }
        w.dedent();
        w.line("}");
    }

    fn emit_enum_get(&self, w: &mut SourceWriter, variant: &str) {
        w.line("match self {");
        w.indent();
        w.line(format!("Self::{}(value) => Some(value),", variant));
        w.line("_ => None,");
        w.dedent();
        w.line("}");
    }

    fn emit_composite_impl(&self, w: &mut SourceWriter, descriptor: &TypeDescriptor) {
        let name = type_name(descriptor.short_name(), descriptor.version);
        w.line(format!("impl ::dtgen::Composite for {} {{", name));
        w.indent();
        w.line(format!(
            "const FULL_NAME: &'static str = \"{}\";",
            descriptor.full_name
        ));
        w.line(format!(
            "const VERSION: (u8, u8) = ({}, {});",
            descriptor.version.major, descriptor.version.minor
        ));
        match descriptor.fixed_port_id {
            Some(port_id) => w.line(format!(
                "const FIXED_PORT_ID: Option<u16> = Some({});",
                port_id
            )),
            None => w.line("const FIXED_PORT_ID: Option<u16> = None;"),
        }
        w.line(format!("const IS_UNION: bool = {};", descriptor.is_union));
        w.dedent();
        w.line("}");
    }

    // =========================================================================
    // Shared pieces
    // =========================================================================

    fn emit_type_header(&self, w: &mut SourceWriter, descriptor: &TypeDescriptor) {
        self.emit_docs(w, descriptor.doc.as_deref());
        w.line("#[derive(Debug, Clone, PartialEq)]");
        self.emit_deprecation(w, descriptor);
    }

    fn emit_deprecation(&self, w: &mut SourceWriter, descriptor: &TypeDescriptor) {
        if descriptor.deprecated {
            w.line(format!(
                "#[deprecated(note = \"{}.{} is deprecated\")]",
                descriptor.full_name, descriptor.version
            ));
        }
    }

    fn emit_constants(&self, w: &mut SourceWriter, descriptor: &TypeDescriptor) {
        for constant in &descriptor.constants {
            self.emit_docs(w, constant.doc.as_deref());
            w.line(format!(
                "pub const {}: {} = {};",
                escape_identifier(&constant.name),
                self.mapper.map_type(&constant.data_type),
                self.mapper
                    .constant_literal(&constant.data_type, &constant.value)
            ));
        }
        if descriptor.is_union && !descriptor.constants.is_empty() {
            w.blank();
        }
    }

    fn emit_index_constants(&self, w: &mut SourceWriter, fields: &[Field]) {
        for (index, field) in fields.iter().enumerate() {
            w.line(format!(
                "pub const {}: usize = {};",
                index_constant(&field.name),
                index
            ));
        }
        w.line(format!("pub const MAX_INDEX: usize = {};", fields.len()));
    }

    fn emit_docs(&self, w: &mut SourceWriter, doc: Option<&str>) {
        if !self.config.generate_docs {
            return;
        }
        if let Some(doc) = doc {
            w.comment("///", doc);
        }
    }
}

/// Escape a string for a Rust string literal.
fn escape_str(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::compat::assertions_for;
    use crate::ir::{
        Constant, ConstantValue, LanguageOptions, Version, ENABLE_SERIALIZATION_ASSERTS,
        RUST_OPTIONS,
    };

    fn emit(descriptor: &TypeDescriptor, style: UnionStyle) -> String {
        let config = GeneratorConfig::default();
        let depth = descriptor.namespace().len();
        let mut w = SourceWriter::new(config.indent);
        RustEmitter::new(RustTypeMapper::new(depth), &config).emit_type(&mut w, descriptor, style);
        w.finish()
    }

    fn msg() -> TypeDescriptor {
        TypeDescriptor::union("pkg.Msg", Version::new(1, 0))
            .with_field(Field::new("a", DataType::unsigned(8)))
            .with_field(Field::new("b", DataType::float(32)))
    }

    #[test]
    fn test_storage_union() {
        let code = emit(&msg(), UnionStyle::Storage);
        assert!(code.contains("::dtgen::variant! {\n    /// Alternatives of [`Msg_1_0`].\n"));
        assert!(code.contains(
            "    pub union Msg_1_0_Alternatives {\n        0 => a: u8,\n        1 => b: f32,\n"
        ));
        assert!(code.contains("pub value: ::dtgen::Variant<Msg_1_0_Alternatives>,"));
        assert!(code.contains("pub const INDEX_A: usize = 0;"));
        assert!(code.contains("pub const INDEX_B: usize = 1;"));
        assert!(code.contains("pub const MAX_INDEX: usize = 2;"));
        assert!(code.contains("self.value.index() == Some(Self::INDEX_B)"));
        assert!(code.contains("pub fn set_b(&mut self, value: f32) -> &mut f32 {"));
        assert!(code.contains("self.value.emplace::<1>(value)"));
        assert!(code.contains("const IS_UNION: bool = true;"));
    }

    #[test]
    fn test_enum_union() {
        let code = emit(&msg(), UnionStyle::Enum);
        assert!(code.contains("pub enum Msg_1_0 {\n    A(u8),\n    B(f32),\n}"));
        assert!(code.contains("Self::A(Default::default())"));
        assert!(code.contains("Self::B(_) => Self::INDEX_B,"));
        assert!(code.contains("matches!(self, Self::A(_))"));
        assert!(!code.contains("::dtgen::variant!"));
    }

    #[test]
    fn test_keyword_alternative() {
        let descriptor = TypeDescriptor::union("pkg.Kind", Version::new(1, 0))
            .with_field(Field::new("type", DataType::Boolean));
        let code = emit(&descriptor, UnionStyle::Storage);
        assert!(code.contains("0 => type_: bool,"));
        assert!(code.contains("pub const INDEX_TYPE: usize = 0;"));
        assert!(code.contains("pub fn is_type(&self) -> bool {"));
    }

    #[test]
    fn test_index_constants_must_stay_distinct() {
        let descriptor = TypeDescriptor::union("pkg.Case", Version::new(1, 0))
            .with_field(Field::new("a", DataType::Boolean))
            .with_field(Field::new("A", DataType::Boolean));
        for style in [UnionStyle::Storage, UnionStyle::Enum] {
            assert_eq!(
                check_member_names(&descriptor, style),
                Err(DescriptorError::DuplicateMember {
                    type_name: "pkg.Case".to_string(),
                    member: "A".to_string(),
                })
            );
        }
    }

    #[test]
    fn test_union_constant_named_max_index() {
        let descriptor = msg().with_constant(Constant::new(
            "MAX_INDEX",
            DataType::unsigned(8),
            ConstantValue::Int(3),
        ));
        assert!(matches!(
            check_member_names(&descriptor, UnionStyle::Storage),
            Err(DescriptorError::DuplicateMember { member, .. }) if member == "MAX_INDEX"
        ));

        // Records have no index table.
        let record = TypeDescriptor::new("pkg.Rec", Version::new(1, 0)).with_constant(
            Constant::new("MAX_INDEX", DataType::unsigned(8), ConstantValue::Int(3)),
        );
        assert_eq!(check_member_names(&record, UnionStyle::Storage), Ok(()));
    }

    #[test]
    fn test_escaped_storage_fields_must_stay_distinct() {
        let descriptor = TypeDescriptor::union("pkg.Kind", Version::new(1, 0))
            .with_field(Field::new("type", DataType::Boolean))
            .with_field(Field::new("type_", DataType::Boolean));
        assert!(check_member_names(&descriptor, UnionStyle::Storage).is_err());
    }

    #[test]
    fn test_accessor_collisions() {
        // `get_a_mut` is both the mutable getter of `a` and the getter of `a_mut`.
        let descriptor = TypeDescriptor::union("pkg.Acc", Version::new(1, 0))
            .with_field(Field::new("a", DataType::Boolean))
            .with_field(Field::new("a_mut", DataType::Boolean));
        assert!(check_member_names(&descriptor, UnionStyle::Storage).is_err());

        let descriptor = msg().with_constant(Constant::new(
            "index",
            DataType::unsigned(8),
            ConstantValue::Int(0),
        ));
        assert!(check_member_names(&descriptor, UnionStyle::Enum).is_err());
        assert_eq!(check_member_names(&descriptor, UnionStyle::Storage), Ok(()));
    }

    #[test]
    fn test_distinct_members_pass() {
        assert_eq!(check_member_names(&msg(), UnionStyle::Storage), Ok(()));
        assert_eq!(check_member_names(&msg(), UnionStyle::Enum), Ok(()));
    }

    #[test]
    fn test_record() {
        let descriptor = TypeDescriptor::new("geo.Path", Version::new(1, 0))
            .with_fixed_port_id(42)
            .with_constant(Constant::new(
                "MAX_POINTS",
                DataType::unsigned(8),
                ConstantValue::Int(16),
            ))
            .with_field(Field::new("closed", DataType::Boolean).with_doc("Closed loop."))
            .with_field(Field::padding(7))
            .with_field(Field::new("id", DataType::fixed_array(DataType::Byte, 64)))
            .with_field(Field::new(
                "points",
                DataType::variable_array(DataType::composite("geo.Point", Version::new(1, 0)), 16),
            ));
        let code = emit(&descriptor, UnionStyle::Storage);
        assert!(code.contains("#[derive(Debug, Clone, PartialEq)]\npub struct Path_1_0 {\n"));
        assert!(code.contains(
            "    /// Closed loop.\n    pub closed: bool,\n    // 7-bit padding\n"
        ));
        assert!(code.contains("    pub id: [u8; 64],\n"));
        assert!(code.contains(
            "// capacity: 16\n    pub points: Vec<super::super::geo::point_1_0::Point_1_0>,"
        ));
        assert!(code.contains("            id: ::core::array::from_fn(|_| Default::default()),\n"));
        assert!(code.contains("    pub const MAX_POINTS: u8 = 16;\n"));
        assert!(code.contains("const FIXED_PORT_ID: Option<u16> = Some(42);"));
        assert!(code.contains("const IS_UNION: bool = false;"));
    }

    #[test]
    fn test_deprecated_attribute() {
        let code = emit(&msg().with_deprecated(true), UnionStyle::Storage);
        assert!(code.contains(
            "#[deprecated(note = \"pkg.Msg.1.0 is deprecated\")]\npub struct Msg_1_0"
        ));
    }

    #[test]
    fn test_assertions() {
        let options = LanguageOptions::effective(
            RUST_OPTIONS,
            &LanguageOptions::new(),
            &LanguageOptions::new().with(ENABLE_SERIALIZATION_ASSERTS, true),
        );
        let assertions = assertions_for(RUST_OPTIONS, &options, "pkg/Msg.1.0.dsdl");
        let config = GeneratorConfig::default();
        let mut w = SourceWriter::new(config.indent);
        RustEmitter::new(RustTypeMapper::new(1), &config).emit_assertions(&mut w, &assertions);
        let code = w.finish();

        assert_eq!(code.matches("const _: () = assert!(").count(), 3);
        assert!(code.contains("    ::dtgen::options::ENABLE_SERIALIZATION_ASSERTS,\n"));
        assert!(code.contains("    !::dtgen::options::OMIT_FLOAT_SERIALIZATION_SUPPORT,\n"));
        assert!(code.contains(&format!(
            "    ::dtgen::options::TARGET_ENDIANNESS == 0x{:08X}, // \"any\"\n",
            dtgen::options::option_hash("any")
        )));
        assert!(code.contains(
            "    \"pkg/Msg.1.0.dsdl is trying to use a support library that was compiled with different language options: target_endianness\"\n);"
        ));
    }
}
