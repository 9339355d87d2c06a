//! C++ composite assembler.
//!
//! Renders one type definition: port identifier constants, named constants,
//! then either the ordered field list (records) or the variant storage
//! engine with its `IndexOf` table and accessors (unions), followed by the
//! serialization entry point.

use super::identifiers::{escape_identifier, versioned_name};
use super::type_mapper::CppTypeMapper;
use super::variant::VariantRendering;
use crate::error::DescriptorError;
use crate::generator::scope::MemberScope;
use crate::generator::source::SourceWriter;
use crate::generator::traits::GeneratorConfig;
use crate::ir::{DataType, TypeDescriptor};

/// Name of the data-carrying member of a union composite.
pub const UNION_MEMBER: &str = "union_value";

/// Names the assembler declares in every type.
const RESERVED_MEMBERS: &[&str] = &["HasFixedPortID", "FixedPortId"];

/// Names the assembler declares in union types.
const RESERVED_UNION_MEMBERS: &[&str] = &["IndexOf", "MAX_INDEX", "VariantType", UNION_MEMBER];

/// Check that the identifiers rendered for `descriptor` are unique.
///
/// Covers the type scope (constants, fields or union accessors, and the
/// reserved names, including the type's own name) and the `IndexOf` scope.
/// Two members can escape to the same identifier, e.g. `class` and
/// `class_`.
pub fn check_member_names(descriptor: &TypeDescriptor) -> Result<(), DescriptorError> {
    let type_name = versioned_name(descriptor.short_name(), descriptor.version);
    let mut reserved: Vec<&str> = RESERVED_MEMBERS.to_vec();
    reserved.push(type_name.as_str());
    if descriptor.is_union {
        reserved.extend_from_slice(RESERVED_UNION_MEMBERS);
    }
    let mut members = MemberScope::new(&descriptor.full_name).with_reserved(reserved);

    for constant in &descriptor.constants {
        members.declare(escape_identifier(&constant.name), &constant.name)?;
    }

    if descriptor.is_union {
        let mut index_of = MemberScope::new(&descriptor.full_name).with_reserved(["IndexOf"]);
        for field in &descriptor.fields {
            index_of.declare(escape_identifier(&field.name), &field.name)?;
            members.declare(format!("is_{}", field.name), &field.name)?;
            members.declare(format!("get_{}_if", field.name), &field.name)?;
            members.declare(format!("set_{}", field.name), &field.name)?;
        }
    } else {
        for field in descriptor.value_fields() {
            members.declare(escape_identifier(&field.name), &field.name)?;
        }
    }
    Ok(())
}

/// Renders type definitions into a [`SourceWriter`].
#[derive(Debug, Clone)]
pub struct CompositeAssembler<'a> {
    mapper: &'a CppTypeMapper,
    config: &'a GeneratorConfig,
}

impl<'a> CompositeAssembler<'a> {
    pub fn new(mapper: &'a CppTypeMapper, config: &'a GeneratorConfig) -> Self {
        Self { mapper, config }
    }

    /// Render the type definition and its serialization stub.
    ///
    /// `rendering` is `Some` for unions.
    pub fn assemble(
        &self,
        descriptor: &TypeDescriptor,
        rendering: Option<VariantRendering>,
        w: &mut SourceWriter,
    ) {
        let type_name = versioned_name(descriptor.short_name(), descriptor.version);

        self.render_docs(w, descriptor.doc.as_deref());
        if descriptor.deprecated {
            w.line(format!(
                "struct [[deprecated(\"{}.{} is deprecated\")]] {} final",
                descriptor.full_name, descriptor.version, type_name
            ));
        } else {
            w.line(format!("struct {} final", type_name));
        }
        w.open_block();

        self.render_port_id(w, descriptor);
        self.render_constants(w, descriptor);

        match rendering {
            Some(rendering) => self.render_union(w, descriptor, rendering),
            None => self.render_fields(w, descriptor),
        }

        w.close_block("};");
        w.blank();
        self.render_serialize_stub(w, &type_name);
    }

    fn render_docs(&self, w: &mut SourceWriter, doc: Option<&str>) {
        if !self.config.generate_docs {
            return;
        }
        if let Some(doc) = doc {
            w.comment("///", doc);
        }
    }

    fn render_port_id(&self, w: &mut SourceWriter, descriptor: &TypeDescriptor) {
        match descriptor.fixed_port_id {
            Some(port_id) => {
                w.line("static constexpr bool HasFixedPortID = true;");
                w.line(format!(
                    "static constexpr std::uint16_t FixedPortId = {}U;",
                    port_id
                ));
            }
            None => w.line("static constexpr bool HasFixedPortID = false;"),
        }
        w.blank();
    }

    fn render_constants(&self, w: &mut SourceWriter, descriptor: &TypeDescriptor) {
        if descriptor.constants.is_empty() {
            return;
        }
        for constant in &descriptor.constants {
            self.render_docs(w, constant.doc.as_deref());
            w.line(format!(
                "static constexpr {} {} = {};",
                self.mapper.map_type(&constant.data_type),
                escape_identifier(&constant.name),
                self.mapper
                    .constant_literal(&constant.data_type, &constant.value)
            ));
        }
        w.blank();
    }

    fn render_fields(&self, w: &mut SourceWriter, descriptor: &TypeDescriptor) {
        for field in &descriptor.fields {
            if let DataType::Void { bits } = field.data_type {
                w.line(format!("// {}-bit padding", bits));
                continue;
            }
            self.render_docs(w, field.doc.as_deref());
            if let DataType::VariableArray { capacity, .. } = field.data_type {
                w.line(format!("// capacity: {}", capacity));
            }
            w.line(format!(
                "{} {}{{}};",
                self.mapper.map_type(&field.data_type),
                escape_identifier(&field.name)
            ));
        }
    }

    fn render_union(
        &self,
        w: &mut SourceWriter,
        descriptor: &TypeDescriptor,
        rendering: VariantRendering,
    ) {
        // Name-to-index table; indices follow declaration order.
        w.line("struct IndexOf final");
        w.open_block();
        w.line("IndexOf() = delete;");
        for (index, field) in descriptor.fields.iter().enumerate() {
            w.line(format!(
                "static constexpr std::size_t {} = {}U;",
                escape_identifier(&field.name),
                index
            ));
        }
        w.close_block("};");
        w.line(format!(
            "static constexpr std::size_t MAX_INDEX = {}U;",
            descriptor.fields.len()
        ));
        w.blank();

        let alternatives: Vec<String> = descriptor
            .fields
            .iter()
            .map(|f| self.mapper.map_type(&f.data_type))
            .collect();
        let label = format!("{}.{}", descriptor.full_name, descriptor.version);
        rendering.render(w, &label, &alternatives);
        w.blank();
        w.line(format!("VariantType {};", UNION_MEMBER));

        for (field, ty) in descriptor.fields.iter().zip(&alternatives) {
            let index = format!("IndexOf::{}", escape_identifier(&field.name));
            let get_if = rendering.get_if(UNION_MEMBER, &index);
            w.blank();
            self.render_docs(w, field.doc.as_deref());
            w.line(format!("bool is_{}() const noexcept", field.name));
            w.open_block();
            w.line(format!("return {}.index() == {};", UNION_MEMBER, index));
            w.close_block("}");
            w.blank();
            w.line(format!("{}* get_{}_if() noexcept", ty, field.name));
            w.open_block();
            w.line(format!("return {};", get_if));
            w.close_block("}");
            w.blank();
            w.line(format!("const {}* get_{}_if() const noexcept", ty, field.name));
            w.open_block();
            w.line(format!("return {};", get_if));
            w.close_block("}");
            w.blank();
            w.line(format!("{ty}& set_{}(const {ty}& value)", field.name, ty = ty));
            w.open_block();
            w.line(format!("return {}.emplace<{}>(value);", UNION_MEMBER, index));
            w.close_block("}");
        }
    }

    fn render_serialize_stub(&self, w: &mut SourceWriter, type_name: &str) {
        w.line("/// Serialization entry point. The encoding is not generated.");
        w.line(format!(
            "inline ::dtgen::support::SerializeResult serialize(const {}& obj,",
            type_name
        ));
        w.line(format!("{}std::uint8_t* const buffer,", w.unit()));
        w.line(format!(
            "{}std::size_t* const inout_buffer_size_bytes)",
            w.unit()
        ));
        w.open_block();
        w.line("(void) obj;");
        w.line("(void) buffer;");
        w.line("(void) inout_buffer_size_bytes;");
        w.line("return -::dtgen::support::Error::SerializationNotImplemented;");
        w.close_block("}");
    }
}
