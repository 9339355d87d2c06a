//! Rust module generator.
//!
//! Renders one type descriptor into one Rust module depending on the
//! `dtgen` runtime crate. A batch additionally gets `mod.rs` index files
//! realising the namespace nesting.
//!
//! # Components
//!
//! - [`RustGenerator`] - The generator implementing [`CodeGenerator`]
//! - [`RustTypeMapper`] - Maps descriptor types to Rust types
//! - [`RustEmitter`] - Renders module items
//!
//! # Example
//!
//! ```rust
//! use dtgen_codegen::generator::rust::RustGenerator;
//! use dtgen_codegen::generator::{CodeGenerator, GeneratorConfig, ProvenanceMode};
//! use dtgen_codegen::ir::{DataType, Field, TypeDescriptor, Version};
//!
//! let descriptor = TypeDescriptor::new("geo.Point", Version::new(1, 0))
//!     .with_field(Field::new("x", DataType::float(32)))
//!     .with_field(Field::new("y", DataType::float(32)));
//! let config = GeneratorConfig::default().with_provenance(ProvenanceMode::Omit);
//!
//! let module = RustGenerator::new().generate(&descriptor, &config).unwrap();
//! assert_eq!(module.path, "geo/point_1_0.rs");
//! assert!(module.code.contains("pub struct Point_1_0 {"));
//! ```

pub mod emitter;
pub mod identifiers;
pub mod module_tree;
pub mod type_mapper;

use tracing::{debug, trace};

use crate::error::{CodegenResult, GeneratorError};
use crate::generator::compat::assertions_for;
use crate::generator::provenance::Provenance;
use crate::generator::source::SourceWriter;
use crate::generator::traits::{
    CodeGenerator, GeneratedCode, GeneratorConfig, GeneratorFeature, VariantStrategy,
};
use crate::ir::{
    validate_descriptor, LanguageOptions, RecognizedOption, TypeDescriptor, RUST_OPTIONS,
};

pub use emitter::{check_member_names, RustEmitter, UnionStyle, UNION_FIELD};
pub use identifiers::{module_path, relative_type_path};
pub use module_tree::build_module_tree;
pub use type_mapper::{implements_default, RustTypeMapper};

/// Inner attribute heading every generated module.
pub const MODULE_ATTRIBUTES: &str =
    "#![allow(non_camel_case_types, non_snake_case, dead_code, deprecated, unreachable_patterns)]";

/// Rust module generator.
#[derive(Debug, Clone, Default)]
pub struct RustGenerator;

impl RustGenerator {
    /// Create a new Rust generator.
    pub fn new() -> Self {
        Self
    }

    /// Union representation for a variant strategy.
    ///
    /// `auto` selects the storage engine, so unions behave the same as the
    /// C++ fallback.
    pub fn union_style(strategy: VariantStrategy) -> UnionStyle {
        match strategy {
            VariantStrategy::Library => UnionStyle::Enum,
            VariantStrategy::Auto | VariantStrategy::Fallback => UnionStyle::Storage,
        }
    }

    /// Reject unions the chosen representation cannot build.
    ///
    /// The storage engine default-constructs alternative 0.
    fn check_union(&self, descriptor: &TypeDescriptor, style: UnionStyle) -> CodegenResult<()> {
        if style != UnionStyle::Storage {
            return Ok(());
        }
        match descriptor.fields.first() {
            Some(first) if !implements_default(&first.data_type) => {
                Err(GeneratorError::construction(
                    &descriptor.full_name,
                    &first.name,
                    format!(
                        "`{}` does not implement Default",
                        RustTypeMapper::new(0).map_type(&first.data_type)
                    ),
                ))
            }
            _ => Ok(()),
        }
    }
}

impl CodeGenerator for RustGenerator {
    fn id(&self) -> &'static str {
        "rust"
    }

    fn name(&self) -> &'static str {
        "Rust Module Generator"
    }

    fn file_extension(&self) -> &'static str {
        "rs"
    }

    fn recognized_options(&self) -> &'static [RecognizedOption] {
        RUST_OPTIONS
    }

    fn artifact_path(&self, descriptor: &TypeDescriptor, _config: &GeneratorConfig) -> String {
        module_path(&descriptor.full_name, descriptor.version)
    }

    fn generate(
        &self,
        descriptor: &TypeDescriptor,
        config: &GeneratorConfig,
    ) -> CodegenResult<GeneratedCode> {
        validate_descriptor(descriptor, RUST_OPTIONS)?;

        let style = Self::union_style(config.variant_strategy);
        check_member_names(descriptor, style)?;
        if descriptor.is_union {
            self.check_union(descriptor, style)?;
        }

        let options = config.effective_options(RUST_OPTIONS, descriptor);
        let path = self.artifact_path(descriptor, config);
        let source = descriptor.source_path.as_deref().unwrap_or(&path);
        debug!(
            type_name = %descriptor.full_name,
            version = %descriptor.version,
            ?style,
            "generating Rust module"
        );

        let assertions = assertions_for(RUST_OPTIONS, &options, source);
        trace!(count = assertions.len(), "compatibility assertions");

        let mapper = RustTypeMapper::new(descriptor.namespace().len());
        let emitter = RustEmitter::new(mapper, config);
        let mut w = SourceWriter::new(config.indent);
        w.lines(
            &Provenance {
                backend: "rust",
                source,
                subject: format!("{} {}", descriptor.full_name, descriptor.version),
                options: &options,
            }
            .render(config),
        );
        w.line(MODULE_ATTRIBUTES);
        w.blank();
        emitter.emit_assertions(&mut w, &assertions);
        if descriptor.deprecated {
            let rule = format!("// {}", "=".repeat(76));
            w.line(&rule);
            w.line(format!(
                "// DEPRECATED: {}.{}",
                descriptor.full_name, descriptor.version
            ));
            w.line("// This type is deprecated and may be removed in a future revision.");
            w.line(&rule);
            w.blank();
        }
        emitter.emit_type(&mut w, descriptor, style);

        let dependencies = descriptor
            .dependencies()
            .iter()
            .map(|r| module_path(&r.full_name, r.version))
            .collect();
        Ok(GeneratedCode::new(config.finish(w.finish()), path)
            .with_type_name(descriptor.full_name.clone())
            .with_dependencies(dependencies))
    }

    fn generate_index(
        &self,
        descriptors: &[&TypeDescriptor],
        config: &GeneratorConfig,
    ) -> CodegenResult<Vec<GeneratedCode>> {
        debug!(count = descriptors.len(), "generating Rust module tree");
        Ok(build_module_tree(descriptors, config))
    }

    fn generate_support(
        &self,
        _options: &LanguageOptions,
        _config: &GeneratorConfig,
    ) -> CodegenResult<Vec<GeneratedCode>> {
        Err(GeneratorError::Unsupported {
            generator: "rust",
            what: "support library rendering (generated modules depend on the dtgen crate, configured through its cargo features)".to_string(),
        })
    }

    fn supports_feature(&self, feature: GeneratorFeature) -> bool {
        !matches!(feature, GeneratorFeature::SupportLibrary)
    }
}
