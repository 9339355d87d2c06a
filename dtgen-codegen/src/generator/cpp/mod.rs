//! C++ header generator.
//!
//! This module renders one type descriptor into one self-contained C++
//! header, and renders the support library those headers assert against.
//!
//! # Components
//!
//! - [`CppGenerator`] - The generator implementing [`CodeGenerator`]
//! - [`CppTypeMapper`] - Maps descriptor types to C++ types
//! - [`CompositeAssembler`] - Renders the type definition
//! - [`HeaderEnvelope`] - Wraps the definition into a complete header
//! - [`VariantRendering`] - Library or hand-built union storage
//!
//! # Example
//!
//! ```rust
//! use dtgen_codegen::generator::cpp::CppGenerator;
//! use dtgen_codegen::generator::{CodeGenerator, GeneratorConfig, ProvenanceMode};
//! use dtgen_codegen::ir::{DataType, Field, TypeDescriptor, Version};
//!
//! let descriptor = TypeDescriptor::union("pkg.Msg", Version::new(1, 0))
//!     .with_field(Field::new("a", DataType::unsigned(8)))
//!     .with_field(Field::new("b", DataType::float(32)));
//! let config = GeneratorConfig::default().with_provenance(ProvenanceMode::Omit);
//!
//! let header = CppGenerator::new().generate(&descriptor, &config).unwrap();
//! assert_eq!(header.path, "pkg/Msg_1_0.hpp");
//! assert!(header.code.contains("struct Msg_1_0 final"));
//! ```

pub mod assembler;
pub mod envelope;
pub mod identifiers;
pub mod support;
pub mod type_mapper;
pub mod variant;

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::error::CodegenResult;
use crate::generator::compat::assertions_for;
use crate::generator::source::SourceWriter;
use crate::generator::traits::{CodeGenerator, GeneratedCode, GeneratorConfig, GeneratorFeature};
use crate::ir::{
    validate_descriptor, LanguageOptions, RecognizedOption, TypeDescriptor, CPP_OPTIONS,
};

pub use assembler::{check_member_names, CompositeAssembler, UNION_MEMBER};
pub use envelope::HeaderEnvelope;
pub use identifiers::{header_path, include_guard, qualified_name};
pub use support::render_support;
pub use type_mapper::CppTypeMapper;
pub use variant::VariantRendering;

/// C++ standard assumed when the `std` option is absent or unparseable.
const DEFAULT_CPP_STANDARD: u16 = 14;

/// C++ header generator.
#[derive(Debug, Clone, Default)]
pub struct CppGenerator;

impl CppGenerator {
    /// Create a new C++ generator.
    pub fn new() -> Self {
        Self
    }

    /// Union rendering for a descriptor under the given effective options.
    pub fn variant_rendering(
        &self,
        options: &LanguageOptions,
        config: &GeneratorConfig,
    ) -> VariantRendering {
        let standard = options.cpp_standard().unwrap_or(DEFAULT_CPP_STANDARD);
        if config.variant_strategy.uses_library(standard) {
            VariantRendering::Library
        } else {
            VariantRendering::Fallback
        }
    }
}

impl CodeGenerator for CppGenerator {
    fn id(&self) -> &'static str {
        "cpp"
    }

    fn name(&self) -> &'static str {
        "C++ Header Generator"
    }

    fn file_extension(&self) -> &'static str {
        "hpp"
    }

    fn recognized_options(&self) -> &'static [RecognizedOption] {
        CPP_OPTIONS
    }

    fn artifact_path(&self, descriptor: &TypeDescriptor, config: &GeneratorConfig) -> String {
        header_path(
            &descriptor.full_name,
            descriptor.version,
            &config.header_extension,
        )
    }

    fn generate(
        &self,
        descriptor: &TypeDescriptor,
        config: &GeneratorConfig,
    ) -> CodegenResult<GeneratedCode> {
        validate_descriptor(descriptor, CPP_OPTIONS)?;
        check_member_names(descriptor)?;

        let options = config.effective_options(CPP_OPTIONS, descriptor);
        let rendering = descriptor
            .is_union
            .then(|| self.variant_rendering(&options, config));
        let path = self.artifact_path(descriptor, config);
        let source = descriptor.source_path.as_deref().unwrap_or(&path);
        debug!(
            type_name = %descriptor.full_name,
            version = %descriptor.version,
            ?rendering,
            "generating C++ header"
        );

        let mapper = CppTypeMapper::new(config.header_extension.as_str());
        let mut std_headers: BTreeSet<&'static str> = ["cstddef", "cstdint"].into_iter().collect();
        let mut dependency_headers = BTreeSet::new();
        for member in descriptor
            .value_fields()
            .map(|f| &f.data_type)
            .chain(descriptor.constants.iter().map(|c| &c.data_type))
        {
            mapper.collect_std_headers(member, &mut std_headers);
            mapper.collect_dependency_headers(member, &mut dependency_headers);
        }
        if let Some(rendering) = rendering {
            rendering.collect_headers(&mut std_headers);
        }

        let assertions = assertions_for(CPP_OPTIONS, &options, source);
        trace!(count = assertions.len(), "compatibility assertions");

        let mut body = SourceWriter::new(config.indent);
        CompositeAssembler::new(&mapper, config).assemble(descriptor, rendering, &mut body);

        let dependencies: Vec<String> = dependency_headers.iter().cloned().collect();
        let envelope = HeaderEnvelope {
            descriptor,
            options: &options,
            assertions: &assertions,
            std_headers,
            dependency_headers,
            source,
            header_extension: &config.header_extension,
        };
        let code = config.finish(envelope.wrap(&body.finish(), config));

        Ok(GeneratedCode::new(code, path)
            .with_type_name(descriptor.full_name.clone())
            .with_dependencies(dependencies))
    }

    fn generate_support(
        &self,
        options: &LanguageOptions,
        config: &GeneratorConfig,
    ) -> CodegenResult<Vec<GeneratedCode>> {
        debug!(options = options.len(), "generating C++ support library");
        Ok(render_support(options, config, &config.header_extension))
    }

    fn supports_feature(&self, feature: GeneratorFeature) -> bool {
        !matches!(feature, GeneratorFeature::ModuleTree)
    }
}
