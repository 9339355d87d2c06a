//! Code generator trait definition.
//!
//! This module defines the `CodeGenerator` trait that every backend
//! implements, together with the configuration and output types shared by
//! all backends.

use serde::{Deserialize, Serialize};

use crate::error::CodegenResult;
use crate::ir::{LanguageOptions, RecognizedOption, TypeDescriptor};

/// Trait for target-language code generators.
///
/// A generator renders one [`TypeDescriptor`] into one self-contained source
/// artifact. Generation is a pure function of the descriptor and the
/// configuration, except for the provenance block (see [`ProvenanceMode`]).
pub trait CodeGenerator: Send + Sync {
    /// Returns the unique identifier for this generator (e.g. `cpp`, `rust`).
    fn id(&self) -> &'static str;

    /// Returns the human-readable name of this generator.
    fn name(&self) -> &'static str;

    /// Returns the file extension for generated files.
    fn file_extension(&self) -> &'static str;

    /// Options this generator asserts in generated code.
    fn recognized_options(&self) -> &'static [RecognizedOption];

    /// Relative output path of the artifact for `descriptor`.
    fn artifact_path(&self, descriptor: &TypeDescriptor, config: &GeneratorConfig) -> String;

    /// Generate the artifact for one descriptor.
    ///
    /// Validates the descriptor first; nothing is rendered for an invalid
    /// descriptor.
    fn generate(
        &self,
        descriptor: &TypeDescriptor,
        config: &GeneratorConfig,
    ) -> CodegenResult<GeneratedCode>;

    /// Generate files tying a batch of artifacts together.
    ///
    /// Called once after a batch with every successfully generated
    /// descriptor. Backends that need no index files return nothing.
    fn generate_index(
        &self,
        descriptors: &[&TypeDescriptor],
        config: &GeneratorConfig,
    ) -> CodegenResult<Vec<GeneratedCode>> {
        let _ = (descriptors, config);
        Ok(Vec::new())
    }

    /// Render the support library the generated artifacts assert against,
    /// baked with `options`.
    fn generate_support(
        &self,
        options: &LanguageOptions,
        config: &GeneratorConfig,
    ) -> CodegenResult<Vec<GeneratedCode>>;

    /// Check if this generator supports a specific feature.
    fn supports_feature(&self, feature: GeneratorFeature) -> bool;
}

/// Generator configuration options.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// How union types are represented
    pub variant_strategy: VariantStrategy,

    /// Provenance block handling
    pub provenance: ProvenanceMode,

    /// Whether to emit documentation comments
    pub generate_docs: bool,

    /// Indentation style
    pub indent: IndentStyle,

    /// Line ending style
    pub line_ending: LineEnding,

    /// Extension of generated C++ headers
    pub header_extension: String,

    /// Language option defaults, overlaid by each descriptor's own options
    pub default_options: LanguageOptions,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            variant_strategy: VariantStrategy::default(),
            provenance: ProvenanceMode::default(),
            generate_docs: true,
            indent: IndentStyle::default(),
            line_ending: LineEnding::default(),
            header_extension: "hpp".to_string(),
            default_options: LanguageOptions::default(),
        }
    }
}

impl GeneratorConfig {
    /// Create a new generator config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the variant strategy.
    pub fn with_variant_strategy(mut self, strategy: VariantStrategy) -> Self {
        self.variant_strategy = strategy;
        self
    }

    /// Set the provenance mode.
    pub fn with_provenance(mut self, provenance: ProvenanceMode) -> Self {
        self.provenance = provenance;
        self
    }

    /// Set whether to generate documentation comments.
    pub fn with_generate_docs(mut self, generate: bool) -> Self {
        self.generate_docs = generate;
        self
    }

    /// Set the indentation style.
    pub fn with_indent(mut self, indent: IndentStyle) -> Self {
        self.indent = indent;
        self
    }

    /// Set the line ending style.
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Set the C++ header extension.
    pub fn with_header_extension(mut self, extension: impl Into<String>) -> Self {
        self.header_extension = extension.into();
        self
    }

    /// Set the language option defaults.
    pub fn with_default_options(mut self, options: LanguageOptions) -> Self {
        self.default_options = options;
        self
    }

    /// Effective options for `descriptor` under a backend's option table.
    pub fn effective_options(
        &self,
        recognized: &[RecognizedOption],
        descriptor: &TypeDescriptor,
    ) -> LanguageOptions {
        LanguageOptions::effective(recognized, &self.default_options, &descriptor.language_options)
    }

    /// Convert `\n` line endings in `code` to the configured style.
    pub fn finish(&self, code: String) -> String {
        match self.line_ending {
            LineEnding::Lf => code,
            LineEnding::CrLf => code.replace('\n', "\r\n"),
        }
    }
}

/// How union types are represented in generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantStrategy {
    /// Library sum type when the target language standard has one
    #[default]
    Auto,

    /// Always the library sum type (`std::variant`, native Rust `enum`)
    Library,

    /// Always the hand-built tagged-union storage
    Fallback,
}

impl VariantStrategy {
    /// Whether the library sum type is used for a given C++ standard.
    pub fn uses_library(self, cpp_standard: u16) -> bool {
        match self {
            Self::Auto => cpp_standard >= 17,
            Self::Library => true,
            Self::Fallback => false,
        }
    }
}

/// Provenance block handling.
///
/// The provenance block is the only non-deterministic part of generated
/// output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProvenanceMode {
    /// Include the current UTC time
    #[default]
    Timestamp,

    /// Include a fixed timestamp
    Pinned(String),

    /// Leave the provenance block out
    Omit,
}

impl ProvenanceMode {
    /// Timestamp to embed, or `None` when the block is omitted.
    pub fn timestamp(&self) -> Option<String> {
        match self {
            Self::Timestamp => Some(
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            ),
            Self::Pinned(value) => Some(value.clone()),
            Self::Omit => None,
        }
    }
}

/// Indentation style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    /// 2 spaces
    Spaces2,

    /// 4 spaces
    #[default]
    Spaces4,

    /// Tabs
    Tabs,
}

impl IndentStyle {
    /// Get the indentation string.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndentStyle::Spaces2 => "  ",
            IndentStyle::Spaces4 => "    ",
            IndentStyle::Tabs => "\t",
        }
    }

    /// Create an indentation string for the given depth.
    pub fn indent(&self, depth: usize) -> String {
        self.as_str().repeat(depth)
    }
}

/// Line ending style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Unix-style line endings (LF)
    #[default]
    Lf,

    /// Windows-style line endings (CRLF)
    CrLf,
}

/// Generated code output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    /// The generated code string
    pub code: String,

    /// Output path relative to the output directory
    pub path: String,

    /// Dotted full name of the rendered type, empty for support and index files
    pub type_name: String,

    /// Paths of other artifacts this one includes
    pub dependencies: Vec<String>,
}

impl GeneratedCode {
    /// Create a new GeneratedCode instance.
    pub fn new(code: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            path: path.into(),
            type_name: String::new(),
            dependencies: Vec::new(),
        }
    }

    /// Set the type name.
    pub fn with_type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = name.into();
        self
    }

    /// Set dependencies.
    pub fn with_dependencies(mut self, deps: Vec<String>) -> Self {
        self.dependencies = deps;
        self
    }

    /// Check if this artifact has dependencies.
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

/// Generator features for capability checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorFeature {
    /// Union rendering through the library sum type
    LibraryVariant,

    /// Union rendering through hand-built tagged-union storage
    FallbackVariant,

    /// Compile-time language option assertions
    CompatibilityAssertions,

    /// Fixed port identifier constants
    FixedPortId,

    /// Deprecation markers
    Deprecation,

    /// Documentation comments
    Documentation,

    /// Support library rendering
    SupportLibrary,

    /// Index files tying artifacts into a module tree
    ModuleTree,
}

impl GeneratorFeature {
    /// Get a human-readable name for this feature.
    pub fn name(&self) -> &'static str {
        match self {
            GeneratorFeature::LibraryVariant => "Library Variant",
            GeneratorFeature::FallbackVariant => "Fallback Variant",
            GeneratorFeature::CompatibilityAssertions => "Compatibility Assertions",
            GeneratorFeature::FixedPortId => "Fixed Port ID",
            GeneratorFeature::Deprecation => "Deprecation",
            GeneratorFeature::Documentation => "Documentation",
            GeneratorFeature::SupportLibrary => "Support Library",
            GeneratorFeature::ModuleTree => "Module Tree",
        }
    }
}
