//! C++ header envelope.
//!
//! Wraps one assembled type definition with, in order: the provenance
//! block, the include guard, includes, compatibility assertions, namespace
//! nesting, the deprecation notice, the body, and the closing namespace and
//! guard lines.

use std::collections::BTreeSet;

use super::identifiers::{descriptor_guard, namespace_components};
use super::support::{
    option_identifier, option_literal, with_extension, OPTIONS_HEADER, OPTIONS_NAMESPACE,
    SUPPORT_HEADER,
};
use crate::generator::compat::{AssertedValue, CompatibilityAssertion};
use crate::generator::provenance::Provenance;
use crate::generator::source::SourceWriter;
use crate::generator::traits::GeneratorConfig;
use crate::ir::{LanguageOptions, TypeDescriptor};

/// Everything the envelope needs besides the body.
#[derive(Debug, Clone)]
pub struct HeaderEnvelope<'a> {
    pub descriptor: &'a TypeDescriptor,

    /// Effective options, listed in the provenance block
    pub options: &'a LanguageOptions,

    /// Compile-time option checks
    pub assertions: &'a [CompatibilityAssertion],

    /// Standard library headers
    pub std_headers: BTreeSet<&'static str>,

    /// Headers of referenced composites
    pub dependency_headers: BTreeSet<String>,

    /// Source path named in provenance and assertion messages
    pub source: &'a str,

    /// Extension of support headers
    pub header_extension: &'a str,
}

impl HeaderEnvelope<'_> {
    /// Wrap `body` (rendered at namespace depth) into a complete header.
    pub fn wrap(&self, body: &str, config: &GeneratorConfig) -> String {
        let descriptor = self.descriptor;
        let guard = descriptor_guard(descriptor);
        let namespaces = namespace_components(&descriptor.full_name);
        let mut w = SourceWriter::new(config.indent);

        w.lines(
            &Provenance {
                backend: "cpp",
                source: self.source,
                subject: format!("{} {}", descriptor.full_name, descriptor.version),
                options: self.options,
            }
            .render(config),
        );

        w.line(format!("#ifndef {}", guard));
        w.line(format!("#define {}", guard));
        w.blank();

        for header in [SUPPORT_HEADER, OPTIONS_HEADER] {
            w.line(format!(
                "#include \"{}\"",
                with_extension(header, self.header_extension)
            ));
        }
        w.blank();
        for header in &self.std_headers {
            w.line(format!("#include <{}>", header));
        }
        if !self.dependency_headers.is_empty() {
            w.blank();
            for header in &self.dependency_headers {
                w.line(format!("#include \"{}\"", header));
            }
        }
        w.blank();

        for assertion in self.assertions {
            render_assertion(&mut w, assertion);
        }
        if !self.assertions.is_empty() {
            w.blank();
        }

        for ns in &namespaces {
            w.line(format!("namespace {}", ns));
            w.line("{");
        }
        if !namespaces.is_empty() {
            w.blank();
        }

        if descriptor.deprecated {
            render_deprecation_notice(&mut w, descriptor);
        }

        w.lines(body);

        if !namespaces.is_empty() {
            w.blank();
        }
        for ns in namespaces.iter().rev() {
            w.line(format!("}} // namespace {}", ns));
        }
        if !namespaces.is_empty() {
            w.blank();
        }
        w.line(format!("#endif // {}", guard));
        w.finish()
    }
}

/// Render one `static_assert` option check.
pub fn render_assertion(w: &mut SourceWriter, assertion: &CompatibilityAssertion) {
    let annotation = match &assertion.value {
        AssertedValue::Hashed { text, .. } => format!(" /* \"{}\" */", text),
        AssertedValue::Bool(_) => String::new(),
    };
    w.line(format!(
        "static_assert({}::{} == {}{},",
        OPTIONS_NAMESPACE,
        option_identifier(assertion.option),
        option_literal(&assertion.value),
        annotation
    ));
    w.line(format!(
        "{}\"{}\");",
        w.unit(),
        assertion.message().replace('\\', "\\\\").replace('"', "\\\"")
    ));
}

fn render_deprecation_notice(w: &mut SourceWriter, descriptor: &TypeDescriptor) {
    let rule = format!("// {}", "=".repeat(76));
    w.line(&rule);
    w.line(format!(
        "// DEPRECATED: {}.{}",
        descriptor.full_name, descriptor.version
    ));
    w.line("// This type is deprecated and may be removed in a future revision.");
    w.line("// Migrate to a newer version of the type.");
    w.line(&rule);
    w.blank();
}
