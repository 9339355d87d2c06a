//! C++ support library rendering.
//!
//! The support library is built separately from any generated header. Its
//! `options.hpp` bakes in the language options it was built with; every
//! generated header asserts against these values at compile time.

use super::identifiers::{escape_identifier, include_guard};
use crate::generator::compat::AssertedValue;
use crate::generator::provenance::Provenance;
use crate::generator::source::SourceWriter;
use crate::generator::traits::{GeneratedCode, GeneratorConfig};
use crate::ir::{LanguageOptions, Version, CPP_OPTIONS};

/// Include path of the support header.
pub const SUPPORT_HEADER: &str = "dtgen/support/support.hpp";

/// Include path of the baked option header.
pub const OPTIONS_HEADER: &str = "dtgen/support/options.hpp";

/// Namespace holding the baked option values.
pub const OPTIONS_NAMESPACE: &str = "::dtgen::support::options";

/// C++ identifier of an option constant.
pub fn option_identifier(option: &str) -> String {
    escape_identifier(option)
}

/// C++ type of an option constant.
pub fn option_type(value: &AssertedValue) -> &'static str {
    match value {
        AssertedValue::Bool(_) => "bool",
        AssertedValue::Hashed { .. } => "std::uint32_t",
    }
}

/// C++ literal of an option value. String values render as their hash.
pub fn option_literal(value: &AssertedValue) -> String {
    match value {
        AssertedValue::Bool(b) => b.to_string(),
        AssertedValue::Hashed { hash, .. } => format!("0x{:08X}U", hash),
    }
}

/// Render both support headers for a library built with `options`.
///
/// `options` is overlaid on the recognized defaults.
pub fn render_support(
    options: &LanguageOptions,
    config: &GeneratorConfig,
    header_extension: &str,
) -> Vec<GeneratedCode> {
    let effective = LanguageOptions::effective(CPP_OPTIONS, &LanguageOptions::new(), options);
    vec![
        GeneratedCode::new(
            config.finish(render_options_header(&effective, config)),
            with_extension(OPTIONS_HEADER, header_extension),
        ),
        GeneratedCode::new(
            config.finish(render_support_header(&effective, config, header_extension)),
            with_extension(SUPPORT_HEADER, header_extension),
        )
        .with_dependencies(vec![with_extension(OPTIONS_HEADER, header_extension)]),
    ]
}

/// Replace the extension of a support header path.
pub fn with_extension(path: &str, extension: &str) -> String {
    match path.rsplit_once('.') {
        Some((stem, _)) => format!("{}.{}", stem, extension),
        None => path.to_string(),
    }
}

fn open_namespaces(w: &mut SourceWriter, names: &[&str]) {
    for name in names {
        w.line(format!("namespace {}", name));
        w.line("{");
    }
    w.blank();
}

fn close_namespaces(w: &mut SourceWriter, names: &[&str]) {
    w.blank();
    for name in names.iter().rev() {
        w.line(format!("}} // namespace {}", name));
    }
}

fn render_options_header(options: &LanguageOptions, config: &GeneratorConfig) -> String {
    let guard = include_guard("dtgen.support.options", Version::new(1, 0));
    let mut w = SourceWriter::new(config.indent);

    w.lines(
        &Provenance {
            backend: "cpp",
            source: "<support library>",
            subject: "dtgen support options".to_string(),
            options,
        }
        .render(config),
    );
    w.line(format!("#ifndef {}", guard));
    w.line(format!("#define {}", guard));
    w.blank();
    w.line("#include <cstdint>");
    w.blank();

    let namespaces = ["dtgen", "support", "options"];
    open_namespaces(&mut w, &namespaces);
    for option in CPP_OPTIONS {
        let Some(value) = options.get(option.name).and_then(AssertedValue::from_option) else {
            continue;
        };
        match &value {
            AssertedValue::Hashed { text, .. } => {
                w.line(format!("/// {} = \"{}\"", option.name, text))
            }
            AssertedValue::Bool(b) => w.line(format!("/// {} = {}", option.name, b)),
        }
        w.line(format!(
            "constexpr {} {} = {};",
            option_type(&value),
            option_identifier(option.name),
            option_literal(&value)
        ));
    }
    close_namespaces(&mut w, &namespaces);
    w.blank();
    w.line(format!("#endif // {}", guard));
    w.finish()
}

fn render_support_header(
    options: &LanguageOptions,
    config: &GeneratorConfig,
    header_extension: &str,
) -> String {
    let guard = include_guard("dtgen.support.support", Version::new(1, 0));
    let mut w = SourceWriter::new(config.indent);

    w.lines(
        &Provenance {
            backend: "cpp",
            source: "<support library>",
            subject: "dtgen support".to_string(),
            options,
        }
        .render(config),
    );
    w.line(format!("#ifndef {}", guard));
    w.line(format!("#define {}", guard));
    w.blank();
    w.line(format!(
        "#include \"{}\"",
        with_extension(OPTIONS_HEADER, header_extension)
    ));
    w.blank();
    w.line("#include <cstddef>");
    w.line("#include <cstdint>");
    w.blank();

    let namespaces = ["dtgen", "support"];
    open_namespaces(&mut w, &namespaces);
    w.line("/// Result of a serialization call: bytes written, or a negated Error.");
    w.line("using SerializeResult = std::int32_t;");
    w.blank();
    w.line("/// Error codes returned negated by serialization routines.");
    w.line("enum Error : std::int32_t");
    w.open_block();
    w.line("SerializationInvalidArgument = 2,");
    w.line("SerializationBufferTooSmall = 3,");
    w.line("SerializationBadArrayLength = 10,");
    w.line("SerializationBadUnionTag = 11,");
    w.line("SerializationNotImplemented = 100,");
    w.close_block("};");
    close_namespaces(&mut w, &namespaces);
    w.blank();
    w.line(format!("#endif // {}", guard));
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::traits::ProvenanceMode;
    use crate::ir::{option_hash, EXCEPTIONS_ENABLED};

    fn omit() -> GeneratorConfig {
        GeneratorConfig::default().with_provenance(ProvenanceMode::Omit)
    }

    #[test]
    fn test_option_literals() {
        assert_eq!(option_literal(&AssertedValue::Bool(true)), "true");
        assert_eq!(
            option_literal(&AssertedValue::Hashed {
                text: "any".to_string(),
                hash: 0x1234_abcd,
            }),
            "0x1234ABCDU"
        );
        assert_eq!(option_identifier("std"), "std_");
    }

    #[test]
    fn test_options_header_bakes_values() {
        let options = LanguageOptions::new().with(EXCEPTIONS_ENABLED, true);
        let files = render_support(&options, &omit(), "hpp");
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "dtgen/support/options.hpp");
        assert_eq!(files[1].path, "dtgen/support/support.hpp");

        let header = &files[0].code;
        assert!(header.starts_with("#ifndef dtgen_support_options_1_0_HPP_INCLUDED\n"));
        assert!(header.contains("constexpr bool exceptions_enabled = true;\n"));
        assert!(header.contains("constexpr bool enable_serialization_asserts = false;\n"));
        assert!(header.contains(&format!(
            "constexpr std::uint32_t std_ = 0x{:08X}U;\n",
            option_hash("c++14")
        )));
        assert!(header.contains(&format!(
            "constexpr std::uint32_t target_endianness = 0x{:08X}U;\n",
            option_hash("any")
        )));
        assert!(header.contains(
            "} // namespace options\n} // namespace support\n} // namespace dtgen\n"
        ));
    }

    #[test]
    fn test_support_header_declares_error_codes() {
        let files = render_support(&LanguageOptions::new(), &omit(), "hpp");
        let header = &files[1].code;
        assert!(header.contains("#include \"dtgen/support/options.hpp\""));
        assert!(header.contains("using SerializeResult = std::int32_t;"));
        assert!(header.contains("    SerializationNotImplemented = 100,\n"));
    }

    #[test]
    fn test_support_header_extension() {
        let files = render_support(&LanguageOptions::new(), &omit(), "h");
        assert_eq!(files[0].path, "dtgen/support/options.h");
        assert!(files[1].code.contains("#include \"dtgen/support/options.h\""));
    }
}
