//! Rust naming rules.
//!
//! A descriptor `pkg.sub.Msg` v1.0 becomes type `Msg_1_0` in module
//! `pkg::sub::msg_1_0`, written to `pkg/sub/msg_1_0.rs`.

use convert_case::{Case, Casing};

use crate::ir::Version;

/// Strict and reserved Rust keywords.
const KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try", "gen",
];

/// Escape an identifier that collides with a keyword.
///
/// Keywords get a trailing underscore (`type` becomes `type_`).
pub fn escape_identifier(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

/// Versioned type name, e.g. `Msg_1_0`.
pub fn type_name(short_name: &str, version: Version) -> String {
    format!("{}_{}_{}", short_name, version.major, version.minor)
}

/// Module name of a versioned type, e.g. `msg_1_0`.
pub fn module_name(short_name: &str, version: Version) -> String {
    escape_identifier(&format!(
        "{}_{}_{}",
        short_name.to_case(Case::Snake),
        version.major,
        version.minor
    ))
}

/// Namespace modules of a dotted name, escaped.
pub fn namespace_modules(full_name: &str) -> Vec<String> {
    let mut parts: Vec<String> = full_name.split('.').map(escape_identifier).collect();
    parts.pop();
    parts
}

/// Module file path relative to the output root, e.g. `pkg/sub/msg_1_0.rs`.
pub fn module_path(full_name: &str, version: Version) -> String {
    let short = full_name.rsplit('.').next().unwrap_or(full_name);
    let mut parts = namespace_modules(full_name);
    parts.push(format!("{}.rs", module_name(short, version)));
    parts.join("/")
}

/// Path to a composite type as seen from a module nested `depth` namespaces
/// below the output root.
///
/// The referring type's own module adds one level, so `depth + 1` `super`
/// segments lead back to the root.
pub fn relative_type_path(full_name: &str, version: Version, depth: usize) -> String {
    let short = full_name.rsplit('.').next().unwrap_or(full_name);
    let mut segments: Vec<String> = vec!["super".to_string(); depth + 1];
    segments.extend(namespace_modules(full_name));
    segments.push(module_name(short, version));
    segments.push(type_name(short, version));
    segments.join("::")
}

/// Enum variant name of a union alternative, e.g. `Temperature` for `temperature`.
pub fn variant_name(field_name: &str) -> String {
    escape_identifier(&field_name.to_case(Case::Pascal))
}

/// Associated constant holding the index of an alternative, e.g. `INDEX_TEMPERATURE`.
pub fn index_constant(field_name: &str) -> String {
    format!("INDEX_{}", field_name.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("type"), "type_");
        assert_eq!(escape_identifier("Self"), "Self_");
        assert_eq!(escape_identifier("union"), "union");
        assert_eq!(escape_identifier("value"), "value");
    }

    #[test]
    fn test_module_naming() {
        let v = Version::new(1, 0);
        assert_eq!(type_name("Msg", v), "Msg_1_0");
        assert_eq!(module_name("Msg", v), "msg_1_0");
        assert_eq!(module_name("HeartBeat", Version::new(2, 3)), "heart_beat_2_3");
        assert_eq!(module_path("pkg.sub.Msg", v), "pkg/sub/msg_1_0.rs");
        assert_eq!(module_path("Msg", v), "msg_1_0.rs");
        assert_eq!(module_path("type.Msg", v), "type_/msg_1_0.rs");
    }

    #[test]
    fn test_relative_type_path() {
        let v = Version::new(1, 0);
        assert_eq!(
            relative_type_path("geo.Point", v, 2),
            "super::super::super::geo::point_1_0::Point_1_0"
        );
        assert_eq!(relative_type_path("Point", v, 0), "super::point_1_0::Point_1_0");
    }

    #[test]
    fn test_alternative_naming() {
        assert_eq!(variant_name("temperature"), "Temperature");
        assert_eq!(variant_name("raw_value"), "RawValue");
        assert_eq!(index_constant("raw_value"), "INDEX_RAW_VALUE");
    }
}
