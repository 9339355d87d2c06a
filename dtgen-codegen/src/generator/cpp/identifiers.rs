//! C++ naming rules.
//!
//! Maps descriptor names onto C++ identifiers, qualified type names, header
//! paths and include guard tokens.

use crate::ir::{TypeDescriptor, Version};

/// C++ keywords and names that must not be used as identifiers.
const RESERVED: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
    // Standard library namespace and macros that break generated code
    "std", "assert", "errno", "NULL", "EOF",
];

/// Escape an identifier that collides with a reserved name.
///
/// Reserved names get a trailing underscore (`class` becomes `class_`).
pub fn escape_identifier(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

/// Versioned type name, e.g. `Msg_1_0`.
pub fn versioned_name(short_name: &str, version: Version) -> String {
    format!("{}_{}_{}", short_name, version.major, version.minor)
}

/// Namespace components of a dotted name, escaped.
pub fn namespace_components(full_name: &str) -> Vec<String> {
    let mut parts: Vec<String> = full_name.split('.').map(escape_identifier).collect();
    parts.pop();
    parts
}

/// Fully qualified C++ name, e.g. `::pkg::sub::Msg_1_0`.
pub fn qualified_name(full_name: &str, version: Version) -> String {
    let short = full_name.rsplit('.').next().unwrap_or(full_name);
    let mut out = String::new();
    for ns in namespace_components(full_name) {
        out.push_str("::");
        out.push_str(&ns);
    }
    out.push_str("::");
    out.push_str(&versioned_name(short, version));
    out
}

/// Header path relative to the output root, e.g. `pkg/sub/Msg_1_0.hpp`.
pub fn header_path(full_name: &str, version: Version, extension: &str) -> String {
    let mut parts: Vec<&str> = full_name.split('.').collect();
    let short = parts.pop().unwrap_or_default();
    let mut path = parts.join("/");
    if !path.is_empty() {
        path.push('/');
    }
    path.push_str(&versioned_name(short, version));
    path.push('.');
    path.push_str(extension);
    path
}

/// Include guard token for a `(full_name, version)` pair.
///
/// Components are joined with `_` and every literal `_` inside a component
/// is written as `_0`. Components start with a letter, so a `_` followed by
/// a letter is always a separator and the encoding can be decoded. Distinct
/// pairs therefore never share a token.
pub fn include_guard(full_name: &str, version: Version) -> String {
    let mut token = full_name
        .split('.')
        .map(|component| component.replace('_', "_0"))
        .collect::<Vec<_>>()
        .join("_");
    token.push_str(&format!(
        "_{}_{}_HPP_INCLUDED",
        version.major, version.minor
    ));
    token
}

/// Include guard token for a descriptor.
pub fn descriptor_guard(descriptor: &TypeDescriptor) -> String {
    include_guard(&descriptor.full_name, descriptor.version)
}
