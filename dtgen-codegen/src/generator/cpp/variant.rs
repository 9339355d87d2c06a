//! C++ rendering of the variant storage engine.
//!
//! Two interchangeable strategies produce the nested `VariantType` of a union
//! composite: an alias of the library sum type `std::variant`, or a hand-built
//! class owning aligned raw storage and a discriminant. Both expose
//! `index()`, `emplace<I>(...)` and index-based access, so the accessors the
//! assembler renders differ only in how they reach an alternative.

use std::collections::BTreeSet;

use crate::generator::source::SourceWriter;

/// Standard headers the fallback class needs.
pub const FALLBACK_HEADERS: &[&str] = &[
    "algorithm",
    "cstddef",
    "initializer_list",
    "new",
    "tuple",
    "type_traits",
    "utility",
];

/// Standard headers the library strategy needs.
pub const LIBRARY_HEADERS: &[&str] = &["cstddef", "utility", "variant"];

/// How the union member is reached from generated accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantRendering {
    /// `std::variant`
    Library,

    /// Hand-built tagged union
    Fallback,
}

impl VariantRendering {
    /// Add the standard headers this rendering needs.
    pub fn collect_headers(self, out: &mut BTreeSet<&'static str>) {
        let headers = match self {
            Self::Library => LIBRARY_HEADERS,
            Self::Fallback => FALLBACK_HEADERS,
        };
        out.extend(headers.iter().copied());
    }

    /// Expression yielding a pointer to alternative `index_expr` of `member`, or null.
    pub fn get_if(self, member: &str, index_expr: &str) -> String {
        match self {
            Self::Library => format!("std::get_if<{}>(&{})", index_expr, member),
            Self::Fallback => format!("{}.get_if<{}>()", member, index_expr),
        }
    }

    /// Render the `VariantType` declaration for `alternatives` (C++ types in index order).
    pub fn render(self, w: &mut SourceWriter, type_label: &str, alternatives: &[String]) {
        match self {
            Self::Library => render_library(w, alternatives),
            Self::Fallback => render_fallback(w, type_label, alternatives),
        }
    }
}

fn render_library(w: &mut SourceWriter, alternatives: &[String]) {
    w.line(format!(
        "using VariantType = std::variant<{}>;",
        alternatives.join(", ")
    ));
}

/// Render the hand-built tagged union.
///
/// Storage is an `unsigned char` block as large as the largest alternative
/// and aligned for the most aligned one. The discriminant `tag_` is the
/// index of the live alternative, or `npos` while none is. A move leaves the
/// source destroyed and set to `npos`, so the moved-from alternative is
/// destroyed exactly once.
fn render_fallback(w: &mut SourceWriter, type_label: &str, alternatives: &[String]) {
    let count = alternatives.len();
    let sizes: Vec<String> = alternatives.iter().map(|t| format!("sizeof({})", t)).collect();
    let aligns: Vec<String> = alternatives.iter().map(|t| format!("alignof({})", t)).collect();
    let nothrow: Vec<String> = alternatives
        .iter()
        .map(|t| format!("std::is_nothrow_move_constructible<{}>::value", t))
        .collect();

    w.line("/// Tagged-union storage holding exactly one alternative at a time.");
    w.line("class VariantType final");
    w.line("{");
    w.line("public:");
    w.indent();
    w.line(format!("using alternatives = std::tuple<{}>;", alternatives.join(", ")));
    w.blank();
    w.line("template <std::size_t I>");
    w.line("using alternative_t = typename std::tuple_element<I, alternatives>::type;");
    w.blank();
    w.line("static constexpr std::size_t npos = static_cast<std::size_t>(-1);");
    w.line(format!("static constexpr std::size_t alternative_count = {}U;", count));
    w.line(format!(
        "static constexpr std::size_t storage_size = std::max({{{}}});",
        sizes.join(", ")
    ));
    w.line(format!(
        "static constexpr std::size_t storage_alignment = std::max({{{}}});",
        aligns.join(", ")
    ));
    w.line(format!(
        "static constexpr bool nothrow_movable = {};",
        nothrow.join(" && ")
    ));
    w.blank();
    w.line("static_assert(std::is_default_constructible<alternative_t<0>>::value,");
    w.line(format!(
        "{}\"{}: alternative 0 must be default-constructible\");",
        w.unit(),
        type_label
    ));
    w.blank();

    // Construction and assignment
    w.line("VariantType()");
    w.open_block();
    w.line("emplace<0>();");
    w.close_block("}");
    w.blank();
    w.line("VariantType(const VariantType& other)");
    w.open_block();
    w.line("copy_from(other);");
    w.close_block("}");
    w.blank();
    w.line("VariantType(VariantType&& other) noexcept(nothrow_movable)");
    w.open_block();
    w.line("move_from(std::move(other));");
    w.close_block("}");
    w.blank();
    w.line("VariantType& operator=(const VariantType& other)");
    w.open_block();
    w.line("if (this != &other)");
    w.open_block();
    w.line("destroy();");
    w.line("copy_from(other);");
    w.close_block("}");
    w.line("return *this;");
    w.close_block("}");
    w.blank();
    w.line("VariantType& operator=(VariantType&& other) noexcept(nothrow_movable)");
    w.open_block();
    w.line("if (this != &other)");
    w.open_block();
    w.line("destroy();");
    w.line("move_from(std::move(other));");
    w.close_block("}");
    w.line("return *this;");
    w.close_block("}");
    w.blank();
    w.line("~VariantType()");
    w.open_block();
    w.line("destroy();");
    w.close_block("}");
    w.blank();

    // Inspection
    w.line("std::size_t index() const noexcept");
    w.open_block();
    w.line("return tag_;");
    w.close_block("}");
    w.blank();
    w.line("bool valueless() const noexcept");
    w.open_block();
    w.line("return tag_ == npos;");
    w.close_block("}");
    w.blank();

    // Mutation
    w.line("template <std::size_t I, typename... Args>");
    w.line("alternative_t<I>& emplace(Args&&... args)");
    w.open_block();
    w.line("static_assert(I < alternative_count, \"alternative index out of range\");");
    w.line("destroy();");
    w.line("alternative_t<I>* const value =");
    w.line(format!(
        "{}new (static_cast<void*>(storage_)) alternative_t<I>(std::forward<Args>(args)...);",
        w.unit()
    ));
    w.line("tag_ = I;");
    w.line("return *value;");
    w.close_block("}");
    w.blank();
    w.line("template <std::size_t I>");
    w.line("alternative_t<I>* get_if() noexcept");
    w.open_block();
    w.line("return (tag_ == I) ? ptr<I>() : nullptr;");
    w.close_block("}");
    w.blank();
    w.line("template <std::size_t I>");
    w.line("const alternative_t<I>* get_if() const noexcept");
    w.open_block();
    w.line("return (tag_ == I) ? ptr<I>() : nullptr;");
    w.close_block("}");
    w.blank();
    w.line("void destroy() noexcept");
    w.open_block();
    render_dispatch(w, "tag_", count, |i| format!("destroy_at(ptr<{}>());", i));
    w.line("tag_ = npos;");
    w.close_block("}");
    w.blank();
    w.dedent();

    w.line("private:");
    w.indent();
    w.line("template <std::size_t I>");
    w.line("alternative_t<I>* ptr() noexcept");
    w.open_block();
    w.line("return reinterpret_cast<alternative_t<I>*>(static_cast<void*>(storage_));");
    w.close_block("}");
    w.blank();
    w.line("template <std::size_t I>");
    w.line("const alternative_t<I>* ptr() const noexcept");
    w.open_block();
    w.line(
        "return reinterpret_cast<const alternative_t<I>*>(static_cast<const void*>(storage_));",
    );
    w.close_block("}");
    w.blank();
    w.line("template <typename T>");
    w.line("static void destroy_at(T* const value) noexcept");
    w.open_block();
    w.line("value->~T();");
    w.close_block("}");
    w.blank();
    w.line("void copy_from(const VariantType& other)");
    w.open_block();
    render_dispatch(w, "other.tag_", count, |i| {
        format!(
            "new (static_cast<void*>(storage_)) alternative_t<{i}>(*other.ptr<{i}>());",
            i = i
        )
    });
    w.line("tag_ = other.tag_;");
    w.close_block("}");
    w.blank();
    w.line("void move_from(VariantType&& other) noexcept(nothrow_movable)");
    w.open_block();
    render_dispatch(w, "other.tag_", count, |i| {
        format!(
            "new (static_cast<void*>(storage_)) alternative_t<{i}>(std::move(*other.ptr<{i}>()));",
            i = i
        )
    });
    w.line("tag_ = other.tag_;");
    w.line("other.destroy();");
    w.close_block("}");
    w.blank();
    w.line("std::size_t tag_ = npos;");
    w.line("alignas(storage_alignment) unsigned char storage_[storage_size];");
    w.dedent();
    w.line("};");
}

/// Render a `switch` over `tag` with one case per alternative.
fn render_dispatch(
    w: &mut SourceWriter,
    tag: &str,
    count: usize,
    action: impl Fn(usize) -> String,
) {
    w.line(format!("switch ({})", tag));
    w.line("{");
    for i in 0..count {
        w.line(format!("case {}U:", i));
        w.indent();
        w.line(action(i));
        w.line("break;");
        w.dedent();
    }
    w.line("default:");
    w.indent();
    w.line("break;");
    w.dedent();
    w.line("}");
}
