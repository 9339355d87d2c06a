//! Provenance comment block.
//!
//! The block records generator identity, source path, generation timestamp,
//! type version and the active options. It is informational only and is the
//! single non-deterministic part of generated output, so it can be omitted,
//! pinned, or stripped before comparing outputs.

use super::source::SourceWriter;
use super::traits::{GeneratorConfig, IndentStyle};
use crate::ir::LanguageOptions;

/// First line of every provenance block.
pub const PROVENANCE_MARKER: &str = "This is an AUTO-GENERATED file. Do not edit.";

/// Generator identity written into provenance blocks.
pub const GENERATOR_IDENTITY: &str = concat!("dtgen ", env!("CARGO_PKG_VERSION"));

/// Contents of one provenance block.
#[derive(Debug, Clone)]
pub struct Provenance<'a> {
    /// Backend identifier, e.g. `cpp`
    pub backend: &'a str,

    /// Path of the definition the artifact was generated from
    pub source: &'a str,

    /// Human-readable artifact identity, e.g. `pkg.Msg 1.0`
    pub subject: String,

    /// Effective language options
    pub options: &'a LanguageOptions,
}

impl Provenance<'_> {
    /// Render the block as `//` comment lines followed by a blank line.
    ///
    /// Returns an empty string when the configuration omits provenance.
    pub fn render(&self, config: &GeneratorConfig) -> String {
        let Some(timestamp) = config.provenance.timestamp() else {
            return String::new();
        };

        let mut w = SourceWriter::new(IndentStyle::Spaces4);
        w.line(format!("// {}", PROVENANCE_MARKER));
        w.line("//");
        w.line(format!("// Generator:  {} ({})", GENERATOR_IDENTITY, self.backend));
        w.line(format!("// Source:     {}", self.source));
        w.line(format!("// Type:       {}", self.subject));
        w.line(format!("// Generated:  {}", timestamp));
        if !self.options.is_empty() {
            w.line("// Options:");
            for (name, value) in self.options.iter() {
                w.line(format!("//     {} = {}", name, value));
            }
        }
        w.blank();
        w.finish()
    }
}

/// Remove a leading provenance block from `text`.
///
/// The block runs from the marker line to the first blank line, inclusive.
/// Text without a leading block is returned unchanged.
pub fn strip_provenance(text: &str) -> &str {
    let first_line = text.lines().next().unwrap_or_default();
    if !first_line.contains(PROVENANCE_MARKER) {
        return text;
    }

    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        offset += line.len();
        if line.trim().is_empty() {
            return &text[offset..];
        }
    }
    ""
}
