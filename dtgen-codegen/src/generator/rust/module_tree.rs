//! Module tree index files.
//!
//! Rust has no header includes, so the namespace nesting of a batch is
//! realised by one `mod.rs` per namespace directory. Each declares its child
//! namespaces and type modules and re-exports the types.

use std::collections::{BTreeMap, BTreeSet};

use super::identifiers::{module_name, namespace_modules, type_name};
use super::MODULE_ATTRIBUTES;
use crate::generator::provenance::Provenance;
use crate::generator::source::SourceWriter;
use crate::generator::traits::{GeneratedCode, GeneratorConfig};
use crate::ir::{LanguageOptions, TypeDescriptor};

#[derive(Debug, Default)]
struct Node {
    namespaces: BTreeSet<String>,

    /// `(module, type)` pairs
    types: BTreeSet<(String, String)>,
}

/// Build the `mod.rs` files for a batch of descriptors.
///
/// Files are returned in path order, the root `mod.rs` first.
pub fn build_module_tree(
    descriptors: &[&TypeDescriptor],
    config: &GeneratorConfig,
) -> Vec<GeneratedCode> {
    let mut nodes: BTreeMap<Vec<String>, Node> = BTreeMap::new();
    nodes.entry(Vec::new()).or_default();

    for descriptor in descriptors {
        let namespace = namespace_modules(&descriptor.full_name);
        for depth in 0..namespace.len() {
            nodes
                .entry(namespace[..depth].to_vec())
                .or_default()
                .namespaces
                .insert(namespace[depth].clone());
        }
        nodes.entry(namespace).or_default().types.insert((
            module_name(descriptor.short_name(), descriptor.version),
            type_name(descriptor.short_name(), descriptor.version),
        ));
    }

    let options = LanguageOptions::new();
    nodes
        .iter()
        .map(|(path, node)| {
            let mut w = SourceWriter::new(config.indent);
            let subject = if path.is_empty() {
                "crate root".to_string()
            } else {
                path.join("::")
            };
            w.lines(
                &Provenance {
                    backend: "rust",
                    source: "<module tree>",
                    subject,
                    options: &options,
                }
                .render(config),
            );
            w.line(MODULE_ATTRIBUTES);
            w.blank();
            for namespace in &node.namespaces {
                w.line(format!("pub mod {};", namespace));
            }
            for (module, _) in &node.types {
                w.line(format!("pub mod {};", module));
            }
            if !node.types.is_empty() {
                w.blank();
                for (module, ty) in &node.types {
                    w.line(format!("pub use {}::{};", module, ty));
                }
            }

            let mut file = path.join("/");
            if !file.is_empty() {
                file.push('/');
            }
            file.push_str("mod.rs");
            GeneratedCode::new(config.finish(w.finish()), file)
        })
        .collect()
}
