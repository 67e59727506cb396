//! Human-readable reports of the collected evidence

use crate::schema::{FieldModel, FieldTree, Fingerprint, Kind};
use std::collections::{BTreeMap, BTreeSet};

/// Dump a field tree, one line per field, nested fields indented
pub fn render_field_tree(tree: &FieldTree) -> String {
    let mut out = String::new();
    for model in tree.values() {
        render_field(&mut out, model, 0);
    }
    out
}

fn render_field(out: &mut String, model: &FieldModel, indent: usize) {
    let header = format!("    {}{} ->", " ".repeat(indent), model.name());
    let null_suffix = if model.is_nullable() { " (can be NULL)" } else { "" };
    let mut kinds = model.kinds().iter();
    let single = match (kinds.next(), kinds.next()) {
        (Some(kind), None) => Some(*kind),
        _ => None,
    };

    match (single, model.children().is_empty()) {
        (None, _) if model.kinds().len() > 1 => {
            out.push_str(&format!("{header} Complex Type ({})\n", kind_list(model)));
        }
        (Some(Kind::List), false) => match model.entry() {
            Some(entry) if entry.kinds().len() > 1 => {
                out.push_str(&format!("{header} WARNING: list of mixed-type elements\n"));
            }
            Some(entry) if entry.kinds().contains(&Kind::List) => {
                out.push_str(&format!("{header} WARNING: list of lists\n"));
            }
            Some(entry) if entry.kinds().contains(&Kind::Object) => {
                out.push_str(&format!("{header} list{null_suffix}:\n"));
                render_field(out, entry, indent + 4);
            }
            Some(entry) => {
                out.push_str(&format!("{header} list[{}]{null_suffix}\n", kind_list(entry)));
            }
            None => {
                out.push_str(&format!("{header} list[unknown]{null_suffix}\n"));
            }
        },
        (Some(Kind::Object), false) => {
            out.push_str(&format!("{header} object{null_suffix}:\n"));
            for child in model.children().values() {
                render_field(out, child, indent + 4);
            }
        }
        _ => {
            out.push_str(&format!("{header} {}\n", kind_list(model)));
        }
    }
}

fn kind_list(model: &FieldModel) -> String {
    let mut parts: Vec<String> = model.kinds().iter().map(ToString::to_string).collect();
    if model.is_nullable() {
        parts.push("NULL".to_string());
    }
    parts.join(" ")
}

/// List every tracked enum with its observed values
pub fn render_enum_registry(registry: &BTreeMap<String, BTreeSet<String>>) -> String {
    let mut out = String::new();
    for (name, values) in registry {
        let quoted: Vec<String> = values.iter().map(|v| format!("{v:?}")).collect();
        out.push_str(&format!("    {name} values: {{{}}}\n", quoted.join(", ")));
    }
    out
}

/// One `Sent = { ... }` block per distinct message shape
pub fn render_sent_shapes(shapes: &BTreeSet<Fingerprint>) -> String {
    let mut out = String::new();
    for shape in shapes {
        out.push_str(&format!("\n{shape}\n"));
    }
    out
}
