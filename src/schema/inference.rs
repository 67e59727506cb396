//! Folding records into field trees and resolving them into a schema

use super::field::{FieldModel, FollowUp, Resolution};
use super::fingerprint::Fingerprint;
use super::types::{CategorySchema, EnumDefinition, ResolvedField, ResolvedSchema, ResolvedStruct};
use crate::types::{Category, JsonObject, JsonValue};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, warn};

/// Field name to model, for one struct level
pub type FieldTree = BTreeMap<String, FieldModel>;

/// Evidence collected over one run
#[derive(Debug, Clone, Default)]
pub struct SchemaAccumulator {
    root_trees: BTreeMap<Category, FieldTree>,
    enum_registry: BTreeMap<String, BTreeSet<String>>,
    sent_shapes: BTreeSet<Fingerprint>,
}

impl SchemaAccumulator {
    /// Create an empty accumulator with no enum designations
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator tracking the given enum field names
    pub fn with_enum_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut accumulator = Self::new();
        for name in names {
            accumulator.register_enum(name);
        }
        accumulator
    }

    /// Designate a field name as an enumeration
    pub fn register_enum(&mut self, name: impl Into<String>) {
        self.enum_registry.entry(name.into()).or_default();
    }

    /// Fold every field of a record into the category's tree
    pub fn fold(&mut self, category: Category, record: &JsonObject) {
        let tree = self.root_trees.entry(category).or_default();
        for (name, value) in record {
            tree.entry(name.clone())
                .or_insert_with(|| FieldModel::new(name.clone()))
                .observe(value);
        }
    }

    /// Record string values of designated enum fields, at any depth
    pub fn track_enums(&mut self, value: &JsonValue) {
        if self.enum_registry.is_empty() {
            return;
        }
        match value {
            JsonValue::Object(map) => {
                for (key, child) in map {
                    if let (Some(values), JsonValue::String(s)) =
                        (self.enum_registry.get_mut(key), child)
                    {
                        values.insert(s.clone());
                    }
                    self.track_enums(child);
                }
            }
            JsonValue::Array(items) => {
                for item in items {
                    self.track_enums(item);
                }
            }
            _ => {}
        }
    }

    /// Record the shape of an outgoing message
    pub fn record_sent(&mut self, message: &JsonObject, key_fields: &[String]) {
        self.sent_shapes.insert(Fingerprint::of(message, key_fields));
    }

    /// Top-level fields observed for a category
    pub fn root_tree(&self, category: Category) -> Option<&FieldTree> {
        self.root_trees.get(&category)
    }

    pub fn enum_registry(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.enum_registry
    }

    pub fn sent_shapes(&self) -> &BTreeSet<Fingerprint> {
        &self.sent_shapes
    }

    /// Resolve every category tree into declarations for the emitter
    ///
    /// Root fields see the registered enum names; follow-up structs resolve
    /// with none. Every registered enum a category contains is declared by the
    /// first such category, even with no observed values, so each enum type
    /// a field refers to exists. Widening applied during resolution stays on
    /// the models.
    pub fn resolve_all(&mut self, game_name: &str) -> ResolvedSchema {
        let enum_names: BTreeSet<String> = self.enum_registry.keys().cloned().collect();
        let mut unclaimed: Vec<String> = enum_names.iter().cloned().collect();

        let mut namer = TypeNamer::default();
        let root_names: Vec<String> = Category::ALL
            .iter()
            .map(|category| format!("{game_name}{}", category.name()))
            .collect();
        for name in &root_names {
            namer.claim(name);
        }

        let mut categories = Vec::with_capacity(Category::ALL.len());
        for (category, root_name) in Category::ALL.into_iter().zip(root_names) {
            let tree = self.root_trees.entry(category).or_default();

            let mut enums = Vec::new();
            unclaimed.retain(|name| {
                if tree_contains(tree, name) {
                    enums.push(EnumDefinition::from_values(name, &self.enum_registry[name]));
                    false
                } else {
                    true
                }
            });

            let (fields, pending) = resolve_fields(tree, &enum_names, category.name(), &mut namer);
            let mut follow_ups = Vec::new();
            resolve_follow_ups(pending, &mut namer, &mut follow_ups);
            debug!(
                category = %category,
                fields = fields.len(),
                follow_ups = follow_ups.len(),
                enums = enums.len(),
                "Resolved category"
            );

            categories.push(CategorySchema {
                category,
                root: ResolvedStruct {
                    name: root_name,
                    fields,
                },
                follow_ups,
                enums,
            });
        }

        // Enums no field uses only matter if something was observed for them
        unclaimed.retain(|name| !self.enum_registry[name].is_empty());
        for name in &unclaimed {
            warn!("Enum '{name}' has values but no Player or Room field uses it");
        }

        ResolvedSchema {
            categories,
            unclaimed_enums: unclaimed,
        }
    }
}

fn tree_contains(tree: &FieldTree, name: &str) -> bool {
    tree.contains_key(name) || tree.values().any(|model| model.contains_field(name))
}

/// Hands out struct names, suffixing any that were already issued
#[derive(Debug, Default)]
struct TypeNamer {
    used: HashSet<String>,
}

impl TypeNamer {
    fn claim(&mut self, candidate: &str) -> String {
        if self.used.insert(candidate.to_string()) {
            return candidate.to_string();
        }
        let mut n = 2;
        loop {
            let name = format!("{candidate}{n}");
            if self.used.insert(name.clone()) {
                warn!("Synthesized type name '{candidate}' already used, renamed to '{name}'");
                return name;
            }
            n += 1;
        }
    }
}

type Pending<'a> = Vec<(String, &'a mut FieldTree)>;

fn resolve_fields<'a>(
    tree: &'a mut FieldTree,
    enum_names: &BTreeSet<String>,
    name_prefix: &str,
    namer: &mut TypeNamer,
) -> (Vec<ResolvedField>, Pending<'a>) {
    let mut fields = Vec::with_capacity(tree.len());
    let mut pending = Vec::new();

    for model in tree.values_mut() {
        let Resolution {
            mut field,
            follow_up,
        } = model.resolve(enum_names, name_prefix);

        if let Some(FollowUp {
            type_name,
            fields: children,
        }) = follow_up
        {
            let unique = namer.claim(&type_name);
            if unique != type_name {
                field.ty.rename_struct(&type_name, &unique);
            }
            pending.push((unique, children));
        }
        fields.push(field);
    }

    (fields, pending)
}

fn resolve_follow_ups(pending: Pending<'_>, namer: &mut TypeNamer, out: &mut Vec<ResolvedStruct>) {
    let no_enums = BTreeSet::new();
    for (type_name, tree) in pending {
        let (fields, nested) = resolve_fields(tree, &no_enums, &type_name, namer);
        out.push(ResolvedStruct {
            name: type_name,
            fields,
        });
        resolve_follow_ups(nested, namer, out);
    }
}
