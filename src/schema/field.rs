//! Per-field evidence accumulation and type resolution

use super::types::{Diagnostic, Kind, ResolvedField, TypeDescriptor};
use crate::types::{capitalize_first, JsonValue};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Key of the synthetic child that models list elements
pub const LIST_ENTRY: &str = "entry";

/// Accumulated kind, nullability and child evidence for one named field
///
/// Children are kept sorted by name so field order never depends on the
/// order samples were observed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldModel {
    name: String,
    kinds: BTreeSet<Kind>,
    nullable: bool,
    children: BTreeMap<String, FieldModel>,
}

/// Outcome of resolving one field
#[derive(Debug)]
pub struct Resolution<'a> {
    pub field: ResolvedField,
    /// Present when the field resolved to a synthesized struct
    pub follow_up: Option<FollowUp<'a>>,
}

/// Request to resolve the fields of a synthesized struct
#[derive(Debug)]
pub struct FollowUp<'a> {
    pub type_name: String,
    pub fields: &'a mut BTreeMap<String, FieldModel>,
}

/// Which children a synthesized type is built from
enum Synthesis {
    Object(String),
    ListEntry(String),
}

struct Classification {
    ty: TypeDescriptor,
    diagnostic: Option<Diagnostic>,
    synthesis: Option<Synthesis>,
}

impl Classification {
    fn plain(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            diagnostic: None,
            synthesis: None,
        }
    }

    fn raw(diagnostic: Diagnostic) -> Self {
        Self {
            ty: TypeDescriptor::Raw,
            diagnostic: Some(diagnostic),
            synthesis: None,
        }
    }
}

impl FieldModel {
    /// Create an empty model; it only becomes meaningful once observed
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kinds: BTreeSet::new(),
            nullable: false,
            children: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kinds observed so far (never contains `Kind::Null`)
    pub fn kinds(&self) -> &BTreeSet<Kind> {
        &self.kinds
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn children(&self) -> &BTreeMap<String, FieldModel> {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&FieldModel> {
        self.children.get(name)
    }

    /// The list element model, if any non-empty list was observed
    pub fn entry(&self) -> Option<&FieldModel> {
        self.children.get(LIST_ENTRY)
    }

    /// Fold one observed value into the model
    pub fn observe(&mut self, value: &JsonValue) {
        let kind = Kind::of(value);
        if kind == Kind::Null {
            self.nullable = true;
            return;
        }
        self.kinds.insert(kind);

        match value {
            // Only the first element is sampled
            JsonValue::Array(items) => {
                if let Some(first) = items.first() {
                    self.children
                        .entry(LIST_ENTRY.to_string())
                        .or_insert_with(|| FieldModel::new(LIST_ENTRY))
                        .observe(first);
                }
            }
            JsonValue::Object(map) => {
                for (key, child_value) in map {
                    self.children
                        .entry(key.clone())
                        .or_insert_with(|| FieldModel::new(key.clone()))
                        .observe(child_value);
                }
            }
            _ => {}
        }
    }

    /// Collapse {integer, float} to {float}. Returns true if the set changed.
    pub fn widen_numeric(&mut self) -> bool {
        let numeric_only = self.kinds.len() == 2
            && self.kinds.contains(&Kind::Integer)
            && self.kinds.contains(&Kind::Float);
        if numeric_only {
            self.kinds.remove(&Kind::Integer);
        }
        numeric_only
    }

    /// Whether a field with this name exists anywhere below this model
    pub fn contains_field(&self, name: &str) -> bool {
        self.children.contains_key(name) || self.children.values().any(|c| c.contains_field(name))
    }

    /// Resolve the final type of this field
    ///
    /// Widening is applied first and sticks. Synthesized struct names are
    /// `name_prefix` followed by the capitalized field name.
    pub fn resolve(&mut self, enum_names: &BTreeSet<String>, name_prefix: &str) -> Resolution<'_> {
        self.widen_numeric();
        let Classification {
            ty,
            diagnostic,
            synthesis,
        } = self.classify(enum_names, name_prefix);

        let field = ResolvedField {
            name: self.name.clone(),
            nullable: self.nullable && !ty.is_raw(),
            ty,
            diagnostic,
        };

        let follow_up = match synthesis {
            Some(Synthesis::Object(type_name)) => Some(FollowUp {
                type_name,
                fields: &mut self.children,
            }),
            Some(Synthesis::ListEntry(type_name)) => {
                self.children
                    .get_mut(LIST_ENTRY)
                    .map(|entry| FollowUp {
                        type_name,
                        fields: &mut entry.children,
                    })
            }
            None => None,
        };

        Resolution { field, follow_up }
    }

    fn classify(&self, enum_names: &BTreeSet<String>, name_prefix: &str) -> Classification {
        if enum_names.contains(&self.name) {
            return Classification::plain(TypeDescriptor::Enum(capitalize_first(&self.name)));
        }

        let mut kinds = self.kinds.iter().copied();
        match (kinds.next(), kinds.next()) {
            (None, _) => Classification::raw(Diagnostic::AlwaysNull),
            (Some(kind), None) => self.classify_single(kind, name_prefix),
            (Some(_), Some(_)) => Classification::raw(Diagnostic::MultipleKinds {
                kinds: self.kinds.iter().copied().collect(),
                nullable: self.nullable,
            }),
        }
    }

    fn classify_single(&self, kind: Kind, name_prefix: &str) -> Classification {
        match kind {
            Kind::List => self.classify_list(name_prefix),
            Kind::Object if self.children.is_empty() => {
                Classification::raw(Diagnostic::AlwaysEmpty)
            }
            Kind::Object => {
                let type_name = self.synthesized_name(name_prefix);
                Classification {
                    ty: TypeDescriptor::Struct(type_name.clone()),
                    diagnostic: None,
                    synthesis: Some(Synthesis::Object(type_name)),
                }
            }
            _ => match kind.primitive() {
                Some(primitive) => Classification::plain(TypeDescriptor::Primitive(primitive)),
                None => Classification::raw(Diagnostic::AlwaysNull),
            },
        }
    }

    fn classify_list(&self, name_prefix: &str) -> Classification {
        let Some(entry) = self.entry().filter(|e| !e.kinds.is_empty()) else {
            return Classification::raw(Diagnostic::AlwaysEmpty);
        };
        if entry.kinds.len() > 1 {
            return Classification::raw(Diagnostic::MixedListElements);
        }

        match entry.kinds.first().copied() {
            Some(Kind::List) => Classification::raw(Diagnostic::ListOfLists),
            Some(Kind::Object) if entry.children.is_empty() => {
                Classification::raw(Diagnostic::AlwaysEmpty)
            }
            Some(Kind::Object) => {
                let type_name = self.synthesized_name(name_prefix);
                Classification {
                    ty: TypeDescriptor::List(Box::new(TypeDescriptor::Struct(type_name.clone()))),
                    diagnostic: None,
                    synthesis: Some(Synthesis::ListEntry(type_name)),
                }
            }
            Some(kind) => match kind.primitive() {
                Some(primitive) => Classification::plain(TypeDescriptor::List(Box::new(
                    TypeDescriptor::Primitive(primitive),
                ))),
                None => Classification::raw(Diagnostic::AlwaysEmpty),
            },
            None => Classification::raw(Diagnostic::AlwaysEmpty),
        }
    }

    fn synthesized_name(&self, name_prefix: &str) -> String {
        format!("{name_prefix}{}", capitalize_first(&self.name))
    }
}
