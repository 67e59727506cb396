//! Schema types
//!
//! Value kinds observed during folding and the resolved type tree handed to
//! the emitter.

use crate::types::{capitalize_first, Category, JsonValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Structural class of a decoded JSON value
///
/// Ordering is significant: kind sets iterate in declaration order, which
/// keeps diagnostics stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    String,
    Integer,
    Float,
    Boolean,
    List,
    Object,
    Null,
}

impl Kind {
    /// Classify a decoded value
    pub fn of(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Kind::Null,
            JsonValue::Bool(_) => Kind::Boolean,
            JsonValue::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    Kind::Integer
                } else {
                    Kind::Float
                }
            }
            JsonValue::String(_) => Kind::String,
            JsonValue::Array(_) => Kind::List,
            JsonValue::Object(_) => Kind::Object,
        }
    }

    /// The primitive this kind maps to, if any
    pub fn primitive(self) -> Option<Primitive> {
        match self {
            Kind::String => Some(Primitive::String),
            Kind::Integer => Some(Primitive::Integer),
            Kind::Float => Some(Primitive::Float),
            Kind::Boolean => Some(Primitive::Boolean),
            Kind::List | Kind::Object | Kind::Null => None,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::String => write!(f, "string"),
            Kind::Integer => write!(f, "integer"),
            Kind::Float => write!(f, "float"),
            Kind::Boolean => write!(f, "boolean"),
            Kind::List => write!(f, "list"),
            Kind::Object => write!(f, "object"),
            Kind::Null => write!(f, "null"),
        }
    }
}

/// Scalar type a field can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    String,
    Integer,
    Float,
    Boolean,
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Primitive::String => write!(f, "string"),
            Primitive::Integer => write!(f, "int"),
            Primitive::Float => write!(f, "float"),
            Primitive::Boolean => write!(f, "bool"),
        }
    }
}

/// Resolved type of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeDescriptor {
    Primitive(Primitive),
    /// Registered enumeration, by type name
    Enum(String),
    /// Synthesized nested struct, by type name
    Struct(String),
    List(Box<TypeDescriptor>),
    /// Evidence was missing or contradictory
    Raw,
}

impl TypeDescriptor {
    pub fn is_raw(&self) -> bool {
        matches!(self, TypeDescriptor::Raw)
    }

    /// Rename a synthesized struct reference, including inside lists
    pub fn rename_struct(&mut self, from: &str, to: &str) {
        match self {
            TypeDescriptor::Struct(name) if name == from => *name = to.to_string(),
            TypeDescriptor::List(inner) => inner.rename_struct(from, to),
            _ => {}
        }
    }
}

/// Why a field degraded to the raw type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Only null was ever observed
    AlwaysNull,
    /// Only empty lists or empty objects were observed
    AlwaysEmpty,
    /// List elements were seen with more than one kind
    MixedListElements,
    /// List elements were themselves lists
    ListOfLists,
    /// The field itself was seen with several kinds
    MultipleKinds { kinds: Vec<Kind>, nullable: bool },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::AlwaysNull => write!(
                f,
                "Type is unknown because the value was always null in observed data"
            ),
            Diagnostic::AlwaysEmpty => write!(f, "Always empty in observed data"),
            Diagnostic::MixedListElements => {
                write!(f, "WARNING: Unhandled type \"list of mixed-type elements\"")
            }
            Diagnostic::ListOfLists => write!(f, "WARNING: Unhandled type \"list of lists\""),
            Diagnostic::MultipleKinds { kinds, nullable } => {
                let names: Vec<String> = kinds
                    .iter()
                    .map(|kind| match kind.primitive() {
                        Some(primitive) => primitive.to_string(),
                        None if *kind == Kind::List => "List".to_string(),
                        None if *kind == Kind::Object => "Object".to_string(),
                        None => kind.to_string(),
                    })
                    .collect();
                write!(f, "Can be multiple types: {}", names.join(" or "))?;
                if *nullable {
                    write!(f, " (or null)")?;
                }
                Ok(())
            }
        }
    }
}

/// One resolved field of a struct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Never set together with a raw type
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
}

/// A named struct declaration: either a category root or a follow-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStruct {
    pub name: String,
    pub fields: Vec<ResolvedField>,
}

impl ResolvedStruct {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get a field by its JSON name
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Enumeration extracted from a designated field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDefinition {
    /// Type name (capitalized field name)
    pub name: String,
    /// Field name the values were collected from
    pub field_name: String,
    /// Distinct non-empty values, sorted
    pub values: Vec<String>,
    /// Whether an empty string was observed
    pub has_blank: bool,
}

impl EnumDefinition {
    /// Build from the raw set of observed strings
    pub fn from_values(field_name: &str, observed: &BTreeSet<String>) -> Self {
        Self {
            name: capitalize_first(field_name),
            field_name: field_name.to_string(),
            values: observed.iter().filter(|v| !v.is_empty()).cloned().collect(),
            has_blank: observed.contains(""),
        }
    }
}

/// Resolved output for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySchema {
    pub category: Category,
    pub root: ResolvedStruct,
    /// Synthesized structs, depth-first in declaration order
    pub follow_ups: Vec<ResolvedStruct>,
    /// Enums claimed by this category
    pub enums: Vec<EnumDefinition>,
}

impl CategorySchema {
    /// Find a follow-up struct by name
    pub fn follow_up(&self, name: &str) -> Option<&ResolvedStruct> {
        self.follow_ups.iter().find(|s| s.name == name)
    }
}

/// Everything the emitter needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSchema {
    pub categories: Vec<CategorySchema>,
    /// Enums with observed values that no category contains
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unclaimed_enums: Vec<String>,
}

impl ResolvedSchema {
    pub fn category(&self, category: Category) -> Option<&CategorySchema> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// True when every category root has no fields
    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.root.is_empty())
    }

    /// Serialize to pretty JSON
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
