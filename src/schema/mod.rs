//! Schema inference module
//!
//! Infers structural types from loosely-typed sample messages.
//!
//! # Features
//!
//! - **Kind Tracking**: Every observation contributes one kind or marks nullability
//! - **Order Independence**: Resolution does not depend on sample order
//! - **Numeric Widening**: Fields seen as both integer and float resolve to float
//! - **Struct Synthesis**: Nested objects and lists of objects become named types
//! - **Enum Extraction**: Designated string fields become enumerations
//! - **Raw Fallback**: Unrepresentable shapes resolve to raw with a diagnostic

mod field;
mod fingerprint;
mod inference;
mod types;

pub use field::{FieldModel, FollowUp, Resolution, LIST_ENTRY};
pub use fingerprint::{Fingerprint, ID_PLACEHOLDER};
pub use inference::{FieldTree, SchemaAccumulator};
pub use types::{
    CategorySchema, Diagnostic, EnumDefinition, Kind, Primitive, ResolvedField, ResolvedSchema,
    ResolvedStruct, TypeDescriptor,
};

#[cfg(test)]
mod tests;
