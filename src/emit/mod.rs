//! C# model emission module
//!
//! Renders a resolved schema as Newtonsoft.Json-annotated C# structs and
//! enums, plus client/engine templates for a newly modelled game.

mod csharp;
mod naming;
mod scaffold;

pub use csharp::{cs_type, render_enum, render_model_file, render_struct, GENERATED_BANNER};
pub use naming::{enum_members, property_name, property_names, to_identifier, EnumMember};
pub use scaffold::{client_template, engine_template, scaffold_files};

use std::path::PathBuf;

/// A file to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl RenderedFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}
