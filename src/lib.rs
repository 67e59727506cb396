// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # jb-schema-gen
//!
//! Infers typed models from captured Jackbox game messages and emits them as
//! C# structs and enums for a bot client project.
//!
//! ## Features
//!
//! - **Capture Extraction**: Pulls JSON messages out of noisy log text
//! - **Protocol Routing**: Sorts messages into Player and Room state, ignoring the rest
//! - **Order-Independent Inference**: Kinds, nullability and numeric widening per field
//! - **Enum Extraction**: Designated string fields become enumerations
//! - **C# Emission**: Newtonsoft.Json-annotated models plus client/engine templates
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jb_schema_gen::{engine::Generator, GeneratorConfig, Result};
//!
//! fn main() -> Result<()> {
//!     let generator = Generator::new(GeneratorConfig::default());
//!     let capture = jb_schema_gen::extract::load_capture_dir("captures/quiz".as_ref())?;
//!     let analysis = generator.analyze(&capture, "Quiz");
//!     generator.write_all(&analysis)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! capture text ──► extract ──► protocol ──► schema ──► emit ──► .cs files
//!                  (objects)   (routing)    (resolve)  (C#)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Generator configuration
pub mod config;

/// JSON extraction from capture files
pub mod extract;

/// Message routing by opcode and entity key
pub mod protocol;

/// Schema inference from JSON data
pub mod schema;

/// C# model emission
pub mod emit;

/// Pipeline orchestration
pub mod engine;

/// Human-readable reports
pub mod report;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::GeneratorConfig;
pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
