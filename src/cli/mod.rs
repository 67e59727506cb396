//! CLI module
//!
//! Command-line interface for generating models from captures.
//!
//! # Commands
//!
//! - `generate` - Write C# models (and client/engine templates) into a project
//! - `inspect` - Print the inferred field trees, enums and sent shapes

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
