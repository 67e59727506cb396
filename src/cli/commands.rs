//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Jackbox capture schema generator CLI
#[derive(Parser, Debug)]
#[command(name = "jb-schema-gen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate C# models for a game from captured messages
    Generate {
        /// Game name, used for type names and the namespace
        game: String,

        /// Directory of capture files (.txt, .json)
        input: PathBuf,

        /// Field names whose string values become enums
        enums: Vec<String>,

        /// Client project root (overrides the config file)
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Print the rendered files instead of writing them
        #[arg(long)]
        dry_run: bool,

        /// Do not write client and engine templates
        #[arg(long)]
        no_scaffold: bool,
    },

    /// Show what was inferred from captured messages without writing anything
    Inspect {
        /// Directory of capture files (.txt, .json)
        input: PathBuf,

        /// Field names whose string values become enums
        enums: Vec<String>,

        /// Game name used when naming types
        #[arg(short, long, default_value = "Game")]
        game: String,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        format: OutputFormat,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable reports
    Pretty,
    /// Resolved schema and ingestion report as JSON
    Json,
}
