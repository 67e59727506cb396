//! Engine types
//!
//! Results of one analysis run and of writing its output.

use crate::protocol::IngestReport;
use crate::schema::{ResolvedSchema, SchemaAccumulator};
use serde::Serialize;
use std::path::PathBuf;

/// Statistics from one analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    /// Messages extracted from the capture
    pub messages_extracted: usize,
    /// Brace-balanced fragments that were not valid JSON
    pub malformed_fragments: usize,
    /// Valid objects dropped for lacking the required key
    pub filtered: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl AnalysisStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Everything learned from one capture
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Game the schema was resolved for
    pub game_name: String,
    pub stats: AnalysisStats,
    pub report: IngestReport,
    /// Raw evidence; kept for the field tree and sent shape reports
    pub accumulator: SchemaAccumulator,
    pub schema: ResolvedSchema,
}

impl Analysis {
    /// Whether every category resolved to an empty root struct
    pub fn is_empty(&self) -> bool {
        self.schema.is_empty()
    }
}

/// What happened to one output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// Left untouched because it already existed
    Skipped(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Written(path) | Self::Skipped(path) => path,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}
