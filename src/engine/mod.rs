//! Execution engine module
//!
//! Runs a capture through extraction, routing, inference and emission.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Generator` - Orchestrates one analysis run from a `GeneratorConfig`
//! - `Analysis` - Resolved schema plus the evidence it came from
//! - `WriteOutcome` - Result of writing a rendered file

mod types;

pub use types::{Analysis, AnalysisStats, WriteOutcome};

use crate::config::GeneratorConfig;
use crate::emit::{render_model_file, scaffold_files, RenderedFile};
use crate::error::{Result, ResultExt};
use crate::extract::CaptureExtractor;
use crate::protocol::Ingestor;
use crate::schema::SchemaAccumulator;
use crate::types::Category;
use std::fs;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Pipeline from capture text to C# files
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a generator
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Extract, route and resolve every message in `text`
    pub fn analyze(&self, text: &str, game_name: &str) -> Analysis {
        let start = Instant::now();
        let mut stats = AnalysisStats::new();

        let extractor = match &self.config.required_key {
            Some(key) => CaptureExtractor::new().with_required_key(key.clone()),
            None => CaptureExtractor::new(),
        };
        let extraction = extractor.extract(text);
        stats.messages_extracted = extraction.len();
        stats.malformed_fragments = extraction.malformed;
        stats.filtered = extraction.filtered;
        if extraction.malformed > 0 {
            warn!(
                "Skipped {} fragments that were not valid JSON",
                extraction.malformed
            );
        }

        let mut accumulator = SchemaAccumulator::with_enum_names(self.config.enum_names.iter());
        let ingestor = Ingestor::new(self.config.key_fields.clone());
        let report = ingestor.ingest(&mut accumulator, &extraction.records);

        let schema = accumulator.resolve_all(game_name);

        #[allow(clippy::cast_possible_truncation)]
        stats.set_duration(start.elapsed().as_millis() as u64);

        info!(
            "Analyzed {} messages for {game_name}: {} player, {} room, {} sent",
            stats.messages_extracted,
            report.folded_into(Category::Player),
            report.folded_into(Category::Room),
            report.sent
        );

        Analysis {
            game_name: game_name.to_string(),
            stats,
            report,
            accumulator,
            schema,
        }
    }

    /// One model file per category, `<models_dir>/<Game><Category>.cs`
    pub fn render_models(&self, analysis: &Analysis) -> Vec<RenderedFile> {
        let models_dir = self.config.models_dir(&analysis.game_name);
        analysis
            .schema
            .categories
            .iter()
            .map(|schema| {
                RenderedFile::new(
                    models_dir.join(format!("{}.cs", schema.root.name)),
                    render_model_file(
                        &analysis.game_name,
                        schema,
                        &self.config.namespace_root,
                    ),
                )
            })
            .collect()
    }

    /// Client and engine templates, or nothing when scaffolding is disabled
    /// or no category produced fields
    pub fn render_scaffold(&self, analysis: &Analysis) -> Vec<RenderedFile> {
        if !self.config.scaffold {
            return Vec::new();
        }
        if analysis.is_empty() {
            warn!("Player and Room structures are both empty, please check input data");
            return Vec::new();
        }
        scaffold_files(&analysis.game_name, analysis.report.dialect, &self.config)
    }

    /// Write `file`, creating parent directories
    ///
    /// Unless `overwrite` is set an existing file is left untouched.
    pub fn write_file(&self, file: &RenderedFile, overwrite: bool) -> Result<WriteOutcome> {
        if !overwrite && file.path.exists() {
            info!(
                "Skipping {} because it already exists",
                file.path.display()
            );
            return Ok(WriteOutcome::Skipped(file.path.clone()));
        }

        if let Some(parent) = file.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&file.path, &file.contents)
            .with_context(|| format!("Failed to write {}", file.path.display()))?;
        debug!("Wrote {} bytes to {}", file.contents.len(), file.path.display());
        Ok(WriteOutcome::Written(file.path.clone()))
    }

    /// Write models (always replaced) and scaffolding (never replaced)
    pub fn write_all(&self, analysis: &Analysis) -> Result<Vec<WriteOutcome>> {
        let mut outcomes = Vec::new();
        for file in self.render_models(analysis) {
            outcomes.push(self.write_file(&file, true)?);
        }
        for file in self.render_scaffold(analysis) {
            outcomes.push(self.write_file(&file, false)?);
        }
        Ok(outcomes)
    }
}
