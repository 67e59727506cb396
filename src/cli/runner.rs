//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{validate_game_name, GeneratorConfig};
use crate::engine::{Analysis, AnalysisStats, Generator, WriteOutcome};
use crate::error::Result;
use crate::extract::load_capture_dir;
use crate::protocol::IngestReport;
use crate::report::{render_enum_registry, render_field_tree, render_sent_shapes};
use crate::schema::ResolvedSchema;
use crate::types::Category;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// `inspect --format json` document
#[derive(Serialize)]
struct InspectOutput<'a> {
    stats: &'a AnalysisStats,
    report: &'a IngestReport,
    schema: &'a ResolvedSchema,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Generate {
                game,
                input,
                enums,
                project,
                dry_run,
                no_scaffold,
            } => self.generate(game, input, enums, project.as_ref(), *dry_run, *no_scaffold),
            Commands::Inspect {
                input,
                enums,
                game,
                format,
            } => self.inspect(input, enums, game, *format),
        }
    }

    /// Load the config file if given, otherwise defaults
    fn load_config(&self) -> Result<GeneratorConfig> {
        match &self.cli.config {
            Some(path) => GeneratorConfig::from_file(path),
            None => Ok(GeneratorConfig::default()),
        }
    }

    /// Generate model files (and scaffolding) into the project
    fn generate(
        &self,
        game: &str,
        input: &Path,
        enums: &[String],
        project: Option<&PathBuf>,
        dry_run: bool,
        no_scaffold: bool,
    ) -> Result<()> {
        validate_game_name(game)?;

        let mut config = self.load_config()?;
        config.add_enum_names(enums.iter().cloned());
        if let Some(project) = project {
            config.project_dir.clone_from(project);
        }
        if no_scaffold {
            config.scaffold = false;
        }
        config.validate()?;
        if !dry_run {
            config.check_layout()?;
        }

        let generator = Generator::new(config);
        let analysis = generator.analyze(&load_capture_dir(input)?, game);

        if self.cli.verbose {
            print_field_trees(&analysis);
        }

        if dry_run {
            let files = generator
                .render_models(&analysis)
                .into_iter()
                .chain(generator.render_scaffold(&analysis));
            for file in files {
                println!("// ==> {}", file.path.display());
                println!("{}", file.contents);
            }
        } else {
            for outcome in generator.write_all(&analysis)? {
                if let WriteOutcome::Written(path) = outcome {
                    info!("Wrote {}", path.display());
                }
            }
        }

        print!("{}", render_sent_shapes(analysis.accumulator.sent_shapes()));
        Ok(())
    }

    /// Print what the capture resolves to, writing nothing
    fn inspect(
        &self,
        input: &Path,
        enums: &[String],
        game: &str,
        format: OutputFormat,
    ) -> Result<()> {
        validate_game_name(game)?;

        let mut config = self.load_config()?;
        config.add_enum_names(enums.iter().cloned());
        config.validate()?;

        let generator = Generator::new(config);
        let analysis = generator.analyze(&load_capture_dir(input)?, game);

        match format {
            OutputFormat::Json => {
                let output = InspectOutput {
                    stats: &analysis.stats,
                    report: &analysis.report,
                    schema: &analysis.schema,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Pretty => {
                print_field_trees(&analysis);
                let registry = render_enum_registry(analysis.accumulator.enum_registry());
                if !registry.is_empty() {
                    println!("Enums:");
                    print!("{registry}");
                }
                for name in &analysis.schema.unclaimed_enums {
                    println!("Unclaimed enum: {name}");
                }
                print!("{}", render_sent_shapes(analysis.accumulator.sent_shapes()));
            }
        }
        Ok(())
    }
}

fn print_field_trees(analysis: &Analysis) {
    for category in Category::ALL {
        println!("{category}:");
        if let Some(tree) = analysis.accumulator.root_tree(category) {
            print!("{}", render_field_tree(tree));
        }
    }
}
