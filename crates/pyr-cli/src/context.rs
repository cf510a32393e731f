//! Runtime context for CLI commands

use anyhow::{Context, Result};
use pyr_core::{Config, CsvOptions, YearRange};
use std::path::Path;

use crate::cli::{GlobalArgs, YearArgs};

/// Runtime context containing the loaded configuration
pub struct RuntimeContext {
    /// Project configuration (defaults when no pyramid.yml exists)
    pub config: Config,

    /// Verbose output enabled
    pub verbose: bool,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let config = match &args.config {
            Some(config_path) => {
                Config::load(Path::new(config_path)).context("Failed to load configuration file")?
            }
            None => Config::load_or_default(Path::new(&args.project_dir))
                .context("Failed to load project configuration")?,
        };

        let ctx = Self {
            config,
            verbose: args.verbose,
        };
        ctx.verbose(&format!(
            "Config '{}': years {}..={}, baseline {} (x{}), comparison {} (x{})",
            ctx.config.name,
            ctx.config.years.start,
            ctx.config.years.end,
            ctx.config.baseline.vintage,
            ctx.config.baseline.scale,
            ctx.config.comparison.vintage,
            ctx.config.comparison.scale,
        ));
        Ok(ctx)
    }

    /// Print verbose output if enabled
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }

    /// Configured year range with command-line overrides applied
    pub fn year_range(&self, years: &YearArgs) -> YearRange {
        self.config.years.with_overrides(years.start, years.end)
    }

    /// CSV options from the configuration
    pub fn csv_options(&self) -> CsvOptions {
        self.config.csv_options()
    }
}
