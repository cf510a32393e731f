//! Diff command implementation

use anyhow::{Context, Result};
use pyr_core::csv_io::{self, open_file};
use pyr_core::{compute_difference, normalize_long, CsvOptions, DifferenceSpec, PopulationTable};
use std::path::Path;

use crate::cli::{DiffArgs, GlobalArgs};
use crate::context::RuntimeContext;

/// Execute the diff command
pub fn execute(args: &DiffArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let mut spec = DifferenceSpec::from_config(&ctx.config);
    spec.years = ctx.year_range(&args.years);

    let baseline = load_vintage(&args.baseline, args.normalize, &ctx)?;
    let comparison = load_vintage(&args.comparison, args.normalize, &ctx)?;

    ctx.verbose(&format!(
        "Joining {} rows ({}, x{}) with {} rows ({}, x{}), years {}..={}",
        baseline.len(),
        spec.baseline.vintage,
        spec.baseline.scale,
        comparison.len(),
        spec.comparison.vintage,
        spec.comparison.scale,
        spec.years.start,
        spec.years.end
    ));

    let (table, report) =
        compute_difference(&baseline, &comparison, &spec).context("Failed to compute differences")?;

    csv_io::write_table_path(&table, &args.output, &ctx.csv_options())
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "Wrote {} rows -> {} ({} matched, {} {}-only, {} {}-only, {} undefined percentages)",
        table.len(),
        args.output.display(),
        report.matched,
        report.baseline_only,
        spec.baseline.vintage,
        report.comparison_only,
        spec.comparison.vintage,
        report.undefined_percentages
    );

    Ok(())
}

/// Load one vintage, re-normalizing labels when asked to
fn load_vintage(path: &Path, normalize: bool, ctx: &RuntimeContext) -> Result<PopulationTable> {
    let source = path.display().to_string();
    if normalize {
        let raw = csv_io::read_long(open_file(path)?, &source, &CsvOptions::default())
            .with_context(|| format!("Failed to read {}", source))?;
        let (table, report) =
            normalize_long(&raw, None).with_context(|| format!("Failed to normalize {}", source))?;
        ctx.verbose(&format!(
            "Normalized {}: {} rows, {} zero-filled",
            source, report.rows_out, report.buckets_zero_filled
        ));
        Ok(table)
    } else {
        csv_io::read_table_path(path, &ctx.csv_options())
            .with_context(|| format!("Failed to load {}", source))
    }
}
