//! Normalize command implementation

use anyhow::{Context, Result};
use pyr_core::csv_io::{self, open_file};
use pyr_core::{normalize_long, normalize_wide, CsvOptions};

use crate::cli::{GlobalArgs, InputFormat, NormalizeArgs};
use crate::context::RuntimeContext;

/// Execute the normalize command
pub fn execute(args: &NormalizeArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let years = ctx.year_range(&args.years);
    let source = args.input.display().to_string();
    let file = open_file(&args.input)?;

    ctx.verbose(&format!(
        "Normalizing {} ({:?} layout), years {}..={}",
        source, args.format, years.start, years.end
    ));

    let (table, report) = match args.format {
        InputFormat::Wide => {
            let wide = csv_io::read_wide(file, &source)
                .with_context(|| format!("Failed to read wide export {}", source))?;
            normalize_wide(&wide, years)
        }
        InputFormat::Long => {
            // raw long files are read without the configured marker
            let raw = csv_io::read_long(file, &source, &CsvOptions::default())
                .with_context(|| format!("Failed to read long file {}", source))?;
            normalize_long(&raw, Some(years))
        }
    }
    .with_context(|| format!("Failed to normalize {}", source))?;

    csv_io::write_table_path(&table, &args.output, &ctx.csv_options())
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    ctx.verbose(&format!(
        "{} raw rows, {} merged into 100 & over, {} buckets zero-filled",
        report.rows_melted, report.rows_merged, report.buckets_zero_filled
    ));
    println!(
        "Normalized {} rows ({} years) -> {}",
        report.rows_out,
        table.years().len(),
        args.output.display()
    );

    Ok(())
}
