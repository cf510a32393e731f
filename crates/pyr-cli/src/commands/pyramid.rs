//! Pyramid command implementation

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use pyr_core::csv_io;
use pyr_core::{
    DataStore, MetricSelector, Pyramid, PyramidFrame, PyramidQuery, SexMode, Side, Vintage,
    YearRange,
};
use serde::Serialize;
use std::io::Write;

use crate::cli::{GlobalArgs, PyramidArgs, PyramidOutput, YearArgs};
use crate::context::RuntimeContext;

/// JSON document handed to a chart front end
#[derive(Serialize)]
struct PyramidExport<'a> {
    column: &'a str,
    label: &'a str,
    sex_mode: SexMode,
    generated_at: DateTime<Utc>,
    frames: Vec<PyramidFrame>,
}

/// Execute the pyramid command
pub fn execute(args: &PyramidArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let store = DataStore::load(&args.data, &ctx.csv_options())
        .with_context(|| format!("Failed to load {}", args.data.display()))?;

    let query = build_query(args)?;
    ctx.verbose(&format!(
        "Filtering {} rows: sex={}, metric={}, years={:?}",
        store.table().len(),
        query.sex_mode,
        query.metric,
        query.years
    ));

    let pyramid = store.pyramid(&query).context("Failed to build pyramid")?;
    ctx.verbose(&format!(
        "{} bars across {} years",
        pyramid.bars.len(),
        pyramid.years().len()
    ));

    let mut out: Box<dyn Write> = match &args.out_file {
        Some(path) => Box::new(
            csv_io::create_file(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };

    match args.output {
        PyramidOutput::Table => write_text(&pyramid, &mut out)?,
        PyramidOutput::Json => {
            let export = PyramidExport {
                column: &pyramid.column,
                label: &pyramid.label,
                sex_mode: pyramid.sex_mode,
                generated_at: Utc::now(),
                frames: pyramid.frames(),
            };
            serde_json::to_writer_pretty(&mut out, &export)?;
            writeln!(out)?;
        }
        PyramidOutput::Csv => csv_io::write_pyramid(&pyramid, &mut out)?,
    }

    out.flush()?;
    Ok(())
}

/// Turn the command-line selection into a query
fn build_query(args: &PyramidArgs) -> Result<PyramidQuery> {
    let sex_mode = SexMode::parse(&args.sex)?;
    let mut metric = MetricSelector::parse(&args.metric)?;
    if let Some(raw) = &args.vintage {
        let vintage = Vintage::try_new(raw.as_str())
            .with_context(|| format!("Invalid vintage '{}'", raw))?;
        metric.vintage = Some(vintage);
    }

    Ok(PyramidQuery {
        sex_mode,
        metric,
        years: year_window(&args.years),
    })
}

/// Window from `--start/--end`; open ends extend to the data's range
fn year_window(years: &YearArgs) -> Option<YearRange> {
    match (years.start, years.end) {
        (None, None) => None,
        (start, end) => Some(YearRange::new(
            start.unwrap_or(i32::MIN),
            end.unwrap_or(i32::MAX),
        )),
    }
}

/// Plain-text rendering: one block per year, one column per row set
fn write_text(pyramid: &Pyramid, out: &mut dyn Write) -> Result<()> {
    for frame in pyramid.frames() {
        writeln!(out, "{}", frame.title)?;

        let mut sets: Vec<(Side, String)> = Vec::new();
        for bar in &frame.bars {
            if !sets.iter().any(|(side, _)| *side == bar.side) {
                sets.push((bar.side, bar.sex.to_string()));
            }
        }

        write!(out, "{:>12}", "AgeGroup")?;
        for (_, sex) in &sets {
            write!(out, " {:>16}", sex)?;
        }
        writeln!(out)?;

        for group in pyr_core::AgeGroup::ALL {
            write!(out, "{:>12}", group.label())?;
            for (side, _) in &sets {
                let value = frame
                    .bars
                    .iter()
                    .find(|b| b.age_group == group && b.side == *side)
                    .and_then(|b| b.value);
                match value {
                    Some(v) => write!(out, " {:>16.2}", v)?,
                    None => write!(out, " {:>16}", "undefined")?,
                }
            }
            writeln!(out)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
