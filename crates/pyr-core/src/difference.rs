//! Difference calculator: joins two vintages and derives change columns

use crate::config::{Config, VintageConfig, YearRange};
use crate::error::CoreResult;
use crate::metric::{DIFFERENCE_COLUMN, PERCENTAGE_COLUMN, POPULATION_COLUMN};
use crate::table::{PopulationTable, RowKey};
use serde::Serialize;

/// Which vintages to join and over which years
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceSpec {
    pub baseline: VintageConfig,
    pub comparison: VintageConfig,
    pub years: YearRange,
}

impl DifferenceSpec {
    /// Baseline, comparison and year window taken from a project config
    pub fn from_config(config: &Config) -> Self {
        Self {
            baseline: config.baseline.clone(),
            comparison: config.comparison.clone(),
            years: config.years,
        }
    }

    /// Output columns, in order
    pub fn output_columns(&self) -> Vec<String> {
        vec![
            self.baseline.vintage.population_column(),
            self.comparison.vintage.population_column(),
            DIFFERENCE_COLUMN.to_string(),
            PERCENTAGE_COLUMN.to_string(),
        ]
    }
}

/// Counts collected while differencing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DifferenceReport {
    /// Keys present in both vintages
    pub matched: usize,
    /// Keys present only in the baseline
    pub baseline_only: usize,
    /// Keys present only in the comparison
    pub comparison_only: usize,
    /// Rows whose percentage change is undefined
    pub undefined_percentages: usize,
}

/// Convert a figure to an absolute count.
///
/// A vintage published in thousands has `scale = 1000`, so a raw `1200`
/// becomes `1_200_000`. Nulls stay null.
pub fn scale_to_absolute(value: Option<f64>, scale: f64) -> Option<f64> {
    value.map(|v| v * scale)
}

/// `difference / baseline * 100`.
///
/// Undefined (`None`) when either input is missing or the baseline is zero.
pub fn percentage_change(difference: Option<f64>, baseline: Option<f64>) -> Option<f64> {
    match (difference, baseline) {
        (Some(d), Some(b)) if b != 0.0 => Some(d / b * 100.0),
        _ => None,
    }
}

/// Outer-join two normalized vintages on (AgeGroup, Sex, Year) and derive
/// `Population_Difference` and `Percentage_Change`.
///
/// Rows present in only one vintage are kept with the other side null.
/// Both sides are scaled to absolute counts before differencing, and only
/// years inside `spec.years` are emitted.
pub fn compute_difference(
    baseline: &PopulationTable,
    comparison: &PopulationTable,
    spec: &DifferenceSpec,
) -> CoreResult<(PopulationTable, DifferenceReport)> {
    let base_col = population_column(baseline, &spec.baseline)?;
    let comp_col = population_column(comparison, &spec.comparison)?;

    let mut out = PopulationTable::new(spec.output_columns());
    let mut report = DifferenceReport::default();

    let keys: Vec<RowKey> = baseline
        .rows()
        .iter()
        .chain(comparison.rows())
        .map(|r| r.key)
        .filter(|k| spec.years.contains(k.year))
        .collect();

    for key in keys {
        // keys present in both vintages come round twice
        if out.get(&key).is_some() {
            continue;
        }

        let base_row = baseline.get(&key);
        let comp_row = comparison.get(&key);
        match (base_row.is_some(), comp_row.is_some()) {
            (true, true) => report.matched += 1,
            (true, false) => report.baseline_only += 1,
            _ => report.comparison_only += 1,
        }

        let base = scale_to_absolute(
            base_row.and_then(|r| r.values[base_col]),
            spec.baseline.scale,
        );
        let comp = scale_to_absolute(
            comp_row.and_then(|r| r.values[comp_col]),
            spec.comparison.scale,
        );
        let difference = match (base, comp) {
            (Some(b), Some(c)) => Some(c - b),
            _ => None,
        };
        let percentage = percentage_change(difference, base);
        if percentage.is_none() {
            report.undefined_percentages += 1;
        }

        out.push(key, vec![base, comp, difference, percentage])?;
    }

    out.sort_canonical();

    if report.baseline_only + report.comparison_only > 0 {
        log::warn!(
            "{} rows only in {} and {} rows only in {}",
            report.baseline_only,
            spec.baseline.vintage,
            report.comparison_only,
            spec.comparison.vintage
        );
    }
    if report.undefined_percentages > 0 {
        log::warn!(
            "{} rows have an undefined {} (missing or zero baseline)",
            report.undefined_percentages,
            PERCENTAGE_COLUMN
        );
    }

    Ok((out, report))
}

/// Population column of a vintage's table: `Population_<vintage>` if
/// present, else the plain `Population` column of a normalized table.
fn population_column(table: &PopulationTable, vintage: &VintageConfig) -> CoreResult<usize> {
    let qualified = vintage.vintage.population_column();
    table
        .column_index(&qualified)
        .or_else(|| table.column_index(POPULATION_COLUMN))
        .map_or_else(|| table.require_column(&qualified), Ok)
}

#[cfg(test)]
#[path = "difference_test.rs"]
mod tests;
