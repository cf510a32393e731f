//! Data normalizer: raw exports to canonical long tables
//!
//! The pipeline is melt, canonicalize labels, collapse the two oldest raw
//! buckets into `100 & over`, zero-fill absent buckets, then sort by
//! (Sex, Year, AgeGroup).

use crate::age_group::{AgeGroup, Over100Part, RawAgeLabel};
use crate::config::YearRange;
use crate::csv_io::{RawLongTable, WideTable};
use crate::difference::percentage_change;
use crate::error::{CoreError, CoreResult};
use crate::metric::{DIFFERENCE_COLUMN, PERCENTAGE_ALIASES, PERCENTAGE_COLUMN, POPULATION_COLUMN};
use crate::sex::Sex;
use crate::table::{PopulationTable, RowKey};
use serde::Serialize;
use std::collections::HashMap;

/// Counts collected while normalizing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    /// Raw observations read after the year filter
    pub rows_melted: usize,
    /// Raw `100-104` / `105 & over` observations folded into `100 & over`
    pub rows_merged: usize,
    /// Buckets added with a zero value
    pub buckets_zero_filled: usize,
    /// Rows in the output table
    pub rows_out: usize,
}

/// Normalize a wide export into a table with a single `Population` column.
///
/// Only year columns inside `years` are melted. Empty cells are treated as
/// absent, so the bucket is zero-filled (or left out of the `100 & over`
/// sum) instead of carrying an undefined value.
pub fn normalize_wide(
    wide: &WideTable,
    years: YearRange,
) -> CoreResult<(PopulationTable, NormalizeReport)> {
    let mut acc = Accumulator::new(vec![POPULATION_COLUMN.to_string()]);

    for row in &wide.rows {
        let sex = Sex::parse(&row.sex)?;
        let age = RawAgeLabel::parse(&row.age)?;
        for (year, value) in wide.years.iter().zip(&row.values) {
            if let (true, Some(v)) = (years.contains(*year), value) {
                acc.add(*year, age, sex, vec![Some(*v)])?;
            }
        }
    }

    acc.finish()
}

/// Normalize an already-long file, re-canonicalizing its labels.
///
/// All metric columns are carried through. The oldest-bucket merge sums
/// count columns; a `Percentage_Change` column is recomputed for merged rows
/// from the summed `Population_Difference` and the first vintage column.
pub fn normalize_long(
    raw: &RawLongTable,
    years: Option<YearRange>,
) -> CoreResult<(PopulationTable, NormalizeReport)> {
    let mut acc = Accumulator::new(raw.columns.clone());

    for row in &raw.rows {
        if years.is_some_and(|r| !r.contains(row.year)) {
            continue;
        }
        let sex = Sex::parse(&row.sex)?;
        let age = RawAgeLabel::parse(&row.age)?;
        acc.add(row.year, age, sex, row.values.clone())?;
    }

    acc.finish()
}

/// Sum constituent rows column-wise; a column is `None` only when every
/// constituent is `None`.
fn sum_parts<'a>(
    parts: impl Iterator<Item = &'a Vec<Option<f64>>>,
    width: usize,
) -> Vec<Option<f64>> {
    let mut out: Vec<Option<f64>> = vec![None; width];
    for part in parts {
        for (slot, value) in out.iter_mut().zip(part) {
            if let Some(v) = value {
                *slot = Some(slot.unwrap_or(0.0) + v);
            }
        }
    }
    out
}

/// Column positions needed to rederive a percentage: (percentage, difference, baseline)
fn percentage_inputs(table: &PopulationTable) -> CoreResult<Option<(usize, usize, usize)>> {
    let Some(pct) = std::iter::once(PERCENTAGE_COLUMN)
        .chain(PERCENTAGE_ALIASES)
        .find_map(|name| table.column_index(name))
    else {
        return Ok(None);
    };
    let diff = table.require_column(DIFFERENCE_COLUMN)?;
    let base = table
        .columns()
        .iter()
        .position(|c| c.starts_with("Population_") && c != DIFFERENCE_COLUMN)
        .ok_or_else(|| CoreError::MetricNotFound {
            column: "Population_<baseline>".to_string(),
            available: table.columns().join(", "),
        })?;
    Ok(Some((pct, diff, base)))
}

struct Accumulator {
    width: usize,
    table: PopulationTable,
    parts: HashMap<(Sex, i32), HashMap<Over100Part, Vec<Option<f64>>>>,
    report: NormalizeReport,
}

impl Accumulator {
    fn new(columns: Vec<String>) -> Self {
        Self {
            width: columns.len(),
            table: PopulationTable::new(columns),
            parts: HashMap::new(),
            report: NormalizeReport::default(),
        }
    }

    fn add(
        &mut self,
        year: i32,
        age: RawAgeLabel,
        sex: Sex,
        values: Vec<Option<f64>>,
    ) -> CoreResult<()> {
        self.report.rows_melted += 1;
        match age {
            RawAgeLabel::Canonical(group) => self.table.push(RowKey::new(year, group, sex), values),
            RawAgeLabel::Over100Part(part) => {
                let slot = self.parts.entry((sex, year)).or_default();
                if slot.insert(part, values).is_some() {
                    return Err(CoreError::DuplicateKey {
                        year,
                        age_group: part.label().to_string(),
                        sex: sex.to_string(),
                    });
                }
                self.report.rows_merged += 1;
                Ok(())
            }
        }
    }

    fn finish(mut self) -> CoreResult<(PopulationTable, NormalizeReport)> {
        let derived = if self.parts.is_empty() {
            None
        } else {
            percentage_inputs(&self.table)?
        };

        for ((sex, year), parts) in &self.parts {
            let key = RowKey::new(*year, AgeGroup::Age100AndOver, *sex);
            let mut values = sum_parts(parts.values(), self.width);
            if let Some((pct, diff, base)) = derived {
                values[pct] = percentage_change(values[diff], values[base]);
            }
            // a direct `100 & over` row next to its constituents would double count
            self.table.push(key, values)?;
        }

        self.report.buckets_zero_filled = self.table.zero_fill();
        if self.report.buckets_zero_filled > 0 {
            log::warn!(
                "Zero-filled {} absent age-group buckets",
                self.report.buckets_zero_filled
            );
        }

        self.table.sort_canonical();
        self.report.rows_out = self.table.len();

        log::debug!(
            "Normalized {} raw rows ({} merged into 100 & over) into {} rows",
            self.report.rows_melted,
            self.report.rows_merged,
            self.report.rows_out
        );

        Ok((self.table, self.report))
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
