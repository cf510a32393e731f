//! Long-format population table keyed by (Year, AgeGroup, Sex)

use crate::age_group::{AgeGroup, AGE_GROUP_COUNT};
use crate::error::{CoreError, CoreResult};
use crate::sex::Sex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Unique key of one observation row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowKey {
    pub year: i32,
    pub age_group: AgeGroup,
    pub sex: Sex,
}

impl RowKey {
    pub fn new(year: i32, age_group: AgeGroup, sex: Sex) -> Self {
        Self {
            year,
            age_group,
            sex,
        }
    }

    /// Canonical sort tuple: (Sex, Year, AgeGroup index)
    fn sort_tuple(&self) -> (Sex, i32, usize) {
        (self.sex, self.year, self.age_group.index())
    }
}

/// One row of a [`PopulationTable`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub key: RowKey,
    /// One value per table column; `None` is the null / undefined marker
    pub values: Vec<Option<f64>>,
}

/// A (Sex, Year) pair whose buckets differ from the canonical enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletenessViolation {
    pub sex: Sex,
    pub year: i32,
    pub missing: Vec<AgeGroup>,
}

/// Long-format table with an ordered list of metric columns.
///
/// Keys are unique: inserting a second row for the same
/// (Year, AgeGroup, Sex) is an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PopulationTable {
    columns: Vec<String>,
    rows: Vec<Row>,
    #[serde(skip)]
    index: HashMap<RowKey, usize>,
}

impl PopulationTable {
    /// Create an empty table with the given metric columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a table from rows, rejecting duplicate keys
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> CoreResult<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push(row.key, row.values)?;
        }
        Ok(table)
    }

    /// Append a row
    pub fn push(&mut self, key: RowKey, values: Vec<Option<f64>>) -> CoreResult<()> {
        if values.len() != self.columns.len() {
            return Err(CoreError::RowWidthMismatch {
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        if self.index.contains_key(&key) {
            return Err(CoreError::DuplicateKey {
                year: key.year,
                age_group: key.age_group.to_string(),
                sex: key.sex.to_string(),
            });
        }
        self.index.insert(key, self.rows.len());
        self.rows.push(Row { key, values });
        Ok(())
    }

    /// Metric column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in their current order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a metric column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of a metric column, or `MetricNotFound`
    pub fn require_column(&self, name: &str) -> CoreResult<usize> {
        self.column_index(name)
            .ok_or_else(|| CoreError::MetricNotFound {
                column: name.to_string(),
                available: self.columns.join(", "),
            })
    }

    /// Row for a key
    pub fn get(&self, key: &RowKey) -> Option<&Row> {
        self.index.get(key).map(|&i| &self.rows[i])
    }

    /// Single value for a key and column
    pub fn value(&self, key: &RowKey, column: &str) -> Option<f64> {
        let col = self.column_index(column)?;
        self.get(key).and_then(|row| row.values[col])
    }

    /// Distinct years, ascending
    pub fn years(&self) -> BTreeSet<i32> {
        self.rows.iter().map(|r| r.key.year).collect()
    }

    /// Distinct sexes, in canonical order
    pub fn sexes(&self) -> BTreeSet<Sex> {
        self.rows.iter().map(|r| r.key.sex).collect()
    }

    /// Sort rows by (Sex, Year, AgeGroup) using the canonical bucket order
    pub fn sort_canonical(&mut self) {
        self.rows.sort_by_key(|r| r.key.sort_tuple());
        self.rebuild_index();
    }

    /// Keep only rows whose year lies in `start..=end`
    pub fn retain_years(&mut self, start: i32, end: i32) {
        self.rows
            .retain(|r| (start..=end).contains(&r.key.year));
        self.rebuild_index();
    }

    /// Report every (Sex, Year) present whose bucket set is not exactly
    /// the 21 canonical buckets. Empty on a complete table.
    pub fn check_completeness(&self) -> Vec<CompletenessViolation> {
        let mut seen: BTreeMap<(Sex, i32), [bool; AGE_GROUP_COUNT]> = BTreeMap::new();
        for row in &self.rows {
            seen.entry((row.key.sex, row.key.year))
                .or_insert([false; AGE_GROUP_COUNT])[row.key.age_group.index()] = true;
        }

        seen.into_iter()
            .filter_map(|((sex, year), present)| {
                let missing: Vec<AgeGroup> = AgeGroup::ALL
                    .iter()
                    .copied()
                    .filter(|g| !present[g.index()])
                    .collect();
                (!missing.is_empty()).then_some(CompletenessViolation {
                    sex,
                    year,
                    missing,
                })
            })
            .collect()
    }

    /// Insert a zero row for every absent bucket of every (Sex, Year)
    /// already present. Returns the number of rows added.
    pub fn zero_fill(&mut self) -> usize {
        let mut added = 0;
        let width = self.columns.len();
        for violation in self.check_completeness() {
            for group in violation.missing {
                let key = RowKey::new(violation.year, group, violation.sex);
                self.index.insert(key, self.rows.len());
                self.rows.push(Row {
                    key,
                    values: vec![Some(0.0); width],
                });
                added += 1;
            }
        }
        added
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.key, i))
            .collect();
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
