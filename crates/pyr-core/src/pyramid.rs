//! Pyramid filter: one signed `Value` series per (Year, AgeGroup)
//!
//! A single component serves every chart variant; it is parameterised by
//! sex mode, metric and vintage through [`PyramidQuery`].

use crate::age_group::AgeGroup;
use crate::config::YearRange;
use crate::error::{CoreError, CoreResult};
use crate::metric::MetricSelector;
use crate::sex::Sex;
use crate::table::{PopulationTable, RowKey};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which half (or halves) of the pyramid to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SexMode {
    Male,
    Female,
    Persons,
    /// Males negated on the left, females unsigned on the right
    MalesAndFemales,
}

impl SexMode {
    /// Parse a dashboard label (`Males`, `Females`, `Persons`,
    /// `Males and Females`) or a snake/kebab-case name
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let key = raw.trim().to_lowercase().replace(['_', '-'], " ");
        match key.as_str() {
            "male" | "males" => Ok(SexMode::Male),
            "female" | "females" => Ok(SexMode::Female),
            "persons" | "person" => Ok(SexMode::Persons),
            "males and females" | "males & females" | "both" => Ok(SexMode::MalesAndFemales),
            _ => Err(CoreError::InvalidSelection {
                kind: "sex".to_string(),
                value: raw.to_string(),
            }),
        }
    }

    /// Row sets emitted for this mode, in output order
    fn row_sets(self) -> &'static [(Sex, Side)] {
        match self {
            SexMode::Male => &[(Sex::Male, Side::Centre)],
            SexMode::Female => &[(Sex::Female, Side::Centre)],
            SexMode::Persons => &[(Sex::Persons, Side::Centre)],
            SexMode::MalesAndFemales => &[(Sex::Male, Side::Left), (Sex::Female, Side::Right)],
        }
    }
}

impl fmt::Display for SexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SexMode::Male => "Males",
            SexMode::Female => "Females",
            SexMode::Persons => "Persons",
            SexMode::MalesAndFemales => "Males and Females",
        })
    }
}

/// Side of the centre axis a bar is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Value negated
    Left,
    /// Value as stored
    Right,
    /// Single-set pyramid, value as stored
    Centre,
}

/// User selection handed to the filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PyramidQuery {
    pub sex_mode: SexMode,
    pub metric: MetricSelector,
    /// Inclusive year window; all years of the table when `None`
    #[serde(default)]
    pub years: Option<YearRange>,
}

/// One bar of a pyramid
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PyramidBar {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "AgeGroup")]
    pub age_group: AgeGroup,
    #[serde(rename = "Sex")]
    pub sex: Sex,
    #[serde(rename = "Side")]
    pub side: Side,
    /// Display-encoded value; `None` when the source cell is undefined
    #[serde(rename = "Value")]
    pub value: Option<f64>,
}

impl PyramidBar {
    /// Bar length; equals the stored value for non-negative metrics
    pub fn magnitude(&self) -> Option<f64> {
        self.value.map(f64::abs)
    }

    /// The stored metric value, with the display sign removed
    pub fn decoded(&self) -> Option<f64> {
        apply_side_sign(self.value, self.side)
    }
}

/// Bars for one year plus the chart title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PyramidFrame {
    pub year: i32,
    pub title: String,
    pub bars: Vec<PyramidBar>,
}

/// Filtered, sign-encoded series ready for a diverging bar chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pyramid {
    /// Source column the values were read from
    pub column: String,
    /// Human-readable metric label
    pub label: String,
    pub sex_mode: SexMode,
    /// Ordered by Year, then row set, then canonical age group
    pub bars: Vec<PyramidBar>,
}

impl Pyramid {
    /// Distinct years, ascending
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.bars.iter().map(|b| b.year).collect();
        years.dedup();
        years
    }

    /// Group bars per year, titled `"<metric label> - <year>"`
    pub fn frames(&self) -> Vec<PyramidFrame> {
        self.years()
            .into_iter()
            .map(|year| PyramidFrame {
                year,
                title: format!("{} - {}", self.label, year),
                bars: self.bars.iter().filter(|b| b.year == year).copied().collect(),
            })
            .collect()
    }
}

/// Build the pyramid series for `query` from a normalized or difference table.
///
/// Every emitted row set has all 21 canonical age groups for every year of
/// the table inside the query window; absent buckets get `Value = 0`.
/// Selecting a column the table does not carry is `MetricNotFound`.
pub fn build_pyramid(table: &PopulationTable, query: &PyramidQuery) -> CoreResult<Pyramid> {
    let column = query.metric.column_name();
    let col = table.require_column(&column)?;

    let years: Vec<i32> = table
        .years()
        .into_iter()
        .filter(|y| query.years.map_or(true, |r| r.contains(*y)))
        .collect();

    let sexes = table.sexes();
    for (sex, _) in query.sex_mode.row_sets() {
        if !table.is_empty() && !sexes.contains(sex) {
            log::warn!("No '{sex}' rows in table; {column} bars will be zero-filled");
        }
    }

    let capacity = years.len() * query.sex_mode.row_sets().len() * AgeGroup::ALL.len();
    let mut bars = Vec::with_capacity(capacity);
    let mut filled = 0usize;
    for &year in &years {
        for &(sex, side) in query.sex_mode.row_sets() {
            for group in AgeGroup::ALL {
                let value = match table.get(&RowKey::new(year, group, sex)) {
                    Some(row) => row.values[col],
                    None => {
                        filled += 1;
                        Some(0.0)
                    }
                };
                bars.push(PyramidBar {
                    year,
                    age_group: group,
                    sex,
                    side,
                    value: apply_side_sign(value, side),
                });
            }
        }
    }

    if filled > 0 {
        log::debug!("Zero-filled {filled} pyramid buckets for {column}");
    }

    Ok(Pyramid {
        column,
        label: query.metric.display_label(),
        sex_mode: query.sex_mode,
        bars,
    })
}

/// Negate left-hand values; zero stays positive zero. The flip is its own
/// inverse, so the same function decodes a bar.
fn apply_side_sign(value: Option<f64>, side: Side) -> Option<f64> {
    match side {
        Side::Left => value.map(|v| if v == 0.0 { 0.0 } else { -v }),
        Side::Right | Side::Centre => value,
    }
}

#[cfg(test)]
#[path = "pyramid_test.rs"]
mod tests;
