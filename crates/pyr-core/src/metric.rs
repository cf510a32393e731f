//! Vintages, metrics and the column names they resolve to

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Column carrying the population of a normalized single-vintage table
pub const POPULATION_COLUMN: &str = "Population";

/// Column carrying the absolute difference between two vintages
pub const DIFFERENCE_COLUMN: &str = "Population_Difference";

/// Column carrying the percentage difference between two vintages
pub const PERCENTAGE_COLUMN: &str = "Percentage_Change";

/// Header spellings accepted for [`PERCENTAGE_COLUMN`] when reading
pub const PERCENTAGE_ALIASES: [&str; 1] = ["Percentage_Difference"];

/// Strongly-typed name of a projection run, e.g. `"2018"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Vintage(String);

impl Vintage {
    /// Create a new `Vintage`, panicking in debug builds if the name is blank.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(name: impl Into<String>) -> Self {
        let s = name.into().trim().to_string();
        debug_assert!(!s.is_empty(), "Vintage must not be empty");
        Self(s)
    }

    /// Try to create a new `Vintage`, returning `None` if the name is blank.
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into().trim().to_string();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Population column for this vintage, e.g. `Population_2018`
    pub fn population_column(&self) -> String {
        format!("{}_{}", POPULATION_COLUMN, self.0)
    }
}

impl<'de> Deserialize<'de> for Vintage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Accept bare YAML integers (`vintage: 2018`) as well as strings
        let value = serde_yaml::Value::deserialize(deserializer)?;
        let raw = match value {
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Number(n) => n.to_string(),
            _ => return Err(serde::de::Error::custom("Vintage must be a string or number")),
        };
        Vintage::try_new(raw).ok_or_else(|| serde::de::Error::custom("Vintage must not be empty"))
    }
}

impl fmt::Display for Vintage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for Vintage {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Vintage {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A quantity that can be plotted on a pyramid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Projected population (per vintage in a difference table)
    Population,
    /// Comparison minus baseline population
    PopulationDifference,
    /// Difference as a percentage of the baseline
    PercentageChange,
}

/// A metric plus the vintage it refers to, resolved to one table column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricSelector {
    pub metric: Metric,
    #[serde(default)]
    pub vintage: Option<Vintage>,
}

impl MetricSelector {
    /// Create a selector without a vintage
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            vintage: None,
        }
    }

    /// Population of a specific vintage
    pub fn population(vintage: Vintage) -> Self {
        Self {
            metric: Metric::Population,
            vintage: Some(vintage),
        }
    }

    /// Column this selector reads.
    ///
    /// The vintage only qualifies [`Metric::Population`]; the derived
    /// columns are vintage-independent.
    pub fn column_name(&self) -> String {
        match (self.metric, &self.vintage) {
            (Metric::Population, Some(v)) => v.population_column(),
            (Metric::Population, None) => POPULATION_COLUMN.to_string(),
            (Metric::PopulationDifference, _) => DIFFERENCE_COLUMN.to_string(),
            (Metric::PercentageChange, _) => PERCENTAGE_COLUMN.to_string(),
        }
    }

    /// Human-readable label used in chart titles
    pub fn display_label(&self) -> String {
        match (self.metric, &self.vintage) {
            (Metric::Population, Some(v)) => format!("Population ({} Projections)", v),
            (Metric::Population, None) => "Population".to_string(),
            (Metric::PopulationDifference, _) => "Population Difference".to_string(),
            (Metric::PercentageChange, _) => "Percentage Difference".to_string(),
        }
    }

    /// Parse a dashboard label or a column name.
    ///
    /// Accepts `"Population (2018 Projections)"`, `"Population_2018"`,
    /// `"Population Difference"`, `"Percentage Difference"`, the raw column
    /// names and the snake_case metric names.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let trimmed = raw.trim();
        let key = trimmed.to_lowercase().replace(['_', '-'], " ");

        match key.as_str() {
            "population" => return Ok(Self::new(Metric::Population)),
            "population difference" => return Ok(Self::new(Metric::PopulationDifference)),
            "percentage difference" | "percentage change" => {
                return Ok(Self::new(Metric::PercentageChange))
            }
            _ => {}
        }

        let vintage = key
            .strip_prefix("population (")
            .and_then(|rest| rest.strip_suffix(" projections)"))
            .or_else(|| key.strip_prefix("population "))
            .and_then(Vintage::try_new);

        vintage
            .map(Self::population)
            .ok_or_else(|| CoreError::InvalidSelection {
                kind: "metric".to_string(),
                value: trimmed.to_string(),
            })
    }
}

impl fmt::Display for MetricSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column_name())
    }
}

#[cfg(test)]
#[path = "metric_test.rs"]
mod tests;
