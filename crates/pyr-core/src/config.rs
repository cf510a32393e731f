//! Configuration types and parsing for pyramid.yml

use crate::error::{CoreError, CoreResult};
use crate::metric::Vintage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project configuration from pyramid.yml
///
/// Every field is optional; a missing file is equivalent to an empty one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    #[serde(default = "default_name")]
    pub name: String,

    /// Years kept by the normalizer and the difference calculator
    #[serde(default)]
    pub years: YearRange,

    /// Older projection run, differenced against `comparison`
    #[serde(default = "default_baseline")]
    pub baseline: VintageConfig,

    /// Newer projection run
    #[serde(default = "default_comparison")]
    pub comparison: VintageConfig,

    /// Text written for null / undefined cells in output CSVs
    #[serde(default)]
    pub undefined_marker: String,
}

/// Inclusive range of projection years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// Replace either bound with an override, if given
    pub fn with_overrides(self, start: Option<i32>, end: Option<i32>) -> Self {
        Self {
            start: start.unwrap_or(self.start),
            end: end.unwrap_or(self.end),
        }
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_YEAR,
            end: DEFAULT_END_YEAR,
        }
    }
}

/// One projection run and the factor that converts its figures to
/// absolute counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VintageConfig {
    pub vintage: Vintage,

    /// Multiplier applied before differencing (1000 for figures in thousands)
    #[serde(default = "default_scale")]
    pub scale: f64,
}

/// Options shared by the CSV readers and writers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvOptions {
    /// Text written for `None` cells; also read back as `None`
    pub undefined_marker: String,
}

const DEFAULT_START_YEAR: i32 = 2022;

const DEFAULT_END_YEAR: i32 = 2060;

/// Config file names searched in a project directory, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["pyramid.yml", "pyramid.yaml"];

fn default_name() -> String {
    "population_projections".to_string()
}

fn default_scale() -> f64 {
    1.0
}

fn default_baseline() -> VintageConfig {
    VintageConfig {
        vintage: Vintage::new("2018"),
        scale: 1000.0,
    }
}

fn default_comparison() -> VintageConfig {
    VintageConfig {
        vintage: Vintage::new("2022"),
        scale: 1.0,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            years: YearRange::default(),
            baseline: default_baseline(),
            comparison: default_comparison(),
            undefined_marker: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for pyramid.yml or pyramid.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map(|path| Self::load(&path))
            .unwrap_or_else(|| {
                Err(CoreError::ConfigNotFound {
                    path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                })
            })
    }

    /// Like [`Config::load_from_dir`], but a missing file yields defaults
    pub fn load_or_default(dir: &Path) -> CoreResult<Self> {
        match Self::load_from_dir(dir) {
            Err(CoreError::ConfigNotFound { path }) => {
                log::debug!("No config at {path}, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// CSV options derived from this config
    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            undefined_marker: self.undefined_marker.clone(),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.years.start > self.years.end {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "years.start ({}) must not be after years.end ({})",
                    self.years.start, self.years.end
                ),
            });
        }

        for (field, vintage) in [("baseline", &self.baseline), ("comparison", &self.comparison)] {
            if !vintage.scale.is_finite() || vintage.scale <= 0.0 {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "{field}.scale must be a positive number, got {}",
                        vintage.scale
                    ),
                });
            }
        }

        if self.baseline.vintage == self.comparison.vintage {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "baseline and comparison must be different vintages (both '{}')",
                    self.baseline.vintage
                ),
            });
        }

        if self.undefined_marker.trim().parse::<f64>().is_ok_and(|v| v.is_finite()) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "undefined_marker '{}' must not be numeric",
                    self.undefined_marker
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
