//! pyr-core - Core library for pyr
//!
//! This crate provides the canonical population table, the normalizer that
//! reshapes raw projection exports, the difference calculator that compares
//! two projection vintages, and the pyramid filter that produces
//! sign-encoded series for population-pyramid charts.

pub mod age_group;
pub mod config;
pub mod csv_io;
pub mod difference;
pub mod error;
pub mod metric;
pub mod normalize;
pub mod pyramid;
pub mod sex;
pub mod store;
pub mod table;

pub use age_group::{AgeGroup, Over100Part, RawAgeLabel, AGE_GROUP_COUNT};
pub use config::{Config, CsvOptions, VintageConfig, YearRange};
pub use difference::{
    compute_difference, percentage_change, scale_to_absolute, DifferenceReport, DifferenceSpec,
};
pub use error::{CoreError, CoreResult};
pub use metric::{Metric, MetricSelector, Vintage};
pub use normalize::{normalize_long, normalize_wide, NormalizeReport};
pub use pyramid::{build_pyramid, Pyramid, PyramidBar, PyramidFrame, PyramidQuery, SexMode, Side};
pub use sex::Sex;
pub use store::DataStore;
pub use table::{CompletenessViolation, PopulationTable, Row, RowKey};
