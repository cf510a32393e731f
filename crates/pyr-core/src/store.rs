//! Immutable, load-once data store backing interactive pyramid queries
//!
//! The store is created once at startup, shared as `Arc<DataStore>`, and
//! only read afterwards; every query recomputes its pyramid from the
//! in-memory table.

use crate::config::CsvOptions;
use crate::csv_io;
use crate::error::CoreResult;
use crate::pyramid::{build_pyramid, Pyramid, PyramidQuery};
use crate::table::{CompletenessViolation, PopulationTable};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Canonical dataset loaded into memory
#[derive(Debug)]
pub struct DataStore {
    source: Option<PathBuf>,
    table: PopulationTable,
}

impl DataStore {
    /// Load a canonical CSV
    pub fn load(path: &Path, options: &CsvOptions) -> CoreResult<Arc<Self>> {
        let table = csv_io::read_table_path(path, options)?;
        log::info!(
            "Loaded {} rows with columns [{}] from {}",
            table.len(),
            table.columns().join(", "),
            path.display()
        );
        Ok(Arc::new(Self {
            source: Some(path.to_path_buf()),
            table,
        }))
    }

    /// Wrap an in-memory table
    pub fn from_table(table: PopulationTable) -> Arc<Self> {
        Arc::new(Self {
            source: None,
            table,
        })
    }

    /// File the store was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn table(&self) -> &PopulationTable {
        &self.table
    }

    /// Years available for selection
    pub fn years(&self) -> BTreeSet<i32> {
        self.table.years()
    }

    /// Metric columns available for selection
    pub fn columns(&self) -> &[String] {
        self.table.columns()
    }

    /// Completeness violations of the loaded table
    pub fn check(&self) -> Vec<CompletenessViolation> {
        self.table.check_completeness()
    }

    /// Filter the dataset for one user selection
    pub fn pyramid(&self, query: &PyramidQuery) -> CoreResult<Pyramid> {
        build_pyramid(&self.table, query)
    }
}
