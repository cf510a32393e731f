//! Check command implementation

use anyhow::{bail, Context, Result};
use pyr_core::DataStore;

use crate::cli::{CheckArgs, GlobalArgs};
use crate::context::RuntimeContext;

/// Execute the check command
pub fn execute(args: &CheckArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let store = DataStore::load(&args.data, &ctx.csv_options())
        .with_context(|| format!("Failed to load {}", args.data.display()))?;

    let years = store.years();
    ctx.verbose(&format!(
        "Checking {} rows, {} years, columns [{}]",
        store.table().len(),
        years.len(),
        store.columns().join(", ")
    ));

    let violations = store.check();
    if violations.is_empty() {
        println!(
            "{}: complete ({} rows, {} sexes, {} years)",
            args.data.display(),
            store.table().len(),
            store.table().sexes().len(),
            years.len()
        );
        return Ok(());
    }

    for violation in &violations {
        let missing: Vec<&str> = violation.missing.iter().map(|g| g.label()).collect();
        println!(
            "  {} {}: missing {}",
            violation.sex,
            violation.year,
            missing.join(", ")
        );
    }
    bail!(
        "{} (sex, year) groups in {} are missing age groups",
        violations.len(),
        args.data.display()
    )
}
