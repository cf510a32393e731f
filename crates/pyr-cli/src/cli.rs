//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// pyr - reshape population projections and build population pyramids
#[derive(Parser, Debug)]
#[command(name = "pyr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory (searched for pyramid.yml)
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true, env = "PYR_CONFIG")]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reshape a raw export into a canonical long CSV
    Normalize(NormalizeArgs),

    /// Join two normalized vintages and derive difference columns
    Diff(DiffArgs),

    /// Filter a canonical CSV into a population-pyramid series
    Pyramid(PyramidArgs),

    /// Check that every (Sex, Year) exposes all canonical age groups
    Check(CheckArgs),
}

/// Inclusive year window overriding the configured range
#[derive(Args, Debug, Clone, Default)]
pub struct YearArgs {
    /// First year to keep
    #[arg(long)]
    pub start: Option<i32>,

    /// Last year to keep
    #[arg(long)]
    pub end: Option<i32>,
}

/// Arguments for the normalize command
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Raw CSV export
    pub input: PathBuf,

    /// Output CSV path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Layout of the input file
    #[arg(short, long, value_enum, default_value = "wide")]
    pub format: InputFormat,

    #[command(flatten)]
    pub years: YearArgs,
}

/// Input layouts understood by the normalizer
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// One column per year, rows keyed by Sex and Age
    Wide,
    /// One row per Year, Age Group and Sex
    Long,
}

/// Arguments for the diff command
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Normalized baseline vintage (e.g. 2018 projections, in thousands)
    pub baseline: PathBuf,

    /// Normalized comparison vintage (e.g. 2022 projections)
    pub comparison: PathBuf,

    /// Output CSV path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Re-normalize the inputs before joining
    #[arg(long)]
    pub normalize: bool,

    #[command(flatten)]
    pub years: YearArgs,
}

/// Arguments for the pyramid command
#[derive(Args, Debug)]
pub struct PyramidArgs {
    /// Canonical CSV (normalized or difference table)
    pub data: PathBuf,

    /// Sex selection: Males, Females, Persons or "Males and Females"
    #[arg(short, long, default_value = "Persons")]
    pub sex: String,

    /// Metric: a dashboard label ("Population Difference") or column name
    #[arg(short, long, default_value = "Population")]
    pub metric: String,

    /// Vintage qualifying a population metric (e.g. 2022)
    #[arg(long)]
    pub vintage: Option<String>,

    #[command(flatten)]
    pub years: YearArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: PyramidOutput,

    /// Write to a file instead of stdout
    #[arg(long)]
    pub out_file: Option<PathBuf>,
}

/// Pyramid output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PyramidOutput {
    /// Human-readable table, one block per year
    Table,
    /// JSON frames with chart titles
    Json,
    /// Flat CSV of Year, AgeGroup, Sex, Side, Value
    Csv,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Canonical CSV to check
    pub data: PathBuf,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
