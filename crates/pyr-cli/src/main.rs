//! pyr CLI - reshape population projections and build population pyramids

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::{check, diff, normalize, pyramid};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Normalize(args) => normalize::execute(args, &cli.global),
        cli::Commands::Diff(args) => diff::execute(args, &cli.global),
        cli::Commands::Pyramid(args) => pyramid::execute(args, &cli.global),
        cli::Commands::Check(args) => check::execute(args, &cli.global),
    }
}
