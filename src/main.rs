//! Command-line interface for tracking impounded vehicles.

use clap::Parser;

mod cli;
use cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}
