//! Command-line tool for managing Markdown Architectural Decision Records.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
