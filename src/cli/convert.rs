use std::path::PathBuf;

use adr_manager::{StructuredAdr, adr2md, md2adr};
use anyhow::Context;
use tracing::instrument;

use super::read_input;

#[derive(Debug, clap::Parser)]
pub struct Parse {
    /// The markdown file to decode, or `-` for standard input
    #[arg(default_value = "-")]
    input: PathBuf,
}

impl Parse {
    #[instrument]
    pub fn run(self) -> anyhow::Result<()> {
        let markdown = read_input(&self.input)?;
        let adr = md2adr(&markdown);
        serde_json::to_writer_pretty(std::io::stdout(), &adr)
            .context("failed to render json output")?;
        println!();
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Render {
    /// The JSON file to render, or `-` for standard input
    ///
    /// Missing fields are treated as empty.
    #[arg(default_value = "-")]
    input: PathBuf,
}

impl Render {
    #[instrument]
    pub fn run(self) -> anyhow::Result<()> {
        let json = read_input(&self.input)?;
        let adr: StructuredAdr = serde_json::from_str(&json).context("invalid ADR JSON")?;
        print!("{}", adr2md(&adr));
        Ok(())
    }
}
