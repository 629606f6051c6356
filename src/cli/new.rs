use std::path::PathBuf;

use adr_manager::{ConsideredOption, Directory, StructuredAdr};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct New {
    /// The title of the decision
    title: String,

    /// The status of the decision
    #[arg(long, default_value = "proposed")]
    status: String,

    /// Everyone involved in the decision
    #[arg(long)]
    deciders: Option<String>,

    /// The decision date (defaults to today)
    #[arg(long)]
    date: Option<String>,

    /// A decision driver (repeatable)
    #[arg(long = "driver", value_name = "DRIVER")]
    drivers: Vec<String>,

    /// A considered option (repeatable)
    #[arg(long = "option", value_name = "OPTION")]
    options: Vec<String>,

    /// A related link (repeatable)
    #[arg(long = "link", value_name = "LINK")]
    links: Vec<String>,
}

impl New {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut directory = Directory::new(root)?;
        let digits = directory.config().digits();

        let adr = StructuredAdr {
            title: self.title,
            status: self.status,
            deciders: self.deciders.unwrap_or_default(),
            date: self.date.unwrap_or_else(today),
            decision_drivers: self.drivers,
            considered_options: self
                .options
                .into_iter()
                .map(ConsideredOption::new)
                .collect(),
            links: self.links,
            ..StructuredAdr::default()
        };

        let file = directory.add(&adr)?;

        println!(
            "{}",
            format!(
                "Created ADR {}: {}",
                file.number().display(digits),
                file.path().display()
            )
            .success()
        );

        Ok(())
    }
}

/// Today's date in ISO 8601 form, as MADR writes it.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
