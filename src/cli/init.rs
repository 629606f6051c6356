use std::path::{Path, PathBuf};

use adr_manager::{Config, ConsideredOption, DecisionOutcome, Directory, StructuredAdr};
use tracing::instrument;

use super::new::today;

#[derive(Debug, clap::Parser)]
pub struct Init {
    /// The folder for ADR files, relative to the project root
    #[arg(long, value_name = "DIR")]
    directory: Option<PathBuf>,
}

impl Init {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(Config::PATH);
        if config_path.exists() {
            anyhow::bail!(
                "Decision log already initialized (found existing {})",
                Config::PATH
            );
        }

        let mut config = Config::default();
        if let Some(directory) = self.directory {
            config.set_directory(directory);
        }
        config
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", Config::PATH))?;

        let mut directory = Directory::new(root.to_path_buf())?;
        let file = directory.add(&first_decision())?;

        println!("Initialized decision log in {}", root.display());
        println!("  Created: {}", Config::PATH);
        println!("  Created: {}", file.path().display());
        println!();
        println!("Next steps:");
        println!("  adr new \"Your First Decision\"");

        Ok(())
    }
}

/// The decision to use MADR, recorded as ADR 0000 of every new log.
fn first_decision() -> StructuredAdr {
    const MADR: &str = "MADR";

    StructuredAdr {
        title: "Use Markdown Architectural Decision Records".to_owned(),
        status: "accepted".to_owned(),
        date: today(),
        context_and_problem_statement: "We want to record architectural decisions made in this \
                                        project. Which format and structure should these \
                                        records follow?"
            .to_owned(),
        considered_options: vec![
            ConsideredOption::new(MADR),
            ConsideredOption::new("Michael Nygard's template"),
            ConsideredOption::new("Sustainable Architectural Decisions (Y-Statements)"),
            ConsideredOption::new("Other templates listed at https://github.com/joelparkerhenderson/architecture_decision_record"),
            ConsideredOption::new("Formless (no conventions for file format and structure)"),
        ],
        decision_outcome: DecisionOutcome {
            chosen_option: MADR.to_owned(),
            explanation: "it fits our needs best:\n\n- Implicit assumptions should be made explicit.\n- MADR allows for \
                          structured capturing of any decision.\n- The MADR format is lean and \
                          fits our development style.\n- The MADR structure is comprehensible \
                          and facilitates usage and maintenance."
                .to_owned(),
            ..DecisionOutcome::default()
        },
        links: vec!["[MADR](https://adr.github.io/madr/)".to_owned()],
        ..StructuredAdr::default()
    }
}
