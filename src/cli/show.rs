use std::path::PathBuf;

use adr_manager::{AdrNumber, Directory, StructuredAdr, adr2md};
use clap::Parser;
use tracing::instrument;

use super::{metadata, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Display a single decision")]
pub struct Show {
    /// The number of the ADR to display
    number: AdrNumber,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
    Markdown,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = Directory::new(root)?;
        let digits = directory.config().digits();

        let Some(file) = directory.find(self.number) else {
            anyhow::bail!("ADR {} not found", self.number.display(digits));
        };

        match self.output {
            OutputFormat::Pretty => {
                println!("{} {}", file.number().display(digits), file.adr().title);
                println!("{}", file.path().display().to_string().dim());
                output_pretty(file.adr());
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(file.adr())?),
            OutputFormat::Markdown => print!("{}", adr2md(file.adr())),
        }

        Ok(())
    }
}

fn output_pretty(adr: &StructuredAdr) {
    let status = metadata(adr, &adr.status, "status");
    let date = metadata(adr, &adr.date, "date");

    println!();
    if !status.is_empty() {
        println!("  {:<10}{}", "Status:", status.status());
    }
    for (label, value) in [
        ("Date:", date.as_str()),
        ("Deciders:", adr.deciders.as_str()),
        ("Story:", adr.technical_story.as_str()),
    ] {
        if !value.is_empty() {
            println!("  {label:<10}{value}");
        }
    }

    section("Context", &adr.context_and_problem_statement);

    if !adr.decision_drivers.is_empty() {
        println!("\n{}", "Decision drivers".dim());
        for driver in &adr.decision_drivers {
            println!("  • {driver}");
        }
    }

    let chosen = &adr.decision_outcome.chosen_option;
    if !adr.considered_options.is_empty() {
        println!("\n{}", "Considered options".dim());
        for option in &adr.considered_options {
            if option.title == *chosen {
                println!("  • {} {}", option.title, "(chosen)".success());
            } else {
                println!("  • {}", option.title);
            }
            for pro in &option.pros {
                println!("      {} {pro}", "+".success());
            }
            for con in &option.cons {
                println!("      {} {con}", "-".warning());
            }
        }
    }

    let outcome = &adr.decision_outcome;
    if !outcome.is_empty() {
        println!("\n{}", "Outcome".dim());
        if !chosen.is_empty() {
            println!("  Chosen: {}", chosen.info());
        }
        for line in outcome.explanation.lines() {
            println!("  {line}");
        }
        for consequence in &outcome.positive_consequences {
            println!("  {} {consequence}", "+".success());
        }
        for consequence in &outcome.negative_consequences {
            println!("  {} {consequence}", "-".warning());
        }
    }

    if !adr.links.is_empty() {
        println!("\n{}", "Links".dim());
        for link in &adr.links {
            println!("  • {link}");
        }
    }
}

fn section(heading: &str, text: &str) {
    if text.is_empty() {
        return;
    }
    println!("\n{}", heading.dim());
    for line in text.lines() {
        println!("  {line}");
    }
}
