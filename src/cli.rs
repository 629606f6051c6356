use std::{
    io::Read,
    path::{Path, PathBuf},
};

mod convert;
mod format;
mod init;
mod list;
mod new;
mod show;
mod terminal;

use adr_manager::StructuredAdr;
use anyhow::Context;
use clap::ArgAction;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the project
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::List(list::List::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // Logs go to stderr so that `parse` and `render` output can be piped.
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Set up a decision log in the project
    Init(init::Init),

    /// Record a new decision
    New(new::New),

    /// List the decisions (default)
    List(list::List),

    /// Show a single decision
    Show(show::Show),

    /// Decode a markdown ADR and print it as JSON
    Parse(convert::Parse),

    /// Render an ADR given as JSON to markdown
    Render(convert::Render),

    /// Rewrite every ADR in canonical form
    Fmt(format::Fmt),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Init(command) => command.run(&root),
            Self::New(command) => command.run(root),
            Self::List(command) => command.run(root),
            Self::Show(command) => command.run(root),
            Self::Parse(command) => command.run(),
            Self::Render(command) => command.run(),
            Self::Fmt(command) => command.run(root),
        }
    }
}

/// Reads a whole file, or standard input when the path is `-`.
fn read_input(path: &Path) -> anyhow::Result<String> {
    if path != Path::new("-") {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("failed to read standard input")?;
    Ok(content)
}

/// Looks up a metadata field, falling back to the front matter.
///
/// MADR 3 moved status and date into the YAML block, so both places are
/// checked.
fn metadata(adr: &StructuredAdr, inline: &str, key: &str) -> String {
    if !inline.is_empty() {
        return inline.to_owned();
    }
    let Ok(Some(front_matter)) = adr.front_matter() else {
        return String::new();
    };
    match front_matter.get(key) {
        Some(serde_yaml::Value::String(value)) => value.clone(),
        Some(serde_yaml::Value::Number(value)) => value.to_string(),
        _ => String::new(),
    }
}
