use std::path::PathBuf;

use adr_manager::Directory;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Fmt {
    /// Only report files that are not in canonical form
    ///
    /// Exits with an error if there are any.
    #[arg(long)]
    check: bool,
}

impl Fmt {
    #[instrument(level = "debug")]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = Directory::new(root)?;

        for file in directory.adrs() {
            if let Err(e) = file.adr().front_matter() {
                tracing::warn!("Invalid front matter in {}: {e}", file.path().display());
            }
        }

        let changed = directory.format(!self.check)?;

        if self.check {
            for path in &changed {
                println!("{}", path.display().to_string().warning());
            }
            if !changed.is_empty() {
                anyhow::bail!("{} file(s) are not in canonical form", changed.len());
            }
            println!("{}", "All decisions are in canonical form".success());
        } else {
            for path in &changed {
                println!("Formatted {}", path.display());
            }
            println!(
                "{}",
                format!("{} of {} file(s) changed", changed.len(), directory.adrs().len())
                    .success()
            );
        }

        Ok(())
    }
}
