use std::{
    io::Write,
    path::{Path, PathBuf},
};

use adr_manager::{Directory, storage::AdrFile};
use anyhow::Context;
use serde::Serialize;
use tracing::instrument;

use super::{
    metadata,
    terminal::{Colorize, terminal_width, truncate},
};

#[derive(Debug, Default, clap::Parser)]
pub struct List {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// One line of the listing.
#[derive(Debug, Serialize)]
struct Row<'a> {
    number: String,
    status: String,
    date: String,
    title: &'a str,
    path: &'a Path,
}

impl<'a> Row<'a> {
    fn new(file: &'a AdrFile, digits: usize) -> Self {
        let adr = file.adr();
        Self {
            number: file.number().display(digits).to_string(),
            status: metadata(adr, &adr.status, "status"),
            date: metadata(adr, &adr.date, "date"),
            title: &adr.title,
            path: file.path(),
        }
    }
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = Directory::new(root)?;
        let digits = directory.config().digits();

        let rows: Vec<_> = directory
            .adrs()
            .iter()
            .map(|file| Row::new(file, digits))
            .collect();

        match self.output {
            OutputFormat::Table => render_table(&rows, &directory),
            OutputFormat::Json => render_json(&rows, std::io::stdout().lock())?,
        }
        Ok(())
    }
}

fn render_table(rows: &[Row<'_>], directory: &Directory) {
    if rows.is_empty() {
        println!(
            "{}",
            format!("No decisions in {}", directory.folder().display()).dim()
        );
        return;
    }

    let number_width = rows.iter().map(|r| r.number.len()).max().unwrap_or(0);
    let status_width = rows
        .iter()
        .map(|r| r.status.chars().count())
        .max()
        .unwrap_or(0)
        .max("STATUS".len());
    let date_width = rows
        .iter()
        .map(|r| r.date.chars().count())
        .max()
        .unwrap_or(0)
        .max("DATE".len());

    let used = number_width.max(1) + status_width + date_width + 6;
    let title_width = terminal_width().map_or(usize::MAX, |w| w.saturating_sub(used).max(10));

    println!(
        "{}",
        format!(
            "{:<number_width$}  {:<status_width$}  {:<date_width$}  TITLE",
            "#", "STATUS", "DATE"
        )
        .dim()
    );

    for row in rows {
        // Padded separately, escape codes would break the alignment.
        let padding = " ".repeat(status_width - row.status.chars().count());
        println!(
            "{:<number_width$}  {}{padding}  {:<date_width$}  {}",
            row.number,
            row.status.status(),
            row.date,
            truncate(row.title, title_width),
        );
    }
}

fn render_json(rows: &[Row<'_>], mut out: impl Write) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut out, rows).context("failed to render json output")?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn directory_with(files: &[(&str, &str)]) -> (TempDir, Directory) {
        let tmp = TempDir::new().unwrap();
        let folder = tmp.path().join("docs/decisions");
        std::fs::create_dir_all(&folder).unwrap();
        for (name, content) in files {
            std::fs::write(folder.join(name), content).unwrap();
        }
        let directory = Directory::new(tmp.path().to_path_buf()).unwrap();
        (tmp, directory)
    }

    #[test]
    fn rows_take_status_from_either_place() {
        let (_tmp, directory) = directory_with(&[
            ("0000-inline.md", "# Inline\n\n* Status: accepted\n* Date: 2024-01-01\n"),
            ("0001-yaml.md", "---\nstatus: proposed\ndate: 2024-02-02\n---\n# Yaml\n"),
        ]);

        let rows: Vec<_> = directory.adrs().iter().map(|f| Row::new(f, 4)).collect();

        assert_eq!(rows[0].number, "0000");
        assert_eq!(rows[0].status, "accepted");
        assert_eq!(rows[0].date, "2024-01-01");
        assert_eq!(rows[1].number, "0001");
        assert_eq!(rows[1].status, "proposed");
        assert_eq!(rows[1].date, "2024-02-02");
        assert_eq!(rows[1].title, "Yaml");
    }

    #[test]
    fn json_lists_every_row() {
        let (_tmp, directory) = directory_with(&[("0003-only.md", "# Only\n")]);
        let rows: Vec<_> = directory.adrs().iter().map(|f| Row::new(f, 4)).collect();

        let mut out = Vec::new();
        render_json(&rows, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["number"], "0003");
        assert_eq!(value[0]["title"], "Only");
        assert_eq!(value[0]["status"], "");
        assert!(value[0]["path"].as_str().unwrap().ends_with("0003-only.md"));
    }
}
