//! Mapping between ADR numbers and file paths.
//!
//! ADR files are named `NNNN-slug.md`, where `NNNN` is the zero-padded
//! number and the slug is derived from the title, e.g.
//! `docs/decisions/0007-use-postgresql.md`.

use std::path::{Path, PathBuf};

use crate::domain::{
    AdrNumber,
    number::{self, parse_file_stem, slugify},
};

/// Parse the ADR number from a file path.
///
/// Only the file name is considered; the folders it lives in are ignored.
///
/// # Errors
///
/// Returns an error if:
/// - The path has no file name, or the name is not valid UTF-8
/// - The file is not a markdown file
/// - The file name does not start with a number
pub fn parse_number_from_path(path: &Path) -> Result<AdrNumber, ParseError> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
        return Err(ParseError::NotMarkdown);
    }
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or(ParseError::InvalidPath)?;
    let (number, _slug) = parse_file_stem(stem)?;
    Ok(number)
}

/// Construct the file path for a new ADR.
///
/// # Arguments
///
/// * `dir` - The folder holding the ADR files
/// * `number` - The number of the ADR
/// * `title` - The title the slug is derived from
/// * `digits` - Number of digits to pad the number (e.g., 4 for "0007")
#[must_use]
pub fn construct_path(dir: &Path, number: AdrNumber, title: &str, digits: usize) -> PathBuf {
    dir.join(format!("{}-{}.md", number.display(digits), slugify(title)))
}

/// Errors that can occur when reading an ADR number from a path.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// The path has no usable file name.
    #[error("Invalid file path")]
    InvalidPath,

    /// The file does not have the `.md` extension.
    #[error("Not a markdown file")]
    NotMarkdown,

    /// The file name does not start with an ADR number.
    #[error("Invalid ADR file name: {0}")]
    Number(#[from] number::Error),
}
