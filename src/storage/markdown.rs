//! Conversion between MADR markdown and [`StructuredAdr`].
//!
//! [`md2adr`] accepts any text and never fails; [`adr2md`] writes the
//! canonical layout. Decoding canonical output gives back the normalized
//! record, so a document reaches its final form after a single
//! decode/encode pass.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::domain::StructuredAdr;

mod decode;
mod encode;
pub(crate) mod syntax;

pub use decode::md2adr;
pub use encode::adr2md;

/// Decodes a record from a reader.
///
/// # Errors
///
/// Returns an error if the reader fails or the content is not UTF-8.
pub fn read<R: BufRead>(reader: &mut R) -> Result<StructuredAdr, LoadError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    Ok(md2adr(&content))
}

/// Encodes a record to a writer.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write<W: Write>(writer: &mut W, adr: &StructuredAdr) -> io::Result<()> {
    writer.write_all(adr2md(adr).as_bytes())?;
    writer.flush()
}

/// Reads an ADR file.
///
/// # Errors
///
/// Returns an error if the file does not exist or cannot be read.
pub fn load(path: &Path) -> Result<StructuredAdr, LoadError> {
    let file = File::open(path).map_err(|io_error| match io_error.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound,
        _ => LoadError::Io(io_error),
    })?;
    read(&mut BufReader::new(file))
}

/// Writes an ADR file in canonical form.
///
/// Parent directories are created automatically if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn save(path: &Path, adr: &StructuredAdr) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write(&mut BufWriter::new(file), adr)
}

/// Errors that can occur when loading an ADR from markdown.
#[derive(Debug, thiserror::Error)]
#[error("failed to read from markdown")]
pub enum LoadError {
    /// The ADR file was not found.
    NotFound,
    /// An I/O error occurred.
    Io(#[from] io::Error),
}
