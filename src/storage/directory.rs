//! A filesystem backed decision log.
//!
//! The [`Directory`] loads every ADR in the configured folder of a project
//! and keeps them ordered by number. New and updated ADRs are written in
//! canonical form.

use std::{
    ffi::OsStr,
    fmt, io,
    path::{Path, PathBuf},
};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use walkdir::WalkDir;

use crate::{
    domain::{AdrNumber, Config, ConfigError, StructuredAdr},
    storage::{
        markdown::{self, LoadError, adr2md},
        path_parser::{construct_path, parse_number_from_path},
    },
};

/// An ADR together with the file it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdrFile {
    number: AdrNumber,
    path: PathBuf,
    adr: StructuredAdr,
}

impl AdrFile {
    /// The number encoded in the file name.
    #[must_use]
    pub const fn number(&self) -> AdrNumber {
        self.number
    }

    /// The location of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The decoded record.
    #[must_use]
    pub const fn adr(&self) -> &StructuredAdr {
        &self.adr
    }
}

/// The ADRs of a project.
#[derive(Debug)]
pub struct Directory {
    /// The project root. The ADR folder is resolved relative to it.
    root: PathBuf,
    config: Config,
    /// Sorted by number, without duplicates.
    adrs: Vec<AdrFile>,
}

impl Directory {
    /// Opens the decision log of the project at `root`.
    ///
    /// The config is read from `.adr/config.toml` (defaults apply if there is
    /// none) and every markdown file in the ADR folder is decoded. A missing
    /// ADR folder is an empty log.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - the config file exists but is invalid
    /// - an ADR file cannot be read
    /// - two files share a number
    /// - `allow_unrecognised` is `false` and the folder holds markdown files
    ///   whose names are not ADR file names
    pub fn new(root: PathBuf) -> Result<Self, DirectoryError> {
        let config = Config::load_or_default(&root)?;
        let folder = root.join(config.directory());
        let md_paths = collect_markdown_paths(&folder);

        let entries = md_paths
            .par_iter()
            .map(|path| load_entry(path))
            .collect::<Result<Vec<_>, _>>()?;

        let mut adrs = Vec::with_capacity(entries.len());
        let mut unrecognised = Vec::new();
        for entry in entries {
            match entry {
                Entry::Adr(file) => adrs.push(file),
                Entry::Unrecognised(path) => unrecognised.push(path),
            }
        }

        if !config.allow_unrecognised && !unrecognised.is_empty() {
            return Err(DirectoryError::UnrecognisedFiles(unrecognised));
        }

        adrs.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.path.cmp(&b.path)));
        if let Some(pair) = adrs.windows(2).find(|pair| pair[0].number == pair[1].number) {
            return Err(DirectoryError::DuplicateNumber {
                number: pair[0].number,
                first: pair[0].path.clone(),
                second: pair[1].path.clone(),
            });
        }

        tracing::debug!("Loaded {} ADRs from {}", adrs.len(), folder.display());

        Ok(Self { root, config, adrs })
    }

    /// The project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The folder the ADR files live in.
    #[must_use]
    pub fn folder(&self) -> PathBuf {
        self.root.join(self.config.directory())
    }

    /// Every ADR, ordered by number.
    #[must_use]
    pub fn adrs(&self) -> &[AdrFile] {
        &self.adrs
    }

    /// Looks up an ADR by number.
    #[must_use]
    pub fn find(&self, number: AdrNumber) -> Option<&AdrFile> {
        self.index_of(number).map(|index| &self.adrs[index])
    }

    /// The file an ADR was loaded from.
    #[must_use]
    pub fn path_for(&self, number: AdrNumber) -> Option<&Path> {
        self.find(number).map(AdrFile::path)
    }

    /// The number the next ADR will get: one past the highest in use, or
    /// `0` for an empty log.
    ///
    /// Returns `None` once the highest number in use is `u32::MAX`.
    #[must_use]
    pub fn next_number(&self) -> Option<AdrNumber> {
        self.adrs
            .last()
            .map_or(Some(AdrNumber::new(0)), |file| file.number.next())
    }

    /// Writes a new ADR under the next free number.
    ///
    /// The file name is derived from the title.
    ///
    /// # Errors
    ///
    /// Returns an error if no number is left or the file cannot be written.
    pub fn add(&mut self, adr: &StructuredAdr) -> Result<AdrFile, DirectoryError> {
        let number = self.next_number().ok_or(DirectoryError::NumbersExhausted)?;
        let path = construct_path(&self.folder(), number, &adr.title, self.config.digits());

        markdown::save(&path, adr).map_err(|source| DirectoryError::Write {
            path: path.clone(),
            source,
        })?;

        let file = AdrFile {
            number,
            path,
            adr: adr.normalized(),
        };
        self.adrs.push(file.clone());

        tracing::info!("Added ADR {}: {}", number, file.path.display());

        Ok(file)
    }

    /// Replaces the content of an existing ADR.
    ///
    /// The file keeps its name even if the title changed.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no ADR with this number or if the file
    /// cannot be written.
    pub fn save(&mut self, number: AdrNumber, adr: &StructuredAdr) -> Result<(), DirectoryError> {
        let index = self
            .index_of(number)
            .ok_or(DirectoryError::NotFound(number))?;
        let file = &mut self.adrs[index];

        markdown::save(&file.path, adr).map_err(|source| DirectoryError::Write {
            path: file.path.clone(),
            source,
        })?;
        file.adr = adr.normalized();

        Ok(())
    }

    /// Finds the ADR files that are not in canonical form.
    ///
    /// When `write` is set, those files are rewritten. Returns the paths of
    /// the files that differ (or differed).
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or written. Rewriting stops
    /// at the first failure.
    pub fn format(&self, write: bool) -> Result<Vec<PathBuf>, DirectoryError> {
        let mut changed = Vec::new();
        for file in &self.adrs {
            let current = std::fs::read_to_string(&file.path).map_err(|source| {
                DirectoryError::Load {
                    path: file.path.clone(),
                    source: LoadError::Io(source),
                }
            })?;
            let canonical = adr2md(&file.adr);
            if current == canonical {
                continue;
            }
            if write {
                std::fs::write(&file.path, canonical).map_err(|source| DirectoryError::Write {
                    path: file.path.clone(),
                    source,
                })?;
                tracing::debug!("Rewrote {}", file.path.display());
            }
            changed.push(file.path.clone());
        }
        Ok(changed)
    }

    fn index_of(&self, number: AdrNumber) -> Option<usize> {
        self.adrs
            .binary_search_by_key(&number, |file| file.number)
            .ok()
    }
}

enum Entry {
    Adr(AdrFile),
    Unrecognised(PathBuf),
}

fn collect_markdown_paths(folder: &Path) -> Vec<PathBuf> {
    WalkDir::new(folder)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| {
            // Skip the .adr directory in case the log lives at the project root
            !entry.path().components().any(|c| c.as_os_str() == ".adr")
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension() == Some(OsStr::new("md")))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn load_entry(path: &Path) -> Result<Entry, DirectoryError> {
    let number = match parse_number_from_path(path) {
        Ok(number) => number,
        Err(e) => {
            tracing::debug!("Skipping {}: {e}", path.display());
            return Ok(Entry::Unrecognised(path.to_path_buf()));
        }
    };

    let adr = markdown::load(path).map_err(|source| DirectoryError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Entry::Adr(AdrFile {
        number,
        path: path.to_path_buf(),
        adr,
    }))
}

/// Errors that can occur when working with a decision log.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The config file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An ADR file could not be read.
    #[error("failed to load {}", .path.display())]
    Load {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: LoadError,
    },

    /// An ADR file could not be written.
    #[error("failed to write {}", .path.display())]
    Write {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// Two files claim the same number.
    #[error("ADR {number} is defined twice: {} and {}", .first.display(), .second.display())]
    DuplicateNumber {
        /// The shared number.
        number: AdrNumber,
        /// The first file with the number.
        first: PathBuf,
        /// The second file with the number.
        second: PathBuf,
    },

    /// The highest ADR number is in use, so there is no next one.
    #[error("no ADR numbers left after {}", u32::MAX)]
    NumbersExhausted,

    /// There is no ADR with this number.
    #[error("ADR {0} not found")]
    NotFound(AdrNumber),

    /// The folder holds markdown files that are not ADRs.
    #[error("{}", UnrecognisedFiles(.0))]
    UnrecognisedFiles(Vec<PathBuf>),
}

struct UnrecognisedFiles<'a>(&'a [PathBuf]);

impl fmt::Display for UnrecognisedFiles<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unrecognised files: ")?;
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", path.display())?;
        }
        Ok(())
    }
}
