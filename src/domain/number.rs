use std::{fmt, str::FromStr};

/// The sequence number of an ADR.
///
/// MADR numbers decisions from `0000` upwards and encodes the number at the
/// start of the file name, e.g. `0007-use-postgresql.md`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdrNumber(u32);

impl AdrNumber {
    /// Creates a number from its integer value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the integer value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the number that follows this one, or `None` past `u32::MAX`.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Returns a displayable form padded with zeros to `digits` width.
    #[must_use]
    pub const fn display(self, digits: usize) -> Display {
        Display {
            number: self,
            digits,
        }
    }
}

/// A zero-padded rendering of an [`AdrNumber`].
#[derive(Debug, Clone, Copy)]
pub struct Display {
    number: AdrNumber,
    digits: usize,
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.number.0, width = self.digits)
    }
}

impl fmt::Display for AdrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AdrNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::NotANumber(s.to_owned()));
        }
        s.parse::<u32>()
            .map(Self)
            .map_err(|_| Error::TooLarge(s.to_owned()))
    }
}

/// Splits a file stem like `0007-use-postgresql` into its number and slug.
///
/// # Errors
///
/// Returns an error if the stem does not start with a number.
pub fn parse_file_stem(stem: &str) -> Result<(AdrNumber, &str), Error> {
    let (number, slug) = stem.split_once('-').unwrap_or((stem, ""));
    Ok((number.parse()?, slug))
}

/// Turns a title into a file name slug.
///
/// ASCII letters and digits are kept (lowercased); every other run of
/// characters becomes a single dash.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("untitled");
    }
    slug
}

/// Errors that can occur when reading an ADR number.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The text is not a run of decimal digits.
    #[error("'{0}' is not an ADR number")]
    NotANumber(String),
    /// The number does not fit.
    #[error("ADR number '{0}' is too large")]
    TooLarge(String),
}
