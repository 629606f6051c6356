use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Configuration for a decision log.
///
/// Stored as TOML at `.adr/config.toml` under the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The folder holding the ADR files, relative to the project root.
    directory: PathBuf,

    /// The number of digits in ADR file names.
    ///
    /// Numbers are padded to this width with leading zeros, e.g. `0007`.
    digits: usize,

    /// Whether the ADR folder may contain markdown files whose names are not
    /// of the form `NNNN-slug.md` (a README or a template, for example).
    ///
    /// When `false`, such files are an error.
    pub allow_unrecognised: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            digits: default_digits(),
            allow_unrecognised: true,
        }
    }
}

impl Config {
    /// The location of the config file relative to the project root.
    pub const PATH: &str = ".adr/config.toml";

    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        toml::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Loads the configuration for a project root, falling back to defaults
    /// if the project has no config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed.
    pub fn load_or_default(root: &Path) -> Result<Self, ConfigError> {
        match Self::load(&root.join(Self::PATH)) {
            Err(ConfigError::Read(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No config file in {}, using defaults", root.display());
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Write)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// Returns the ADR folder, relative to the project root.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Sets the ADR folder.
    pub fn set_directory(&mut self, directory: impl Into<PathBuf>) {
        self.directory = directory.into();
    }

    /// Returns the number of digits for padding ADR numbers.
    #[must_use]
    pub const fn digits(&self) -> usize {
        self.digits
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("docs/decisions")
}

const fn default_digits() -> usize {
    4
}

const fn default_allow_unrecognised() -> bool {
    true
}

/// Errors that can occur when reading or writing the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Read(#[source] io::Error),
    /// The config file is not valid TOML, or has unexpected fields.
    #[error("failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),
    /// The configuration could not be rendered as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),
    /// The config file could not be written.
    #[error("failed to write config file: {0}")]
    Write(#[source] io::Error),
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_directory")]
        directory: PathBuf,

        #[serde(default = "default_digits")]
        digits: usize,

        #[serde(default = "default_allow_unrecognised")]
        allow_unrecognised: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                directory,
                digits,
                allow_unrecognised,
            } => Self {
                directory,
                digits,
                allow_unrecognised,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            directory: config.directory,
            digits: config.digits,
            allow_unrecognised: config.allow_unrecognised,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\ndirectory = \"doc/adr\"\ndigits = 3\nallow_unrecognised = false\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.directory(), Path::new("doc/adr"));
        assert_eq!(config.digits(), 3);
        assert!(!config.allow_unrecognised);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(matches!(error, ConfigError::Read(_)));
        assert!(error.to_string().starts_with("failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\ndigits = \"four\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_project_config_means_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(tmp.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(Config::PATH);

        let mut config = Config::default();
        config.set_directory("architecture/decisions");
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }
}
