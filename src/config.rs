//! Configuration management and validation.
//!
//! Settings come from three layers applied in order: an optional TOML file,
//! command-line overrides, then [`Config::validate`] which checks the
//! directories and the variable database settings before any file starts.

use crate::app::services::conversion_engine::EngineOptions;
use crate::app::services::variable_database::resolve_encoding;
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_EXTRA_COLUMNS, DEFAULT_VARIABLE_DATABASE_ENCODING,
    MAX_CONCURRENT_FILES, default_concurrent_files,
};
use crate::{Error, Result};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Location and code page of the variable database export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDatabaseConfig {
    /// Path of the database export file
    pub path: PathBuf,

    /// Encoding label understood by `encoding_rs`, e.g. `windows-1252`
    #[serde(default = "default_encoding_label")]
    pub encoding: String,
}

fn default_encoding_label() -> String {
    DEFAULT_VARIABLE_DATABASE_ENCODING.to_string()
}

impl VariableDatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            encoding: default_encoding_label(),
        }
    }
}

/// Global configuration for a conversion batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned (non-recursively) for `*.dat` archives
    pub source_dir: PathBuf,

    /// Directory receiving the Trends and Logs CSV files
    pub target_dir: PathBuf,

    /// Optional variable database used for alarm levels
    pub variable_database: Option<VariableDatabaseConfig>,

    /// Refuse to start when the variable database cannot be loaded
    pub require_variable_database: bool,

    /// Empty columns appended to every trend row
    pub trend_extra_columns: usize,

    /// Empty columns appended to every log row
    pub log_extra_columns: usize,

    /// Maximum number of files converted at the same time
    pub max_concurrent_files: usize,

    /// Allow writing into a target directory that already has content
    pub overwrite: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::new(),
            target_dir: PathBuf::new(),
            variable_database: None,
            require_variable_database: false,
            trend_extra_columns: DEFAULT_EXTRA_COLUMNS,
            log_extra_columns: DEFAULT_EXTRA_COLUMNS,
            max_concurrent_files: default_concurrent_files(),
            overwrite: false,
        }
    }
}

impl Config {
    /// Create a configuration for a source and target directory
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            ..Self::default()
        }
    }

    /// Use a variable database in the default encoding
    pub fn with_variable_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.variable_database = Some(VariableDatabaseConfig::new(path));
        self
    }

    /// Override the variable database encoding label
    pub fn with_variable_database_encoding(mut self, label: impl Into<String>) -> Self {
        if let Some(ref mut database) = self.variable_database {
            database.encoding = label.into();
        }
        self
    }

    pub fn with_required_variable_database(mut self, required: bool) -> Self {
        self.require_variable_database = required;
        self
    }

    /// Set the padding column counts for trend and log rows
    pub fn with_extra_columns(mut self, trends: usize, logs: usize) -> Self {
        self.trend_extra_columns = trends;
        self.log_extra_columns = logs;
        self
    }

    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Default configuration file location, `<config_dir>/hds-converter/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a configuration file
    ///
    /// # Errors
    /// * Returns `Error::FileNotFound` if the file does not exist
    /// * Returns `Error::Configuration` if the TOML is invalid
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::file_not_found(path.display().to_string()));
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Cannot read {}", path.display()), e))?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Load the file layer of the configuration
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used when present and built-in defaults otherwise.
    pub fn load_layered(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_file(&path),
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Resolve the configured variable database encoding
    pub fn variable_database_encoding(&self) -> Result<&'static Encoding> {
        let label = self
            .variable_database
            .as_ref()
            .map(|database| database.encoding.as_str())
            .unwrap_or(DEFAULT_VARIABLE_DATABASE_ENCODING);
        resolve_encoding(label)
    }

    /// Output settings handed to every conversion
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions::new(&self.target_dir)
            .with_extra_columns(self.trend_extra_columns, self.log_extra_columns)
    }

    /// Check the configuration before a batch starts
    ///
    /// # Errors
    /// * Returns `Error::Configuration` describing the first problem found
    pub fn validate(&self) -> Result<()> {
        check_directory("Source", &self.source_dir)?;
        check_directory("Target", &self.target_dir)?;

        if self.max_concurrent_files == 0 || self.max_concurrent_files > MAX_CONCURRENT_FILES {
            return Err(Error::configuration(format!(
                "max_concurrent_files must be between 1 and {}, got {}",
                MAX_CONCURRENT_FILES, self.max_concurrent_files
            )));
        }

        match &self.variable_database {
            Some(database) => {
                // An optional database with no path is reported by the loader
                if self.require_variable_database && database.path.as_os_str().is_empty() {
                    return Err(Error::configuration(
                        "A variable database is required but its path is empty".to_string(),
                    ));
                }
                self.variable_database_encoding()?;
            }
            None if self.require_variable_database => {
                return Err(Error::configuration(
                    "A variable database is required but none was configured".to_string(),
                ));
            }
            None => {}
        }

        if !self.overwrite && directory_has_entries(&self.target_dir)? {
            return Err(Error::configuration(format!(
                "Target directory {} is not empty; existing files may be overwritten (use --force)",
                self.target_dir.display()
            )));
        }

        Ok(())
    }
}

fn check_directory(role: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::configuration(format!(
            "{} directory is not set",
            role
        )));
    }
    if !path.is_dir() {
        return Err(Error::configuration(format!(
            "{} directory {} does not exist or is not a directory",
            role,
            path.display()
        )));
    }
    Ok(())
}

fn directory_has_entries(path: &Path) -> Result<bool> {
    let mut entries = std::fs::read_dir(path)
        .map_err(|e| Error::io(format!("Cannot list {}", path.display()), e))?;
    Ok(entries.next().is_some())
}
