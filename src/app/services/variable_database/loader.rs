//! Variable database loading
//!
//! The database export is a single text file in a legacy single-byte code
//! page. Loading never aborts a batch: failures come back as a
//! [`LoadStatus::Failed`] next to an empty database and the caller decides
//! whether conversion may proceed without alarm levels.

use super::VariableDatabase;
use super::metadata::LoadStats;
use super::parser::{is_variable_record, parse_variable_record};
use crate::{Error, Result};
use encoding_rs::Encoding;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of a variable database load
#[derive(Debug)]
pub enum LoadStatus {
    /// Database loaded; statistics attached
    Loaded(LoadStats),
    /// Database could not be loaded; the returned database is empty
    Failed(Error),
}

impl LoadStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Statistics of a successful load
    pub fn stats(&self) -> Option<&LoadStats> {
        match self {
            Self::Loaded(stats) => Some(stats),
            Self::Failed(_) => None,
        }
    }

    /// Error of a failed load
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Loaded(_) => None,
            Self::Failed(error) => Some(error),
        }
    }
}

impl VariableDatabase {
    /// Load the variable database, reporting failure as a status
    ///
    /// An empty or unreadable path yields an empty database and
    /// [`LoadStatus::Failed`] carrying a configuration error.
    pub async fn load(path: &Path, encoding: &'static Encoding) -> (Self, LoadStatus) {
        match Self::try_load(path, encoding).await {
            Ok((database, stats)) => (database, LoadStatus::Loaded(stats)),
            Err(error) => {
                warn!("Variable database not loaded: {}", error);
                (Self::new(), LoadStatus::Failed(error))
            }
        }
    }

    /// Load the variable database from a file in the given encoding
    ///
    /// # Errors
    /// * Returns `Error::Configuration` if the path is empty or cannot be read
    pub async fn try_load(path: &Path, encoding: &'static Encoding) -> Result<(Self, LoadStats)> {
        if path.as_os_str().is_empty() {
            return Err(Error::configuration(
                "Variable database path is empty".to_string(),
            ));
        }

        info!(
            "Loading variable database from {} ({})",
            path.display(),
            encoding.name()
        );
        let start_time = Instant::now();

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            Error::configuration(format!(
                "Cannot read variable database {}: {}",
                path.display(),
                e
            ))
        })?;

        let (text, _, had_errors) = encoding.decode(&bytes);
        if had_errors {
            warn!(
                "Variable database {} contains bytes invalid in {}; replaced",
                path.display(),
                encoding.name()
            );
        }

        let (mut database, mut stats) = Self::from_text(&text);
        database.source_path = Some(path.to_path_buf());
        stats.load_duration = start_time.elapsed();

        info!("{}", stats.summary());
        Ok((database, stats))
    }

    /// Build the database from already-decoded text
    ///
    /// Records are scanned in file order; a later record for the same
    /// variable name replaces the earlier level.
    pub fn from_text(text: &str) -> (Self, LoadStats) {
        let mut database = Self::new();
        let mut stats = LoadStats::new();

        for (index, line) in text.lines().enumerate() {
            stats.lines_read += 1;

            if !is_variable_record(line) {
                continue;
            }
            stats.records_matched += 1;

            match parse_variable_record(line) {
                Some(variable) => {
                    if database.insert(variable) {
                        stats.duplicates_overwritten += 1;
                    }
                }
                None => {
                    stats.records_malformed += 1;
                    debug!(
                        "Variable record on line {} has no level field, skipped",
                        index + 1
                    );
                }
            }
        }

        stats.variables_loaded = database.len();
        (database, stats)
    }
}
