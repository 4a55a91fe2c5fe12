//! Variable database for alarm level lookups
//!
//! This module loads the configured alarm level of every alarmed variable from
//! the SCADA variable database export and provides O(1) access by variable name.
//! The database is loaded once per batch and shared read-only with every
//! concurrent file conversion.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub mod loader;
pub mod metadata;
pub mod parser;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use loader::LoadStatus;
pub use metadata::LoadStats;
pub use parser::resolve_encoding;

/// Variable name → alarm level mapping
#[derive(Debug, Clone, Default)]
pub struct VariableDatabase {
    /// Alarm levels indexed by dotted variable name
    pub(crate) levels: HashMap<String, String>,

    /// File the database was loaded from, if any
    pub(crate) source_path: Option<PathBuf>,
}

impl VariableDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Alarm level of a variable, empty when the variable is unknown
    pub fn level(&self, variable_name: &str) -> &str {
        self.levels
            .get(variable_name)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Check if a variable exists in the database
    pub fn contains(&self, variable_name: &str) -> bool {
        self.levels.contains_key(variable_name)
    }

    /// Number of distinct variables
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// File the database was loaded from
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Record a variable, replacing any earlier level for the same name
    ///
    /// Returns `true` when an earlier entry was overwritten.
    pub(crate) fn insert(&mut self, variable: crate::app::models::Variable) -> bool {
        self.levels.insert(variable.name, variable.level).is_some()
    }
}
