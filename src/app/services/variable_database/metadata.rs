//! Variable database load statistics

/// Statistics about a variable database load
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Lines read from the database file
    pub lines_read: usize,

    /// Lines starting with an alarmed record prefix
    pub records_matched: usize,

    /// Distinct variables in the database after loading
    pub variables_loaded: usize,

    /// Matched records too short to carry a name and level
    pub records_malformed: usize,

    /// Records whose name was already present (later entry wins)
    pub duplicates_overwritten: usize,

    /// Time taken to load the database
    pub load_duration: std::time::Duration,
}

impl LoadStats {
    /// Create new empty load statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a summary string of the loading process
    pub fn summary(&self) -> String {
        format!(
            "Loaded {} variables from {} matching records ({} malformed, {} overwritten) in {:.2}s",
            self.variables_loaded,
            self.records_matched,
            self.records_malformed,
            self.duplicates_overwritten,
            self.load_duration.as_secs_f64()
        )
    }
}
