//! Consecutive duplicate suppression for trend samples
//!
//! A sample is a duplicate when its timestamp and variable both equal those of
//! the last sample actually written. Only consecutive duplicates are removed;
//! suppressed samples never become the comparison reference.

use crate::app::models::TrendRecord;

/// Tracks the last written trend sample of one file
#[derive(Debug, Default)]
pub struct TrendDeduplicator {
    last_emitted: Option<(i64, String)>,
}

impl TrendDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a sample should be written
    ///
    /// Returns `false` for a duplicate of the last written sample. Admitted
    /// samples become the new reference.
    pub fn admit(&mut self, record: &TrendRecord) -> bool {
        if self.is_duplicate(record) {
            return false;
        }

        self.last_emitted = Some((record.timestamp, record.variable_name.clone()));
        true
    }

    /// Check a sample against the last written one without updating state
    pub fn is_duplicate(&self, record: &TrendRecord) -> bool {
        self.last_emitted
            .as_ref()
            .is_some_and(|(timestamp, variable)| {
                (*timestamp, variable.as_str()) == record.dedup_key()
            })
    }
}
