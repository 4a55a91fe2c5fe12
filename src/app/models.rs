//! Data models for archive conversion
//!
//! This module contains the records produced from archive data lines, the
//! variable database entries used to enrich them, and the per-file task
//! state shared between the batch orchestrator and its workers.

use crate::constants::quality;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

// =============================================================================
// Parser State
// =============================================================================

/// Active block of an archive file
///
/// Switched by `LB` header lines and reset to `None` at the start of every file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockMode {
    /// Data lines are trend samples
    Trends,
    /// Data lines are log events
    Logs,
    /// No block header seen yet; data lines are dropped
    #[default]
    None,
}

// =============================================================================
// Output Records
// =============================================================================

/// A single trend sample: `timestamp,variable,value,quality`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendRecord {
    /// FILETIME-epoch counter (100 ns units since 1601-01-01)
    pub timestamp: i64,

    /// Variable declared by the last `TR` line
    pub variable_name: String,

    /// Sampled value as written in the archive
    pub value: String,

    /// 192 for good samples, 0 for the missing-sample placeholder
    pub quality: u8,
}

impl TrendRecord {
    /// Build a trend record from a raw archive value
    ///
    /// The `?` placeholder becomes value `0` with bad quality.
    pub fn from_raw_value(timestamp: i64, variable_name: &str, raw_value: &str) -> Self {
        let (value, quality) = if raw_value == crate::constants::MISSING_TREND_VALUE {
            (
                crate::constants::MISSING_TREND_SUBSTITUTE.to_string(),
                quality::BAD,
            )
        } else {
            (raw_value.to_string(), quality::GOOD)
        };

        Self {
            timestamp,
            variable_name: variable_name.to_string(),
            value,
            quality,
        }
    }

    /// Positional output fields, without padding
    pub fn fields(&self) -> Vec<String> {
        vec![
            self.timestamp.to_string(),
            self.variable_name.clone(),
            self.value.clone(),
            self.quality.to_string(),
        ]
    }

    /// Key used for consecutive duplicate suppression
    pub fn dedup_key(&self) -> (i64, &str) {
        (self.timestamp, self.variable_name.as_str())
    }
}

/// A single log event
///
/// Column order matches the target store's log import layout:
/// `Chrono, Loglist, AssocLabel, EvtNumber, EvtTitle, Name, Value, ValueT,
/// Quality, AlarmLevel, AlarmState, UserComment, Threshold, NumParam, TextParam`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: i64,
    pub log_list_id: String,
    pub assoc_label: String,
    /// Target-store event bitmask, rendered as decimal
    pub event_number: String,
    pub event_title: String,
    pub variable_name: String,
    /// Numeric value; `0` when the raw value is not a number
    pub value: f64,
    /// Raw value when it is not a number, empty otherwise
    pub value_text: String,
    pub quality: u8,
    /// Level from the variable database, empty when the variable is unknown
    pub alarm_level: String,
    pub alarm_state: String,
    /// Comment with all whitespace removed
    pub comment: String,
    pub threshold: i64,
    pub num_param: i64,
    pub text_param: String,
}

impl LogRecord {
    /// Positional output fields, without padding
    pub fn fields(&self) -> Vec<String> {
        vec![
            self.timestamp.to_string(),
            self.log_list_id.clone(),
            self.assoc_label.clone(),
            self.event_number.clone(),
            self.event_title.clone(),
            self.variable_name.clone(),
            self.value.to_string(),
            self.value_text.clone(),
            self.quality.to_string(),
            self.alarm_level.clone(),
            self.alarm_state.clone(),
            self.comment.clone(),
            self.threshold.to_string(),
            self.num_param.to_string(),
            self.text_param.clone(),
        ]
    }
}

/// Split a raw log value into its numeric and text columns
///
/// Surrounding whitespace is ignored when reading a number. Only finite
/// values count as numeric; `inf` and `NaN` spellings stay text.
pub fn split_log_value(raw_value: &str) -> (f64, String) {
    match raw_value.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => (value, String::new()),
        _ => (0.0, raw_value.to_string()),
    }
}

// =============================================================================
// Variable Database Entries
// =============================================================================

/// Alarmed variable from the variable database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Dotted name path, e.g. `PLANT.AREA1.TEMP`
    pub name: String,

    /// Configured alarm priority level
    pub level: String,
}

// =============================================================================
// Conversion Tasks
// =============================================================================

/// One archive file scheduled for conversion
///
/// Owned by the batch orchestrator; the worker converting the file flips
/// `completed` once it is done, whatever the outcome.
#[derive(Debug)]
pub struct ConversionTask {
    file: PathBuf,
    completed: AtomicBool,
}

impl ConversionTask {
    /// Create a pending task for an archive file
    pub fn new(file: PathBuf) -> Self {
        Self {
            file,
            completed: AtomicBool::new(false),
        }
    }

    /// Path of the archive file
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// File name used for trace lines and output naming
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.display().to_string())
    }

    /// Mark the task as completed, returning `false` if it already was
    pub fn mark_completed(&self) -> bool {
        !self.completed.swap(true, Ordering::AcqRel)
    }

    /// Whether the task has completed
    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_placeholder_becomes_bad_zero() {
        let record = TrendRecord::from_raw_value(42, "Pump.Speed", "?");
        assert_eq!(record.value, "0");
        assert_eq!(record.quality, quality::BAD);

        let record = TrendRecord::from_raw_value(42, "Pump.Speed", "12.5");
        assert_eq!(record.value, "12.5");
        assert_eq!(record.quality, quality::GOOD);
    }

    #[test]
    fn test_trend_fields_order() {
        let record = TrendRecord::from_raw_value(133170480000000000, "TempSensor1", "23.4");
        assert_eq!(
            record.fields(),
            vec!["133170480000000000", "TempSensor1", "23.4", "192"]
        );
    }

    #[test]
    fn test_split_log_value() {
        assert_eq!(split_log_value("12.5"), (12.5, String::new()));
        assert_eq!(split_log_value("ERR"), (0.0, "ERR".to_string()));
        assert_eq!(split_log_value(""), (0.0, String::new()));
        assert_eq!(split_log_value(" 12.5"), (12.5, String::new()));
        assert_eq!(split_log_value("-3\t"), (-3.0, String::new()));
        assert_eq!(split_log_value("inf"), (0.0, "inf".to_string()));
        assert_eq!(split_log_value("NaN"), (0.0, "NaN".to_string()));
    }

    #[test]
    fn test_log_value_rendering() {
        let record = LogRecord {
            timestamp: 1,
            log_list_id: "LL1".to_string(),
            assoc_label: String::new(),
            event_number: "4".to_string(),
            event_title: String::new(),
            variable_name: "Valve".to_string(),
            value: 0.0,
            value_text: "ERR".to_string(),
            quality: quality::GOOD,
            alarm_level: "3".to_string(),
            alarm_state: "ON".to_string(),
            comment: "nocomment".to_string(),
            threshold: 0,
            num_param: 0,
            text_param: String::new(),
        };

        assert_eq!(
            record.fields().join(","),
            "1,LL1,,4,,Valve,0,ERR,192,3,ON,nocomment,0,0,"
        );
    }

    #[test]
    fn test_task_completion_is_idempotent() {
        let task = ConversionTask::new(PathBuf::from("/archives/plant.dat"));
        assert_eq!(task.file_name(), "plant.dat");
        assert!(!task.is_completed());
        assert!(task.mark_completed());
        assert!(!task.mark_completed());
        assert!(task.is_completed());
    }
}
