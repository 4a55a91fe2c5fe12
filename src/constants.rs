//! Application constants for the HDS converter
//!
//! This module contains the fixed values of the archive grammar, the
//! output layout, the variable database layout and configuration defaults.

// =============================================================================
// Archive Files and Outputs
// =============================================================================

/// Glob pattern for archive files in the source directory (non-recursive)
pub const ARCHIVE_FILE_PATTERN: &str = "*.dat";

/// Suffix appended to the archive file name for the trends output
pub const TRENDS_OUTPUT_SUFFIX: &str = "_Trends.csv";

/// Suffix appended to the archive file name for the logs output
pub const LOGS_OUTPUT_SUFFIX: &str = "_Logs.csv";

/// Output field delimiter
pub const OUTPUT_DELIMITER: u8 = b',';

// =============================================================================
// Archive Record Grammar
// =============================================================================

/// Line prefixes that carry structure instead of values
pub mod line_prefixes {
    /// Block header: switches between trends and logs blocks
    pub const BLOCK_HEADER: &str = "LB";

    /// Declares the variable of the following trend samples
    pub const TREND_VARIABLE: &str = "TR";

    /// Caption line, ignored
    pub const CAPTION: &str = "LC";
}

/// Block header kinds found in field 3 of an `LB` line
pub mod block_kinds {
    pub const LOGS: &str = "L";
    pub const TRENDS: &str = "T";
}

/// Field positions inside archive lines
pub mod fields {
    /// `LB` line: block kind
    pub const BLOCK_KIND: usize = 3;
    /// `LB` line: log list identifier (logs blocks only)
    pub const BLOCK_LOG_LIST: usize = 4;
    /// `TR` line: variable name
    pub const TREND_VARIABLE: usize = 1;

    /// Data lines: primary timestamp
    pub const TIMESTAMP: usize = 0;
    /// Trend data lines: sampled value
    pub const TREND_VALUE: usize = 1;

    /// Log data lines: archive event code
    pub const LOG_EVENT_CODE: usize = 2;
    /// Log data lines: variable name
    pub const LOG_VARIABLE: usize = 5;
    /// Log data lines: raw value
    pub const LOG_VALUE: usize = 7;
    /// Log data lines: alarm state
    pub const LOG_ALARM_STATE: usize = 8;
    /// Log data lines: event time override
    pub const LOG_EVENT_TIME: usize = 9;
    /// Log data lines: free-text comment
    pub const LOG_COMMENT: usize = 11;
}

/// Placeholder the archive writes for a missing trend sample
pub const MISSING_TREND_VALUE: &str = "?";

/// Value emitted in place of the missing-sample placeholder
pub const MISSING_TREND_SUBSTITUTE: &str = "0";

/// OPC-style quality codes used by the target store
pub mod quality {
    /// Good quality
    pub const GOOD: u8 = 192;
    /// Bad quality, value not available
    pub const BAD: u8 = 0;
}

// =============================================================================
// Timestamps
// =============================================================================

/// Archive timestamp layout, `yyyyMMddTHHmmss.fffZ`
pub const ARCHIVE_TIMESTAMP_PATTERN: &str = r"^([0-9]{4})([0-9]{2})([0-9]{2})T([0-9]{2})([0-9]{2})([0-9]{2})\.([0-9]{3})Z$";

/// Seconds between 1601-01-01T00:00:00Z and 1970-01-01T00:00:00Z
pub const FILETIME_UNIX_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

/// 100-nanosecond intervals per second
pub const FILETIME_TICKS_PER_SECOND: i64 = 10_000_000;

/// 100-nanosecond intervals per millisecond
pub const FILETIME_TICKS_PER_MILLISECOND: i64 = 10_000;

// =============================================================================
// Variable Database
// =============================================================================

/// Record types of the variable database that describe alarmed variables
pub const VARIABLE_RECORD_PREFIXES: &[&str] = &["ALA", "ACM", "ATS"];

/// First field of the variable name path (inclusive)
pub const VARIABLE_NAME_FIRST_FIELD: usize = 2;

/// Last field of the variable name path (inclusive)
pub const VARIABLE_NAME_LAST_FIELD: usize = 13;

/// Field holding the configured alarm level
pub const VARIABLE_LEVEL_FIELD: usize = 50;

/// Separator between variable name path segments
pub const VARIABLE_NAME_SEPARATOR: &str = ".";

/// Legacy single-byte code page the variable database is exported in
pub const DEFAULT_VARIABLE_DATABASE_ENCODING: &str = "windows-1252";

// =============================================================================
// Processing Configuration Defaults
// =============================================================================

/// Default number of extra empty columns appended to rows
pub const DEFAULT_EXTRA_COLUMNS: usize = 0;

/// Upper bound on concurrently converted files
pub const MAX_CONCURRENT_FILES: usize = 256;

/// Default configuration file name under the user config directory
pub const CONFIG_DIR_NAME: &str = "hds-converter";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default number of concurrently converted files
pub fn default_concurrent_files() -> usize {
    num_cpus::get().max(1)
}
