//! Conversion statistics and per-file outcomes

use crate::Error;
use serde::{Deserialize, Serialize};

/// Line and record counters for one or more converted files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Lines read from the archive
    pub lines_read: usize,

    /// `LB`, `TR` and `LC` lines
    pub header_lines: usize,

    /// Empty lines
    pub blank_lines: usize,

    /// Data lines outside any block
    pub lines_dropped: usize,

    /// Trend rows written
    pub trends_written: usize,

    /// Trend samples suppressed as consecutive duplicates
    pub duplicates_suppressed: usize,

    /// Log rows written
    pub logs_written: usize,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the counters of another file
    pub fn merge(&mut self, other: &ConversionStats) {
        self.lines_read += other.lines_read;
        self.header_lines += other.header_lines;
        self.blank_lines += other.blank_lines;
        self.lines_dropped += other.lines_dropped;
        self.trends_written += other.trends_written;
        self.duplicates_suppressed += other.duplicates_suppressed;
        self.logs_written += other.logs_written;
    }

    /// Total rows written to both outputs
    pub fn rows_written(&self) -> usize {
        self.trends_written + self.logs_written
    }
}

/// How the conversion of one archive ended
#[derive(Debug)]
pub enum FileOutcome {
    /// Every line was processed
    Converted(ConversionStats),

    /// Processing stopped early; rows written before the fault are kept
    Aborted { stats: ConversionStats, error: Error },

    /// An output file could not be created; nothing was converted
    OutputUnavailable(Error),

    /// Skipped because cancellation was requested before the file started
    Cancelled,
}

impl FileOutcome {
    /// Statistics gathered before the conversion ended
    pub fn stats(&self) -> Option<&ConversionStats> {
        match self {
            Self::Converted(stats) | Self::Aborted { stats, .. } => Some(stats),
            Self::OutputUnavailable(_) | Self::Cancelled => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Aborted { error, .. } | Self::OutputUnavailable(error) => Some(error),
            Self::Converted(_) | Self::Cancelled => None,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, Self::Converted(_))
    }

    /// Short label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Converted(_) => "converted",
            Self::Aborted { .. } => "aborted",
            Self::OutputUnavailable(_) => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}
