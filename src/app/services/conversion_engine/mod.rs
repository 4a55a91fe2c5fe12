//! Per-file conversion of archives into Trends and Logs CSV files
//!
//! This module drives the [`RecordParser`](crate::app::services::record_parser::RecordParser)
//! over one archive, suppresses consecutive duplicate trend samples and writes
//! every emitted record as a positional CSV row.
//!
//! # Architecture
//!
//! - [`engine`] - Main ConversionEngine struct and the per-file pipeline
//! - [`writer`] - Headerless, unquoted CSV output with trailing padding columns
//! - [`deduplication`] - Consecutive duplicate suppression for trend samples
//! - [`stats`] - Conversion statistics and per-file outcomes
//!
//! # Failure Handling
//!
//! Failures never escape a file. Output creation failures skip the file,
//! format faults and read errors stop the file but keep the rows already
//! written, and both outputs are always flushed on the way out.

pub mod deduplication;
pub mod engine;
pub mod stats;
pub mod writer;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use deduplication::TrendDeduplicator;
pub use engine::{ConversionEngine, EngineOptions};
pub use stats::{ConversionStats, FileOutcome};
pub use writer::RecordWriter;
