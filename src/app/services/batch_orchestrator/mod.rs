//! Concurrent batch conversion of archive directories
//!
//! The orchestrator discovers `*.dat` archives, loads the shared variable
//! database once, then converts every file on the blocking thread pool with
//! bounded concurrency. Trace lines and a 0-100 progress value go to a
//! [`ConversionReporter`] supplied by the host.
//!
//! # Architecture
//!
//! - [`orchestrator`] - BatchOrchestrator: discovery, admission and fan-in
//! - [`progress`] - Reporting interface and its console, tracing and channel hosts
//! - [`summary`] - Aggregate batch results
//!
//! # Cancellation
//!
//! Cancellation is cooperative. It is observed when the next file is
//! admitted; files already converting run to completion and the remaining
//! files are reported as cancelled.

pub mod orchestrator;
pub mod progress;
pub mod summary;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use orchestrator::{BatchOrchestrator, discover_archives};
pub use progress::{
    ChannelReporter, ConsoleReporter, ConversionReporter, ReportEvent, TracingReporter,
};
pub use summary::BatchSummary;
