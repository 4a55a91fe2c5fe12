//! Reporting interface between the batch and its host
//!
//! A host receives two kinds of signals from worker threads: human-readable
//! trace lines and a progress percentage. Implementations must be callable
//! concurrently from any thread.

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Receiver of batch trace lines and progress updates
pub trait ConversionReporter: Send + Sync {
    /// Emit a human-readable trace line
    fn trace(&self, message: &str);

    /// Report overall progress in the range 0..=100
    fn progress(&self, percent: u8);
}

/// Progress bar on the terminal with trace lines printed above it
pub struct ConsoleReporter {
    progress_bar: ProgressBar,
}

impl ConsoleReporter {
    /// Create a console reporter with a 100-position progress bar
    pub fn new() -> Self {
        let progress_bar = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% | {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ");
        progress_bar.set_style(style);
        progress_bar.set_message("Converting archives");

        Self { progress_bar }
    }

    /// Create a reporter that draws nothing, for quiet runs
    pub fn hidden() -> Self {
        Self {
            progress_bar: ProgressBar::hidden(),
        }
    }

    /// Finish the bar with a final message
    pub fn finish(&self, message: &str) {
        self.progress_bar.finish_with_message(message.to_string());
    }

    /// Current bar position
    pub fn position(&self) -> u64 {
        self.progress_bar.position()
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionReporter for ConsoleReporter {
    fn trace(&self, message: &str) {
        if self.progress_bar.is_hidden() {
            debug!("{}", message);
        } else {
            self.progress_bar.println(message);
        }
    }

    fn progress(&self, percent: u8) {
        self.progress_bar.set_position(u64::from(percent.min(100)));
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        if !self.progress_bar.is_finished() {
            self.progress_bar.finish_and_clear();
        }
    }
}

/// Reporter that only writes to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ConversionReporter for TracingReporter {
    fn trace(&self, message: &str) {
        info!(target: "hds_converter::trace", "{}", message);
    }

    fn progress(&self, percent: u8) {
        debug!(target: "hds_converter::progress", "{}%", percent);
    }
}

/// Signal forwarded by a [`ChannelReporter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Trace(String),
    Progress(u8),
}

/// Reporter forwarding every signal over an unbounded channel
///
/// Sends never block a worker; signals sent after the receiver is dropped
/// are discarded.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    sender: mpsc::UnboundedSender<ReportEvent>,
}

impl ChannelReporter {
    /// Create a reporter together with the receiving end of its channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ReportEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ConversionReporter for ChannelReporter {
    fn trace(&self, message: &str) {
        let _ = self.sender.send(ReportEvent::Trace(message.to_string()));
    }

    fn progress(&self, percent: u8) {
        let _ = self.sender.send(ReportEvent::Progress(percent));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_reporter_forwards_in_order() {
        let (reporter, mut receiver) = ChannelReporter::new();
        reporter.trace("first");
        reporter.progress(50);
        reporter.trace("second");

        assert_eq!(receiver.try_recv().unwrap(), ReportEvent::Trace("first".into()));
        assert_eq!(receiver.try_recv().unwrap(), ReportEvent::Progress(50));
        assert_eq!(receiver.try_recv().unwrap(), ReportEvent::Trace("second".into()));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_channel_reporter_survives_dropped_receiver() {
        let (reporter, receiver) = ChannelReporter::new();
        drop(receiver);
        reporter.trace("nobody listening");
        reporter.progress(100);
    }

    #[test]
    fn test_console_reporter_clamps_progress() {
        let reporter = ConsoleReporter::hidden();
        reporter.progress(40);
        assert_eq!(reporter.position(), 40);
        reporter.progress(250);
        assert_eq!(reporter.position(), 100);
        reporter.trace("hidden trace line");
    }
}
