//! Tests for batch orchestration


use crate::app::services::batch_orchestrator::{ChannelReporter, ReportEvent};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A small trend archive with two samples of one variable
pub const TREND_ARCHIVE: &[&str] = &[
    "LB,x,x,T",
    "TR,Temp",
    "20230101T120000.000Z,21.5",
    "20230101T120001.000Z,22.0",
];

/// A log archive with one event on `BOILER.PRESSURE`
pub const LOG_ARCHIVE: &[&str] = &[
    "LB,x,x,L,Alarms01",
    "20230101T120000.000Z,EVT,1,x3,x4,BOILER.PRESSURE,x6,12.5,ON,,x10,High",
];

pub fn write_archive(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, lines.join("\r\n")).unwrap();
    path
}

/// Reporter shared with the orchestrator plus its event stream
pub fn channel_reporter() -> (Arc<ChannelReporter>, mpsc::UnboundedReceiver<ReportEvent>) {
    let (reporter, receiver) = ChannelReporter::new();
    (Arc::new(reporter), receiver)
}

/// Drain every event already sent, split into traces and progress values
pub fn drain(receiver: &mut mpsc::UnboundedReceiver<ReportEvent>) -> (Vec<String>, Vec<u8>) {
    let mut traces = Vec::new();
    let mut progress = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        match event {
            ReportEvent::Trace(message) => traces.push(message),
            ReportEvent::Progress(percent) => progress.push(percent),
        }
    }
    (traces, progress)
}
