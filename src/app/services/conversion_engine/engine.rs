//! Main ConversionEngine implementation
//!
//! One engine is shared by every worker of a batch. Each call to
//! [`ConversionEngine::convert_file`] owns its parser state and output
//! writers exclusively, so files never share mutable state.

use super::deduplication::TrendDeduplicator;
use super::stats::{ConversionStats, FileOutcome};
use super::writer::RecordWriter;
use crate::app::services::record_parser::{ParsedLine, RecordParser};
use crate::app::services::variable_database::VariableDatabase;
use crate::constants::{LOGS_OUTPUT_SUFFIX, TRENDS_OUTPUT_SUFFIX};
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Output settings shared by every file of a batch
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Directory receiving the CSV files
    pub target_dir: PathBuf,

    /// Empty columns appended to every trend row
    pub trend_extra_columns: usize,

    /// Empty columns appended to every log row
    pub log_extra_columns: usize,
}

impl EngineOptions {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            trend_extra_columns: 0,
            log_extra_columns: 0,
        }
    }

    pub fn with_extra_columns(mut self, trends: usize, logs: usize) -> Self {
        self.trend_extra_columns = trends;
        self.log_extra_columns = logs;
        self
    }
}

/// Converts single archive files into Trends and Logs CSV files
#[derive(Debug, Clone)]
pub struct ConversionEngine {
    variables: Arc<VariableDatabase>,
    options: EngineOptions,
}

impl ConversionEngine {
    /// Create an engine with the shared variable database
    pub fn new(variables: Arc<VariableDatabase>, options: EngineOptions) -> Self {
        Self { variables, options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Output paths for an archive file name
    ///
    /// The full file name, extension included, is kept as the stem:
    /// `plant.dat` becomes `plant.dat_Trends.csv` and `plant.dat_Logs.csv`.
    pub fn output_paths(&self, file_name: &str) -> (PathBuf, PathBuf) {
        (
            self.options
                .target_dir
                .join(format!("{}{}", file_name, TRENDS_OUTPUT_SUFFIX)),
            self.options
                .target_dir
                .join(format!("{}{}", file_name, LOGS_OUTPUT_SUFFIX)),
        )
    }

    /// Convert one archive file
    ///
    /// Never fails: every problem is reported through the returned outcome.
    pub fn convert_file(&self, source: &Path) -> FileOutcome {
        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());
        let (trends_path, logs_path) = self.output_paths(&file_name);

        let mut trends = match RecordWriter::create(&trends_path, self.options.trend_extra_columns)
        {
            Ok(writer) => writer,
            Err(error) => {
                warn!("Skipping {}: {}", file_name, error);
                return FileOutcome::OutputUnavailable(error);
            }
        };
        let mut logs = match RecordWriter::create(&logs_path, self.options.log_extra_columns) {
            Ok(writer) => writer,
            Err(error) => {
                warn!("Skipping {}: {}", file_name, error);
                return FileOutcome::OutputUnavailable(error);
            }
        };

        let mut stats = ConversionStats::new();
        let result = self.convert_lines(source, &file_name, &mut trends, &mut logs, &mut stats);

        // Both outputs are flushed whatever happened above
        let flushed = trends.flush().and(logs.flush());

        match result.and(flushed) {
            Ok(()) => {
                info!(
                    "Converted {}: {} trends ({} duplicates suppressed), {} logs",
                    file_name, stats.trends_written, stats.duplicates_suppressed, stats.logs_written
                );
                FileOutcome::Converted(stats)
            }
            Err(error) => {
                warn!(
                    "Stopped converting {} after {} lines: {}",
                    file_name, stats.lines_read, error
                );
                FileOutcome::Aborted { stats, error }
            }
        }
    }

    /// Stream the archive through the parser into the writers
    fn convert_lines(
        &self,
        source: &Path,
        file_name: &str,
        trends: &mut RecordWriter,
        logs: &mut RecordWriter,
        stats: &mut ConversionStats,
    ) -> Result<()> {
        let file = File::open(source)
            .map_err(|e| Error::io(format!("Cannot open {}", source.display()), e))?;
        let mut reader = BufReader::new(file);

        let mut parser = RecordParser::new(file_name, &self.variables);
        let mut deduplicator = TrendDeduplicator::new();
        let mut buffer = Vec::new();

        loop {
            buffer.clear();
            let bytes_read = reader
                .read_until(b'\n', &mut buffer)
                .map_err(|e| Error::io(format!("Failed to read {}", source.display()), e))?;
            if bytes_read == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buffer);
            let line = line.trim_end_matches(['\n', '\r']);
            stats.lines_read += 1;

            match parser.parse_line(line)? {
                ParsedLine::Header => stats.header_lines += 1,
                ParsedLine::Blank => stats.blank_lines += 1,
                ParsedLine::Dropped => stats.lines_dropped += 1,
                ParsedLine::Trend(record) => {
                    if deduplicator.admit(&record) {
                        trends.write_fields(&record.fields())?;
                        stats.trends_written += 1;
                    } else {
                        debug!(
                            "{}:{} duplicate sample of '{}' suppressed",
                            file_name,
                            parser.line_number(),
                            record.variable_name
                        );
                        stats.duplicates_suppressed += 1;
                    }
                }
                ParsedLine::Log(record) => {
                    logs.write_fields(&record.fields())?;
                    stats.logs_written += 1;
                }
            }
        }

        Ok(())
    }
}
