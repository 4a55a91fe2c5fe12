//! Positional CSV output
//!
//! Rows are comma-joined and CRLF-terminated with no header and no quoting,
//! so embedded commas are written as-is. Every row is padded with a fixed
//! number of empty trailing columns to match the target schema width.

use crate::constants::OUTPUT_DELIMITER;
use crate::{Error, Result};
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};

/// CSV writer for one output file
#[derive(Debug)]
pub struct RecordWriter {
    path: PathBuf,
    writer: Writer<File>,
    extra_columns: usize,
    rows_written: usize,
}

impl RecordWriter {
    /// Create (or truncate) an output file
    ///
    /// # Errors
    /// * Returns `Error::Io` if the file cannot be created
    pub fn create(path: &Path, extra_columns: usize) -> Result<Self> {
        let file = File::create(path)
            .map_err(|e| Error::io(format!("Cannot create file {}", path.display()), e))?;

        let writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(OUTPUT_DELIMITER)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::CRLF)
            .from_writer(file);

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            extra_columns,
            rows_written: 0,
        })
    }

    /// Write one record's fields followed by the padding columns
    pub fn write_fields(&mut self, fields: &[String]) -> Result<()> {
        let padding = std::iter::repeat_n("", self.extra_columns);
        self.writer
            .write_record(fields.iter().map(String::as_str).chain(padding))
            .map_err(|e| {
                Error::csv_writing(format!("Failed to write to {}", self.path.display()), e)
            })?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flush buffered rows to disk
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::io(format!("Failed to flush {}", self.path.display()), e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}
