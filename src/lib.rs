//! HDS Converter Library
//!
//! A Rust library for converting process-historian `.dat` archives into
//! positional CSV files ready for bulk ingestion into a historical data store.
//!
//! This library provides tools for:
//! - Parsing the block-structured archive format (`LB` / `TR` / `LC` headers and data lines)
//! - Re-encoding archive timestamps as FILETIME-epoch counters
//! - Remapping archive event codes onto the target store's event bitmasks
//! - Enriching log records with alarm levels from a variable database
//! - Suppressing consecutive duplicate trend samples
//! - Converting many archives concurrently with aggregate progress reporting

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod batch_orchestrator;
        pub mod conversion_engine;
        pub mod event_code_table;
        pub mod record_parser;
        pub mod timestamp_codec;
        pub mod variable_database;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{BlockMode, LogRecord, TrendRecord, Variable};
pub use config::Config;

/// Result type alias for the HDS converter
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for archive conversion operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Archive content does not follow the record grammar
    #[error("Format error in file '{file}' at line {line}: {message}")]
    Format {
        file: String,
        line: usize,
        message: String,
    },

    /// Timestamp does not match `yyyyMMddTHHmmss.fffZ`
    #[error("Invalid timestamp '{input}': expected yyyyMMddTHHmmss.fffZ")]
    TimestampFormat { input: String },

    /// CSV output error
    #[error("CSV writing error: {message}")]
    CsvWriting {
        message: String,
        #[source]
        source: csv::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a format error located at a file line
    pub fn format(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a timestamp format error
    pub fn timestamp_format(input: impl Into<String>) -> Self {
        Self::TimestampFormat {
            input: input.into(),
        }
    }

    /// Create a CSV writing error
    pub fn csv_writing(message: impl Into<String>, source: csv::Error) -> Self {
        Self::CsvWriting {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// True for errors raised by malformed archive content
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format { .. } | Self::TimestampFormat { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvWriting {
            message: "CSV write failed".to_string(),
            source: error,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid configuration file: {}", error),
        }
    }
}
