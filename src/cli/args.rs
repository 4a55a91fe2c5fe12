//! Command-line argument definitions for the HDS converter
//!
//! Defines the CLI interface using the clap derive API. Values given on the
//! command line override the configuration file.

use crate::constants::MAX_CONCURRENT_FILES;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the HDS converter
///
/// Converts process-historian `.dat` archives into Trends and Logs CSV files
/// for bulk ingestion into a historical data store.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hds-converter",
    version,
    about = "Convert historian .dat archives into Trends and Logs CSV files",
    long_about = "Converts every .dat archive of a source directory into two positional CSV \
                  files, one for trend samples and one for log events, ready for bulk import \
                  into a historical data store. Timestamps are re-encoded as FILETIME counters, \
                  event codes are remapped and log events are enriched with alarm levels from \
                  an optional variable database."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Convert a directory of archives into CSV files
    Convert(ConvertArgs),
}

/// Arguments for the convert command
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// Directory containing the `.dat` archives
    ///
    /// Only files directly inside this directory are converted.
    #[arg(
        short = 's',
        long = "source",
        value_name = "DIR",
        help = "Directory containing the .dat archives"
    )]
    pub source: Option<PathBuf>,

    /// Directory receiving the CSV files
    ///
    /// Each archive produces `<name>_Trends.csv` and `<name>_Logs.csv`.
    #[arg(
        short = 't',
        long = "target",
        value_name = "DIR",
        help = "Directory receiving the Trends and Logs CSV files"
    )]
    pub target: Option<PathBuf>,

    /// Variable database export used to look up alarm levels
    #[arg(
        long = "variable-db",
        value_name = "FILE",
        help = "Variable database export used for alarm levels"
    )]
    pub variable_db: Option<PathBuf>,

    /// Encoding of the variable database export
    #[arg(
        long = "variable-db-encoding",
        value_name = "LABEL",
        help = "Encoding label of the variable database (default: windows-1252)"
    )]
    pub variable_db_encoding: Option<String>,

    /// Stop before converting anything if the variable database cannot be loaded
    #[arg(
        long = "require-variable-db",
        help = "Fail when the variable database cannot be loaded"
    )]
    pub require_variable_db: bool,

    /// Empty columns appended to every trend row
    #[arg(
        long = "trend-extra-columns",
        value_name = "COUNT",
        help = "Empty columns appended to every trend row"
    )]
    pub trend_extra_columns: Option<usize>,

    /// Empty columns appended to every log row
    #[arg(
        long = "log-extra-columns",
        value_name = "COUNT",
        help = "Empty columns appended to every log row"
    )]
    pub log_extra_columns: Option<usize>,

    /// Number of files converted concurrently
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "COUNT",
        help = "Number of files converted concurrently (default: CPU count)"
    )]
    pub jobs: Option<usize>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// `<config dir>/hds-converter/config.toml`.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Allow writing into a target directory that already has files
    #[arg(long = "force", help = "Overwrite files in a non-empty target directory")]
    pub force: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the final summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the final summary"
    )]
    pub output_format: OutputFormat,
}

/// Output format options for the final summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl ConvertArgs {
    /// Validate the convert arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(jobs) = self.jobs {
            if jobs == 0 || jobs > MAX_CONCURRENT_FILES {
                return Err(Error::configuration(format!(
                    "Number of jobs must be between 1 and {}",
                    MAX_CONCURRENT_FILES
                )));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show the progress bar
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }
}

impl Default for ConvertArgs {
    fn default() -> Self {
        Self {
            source: None,
            target: None,
            variable_db: None,
            variable_db_encoding: None,
            require_variable_db: false,
            trend_extra_columns: None,
            log_extra_columns: None,
            jobs: None,
            config_file: None,
            force: false,
            verbose: 0,
            quiet: false,
            output_format: OutputFormat::Human,
        }
    }
}
