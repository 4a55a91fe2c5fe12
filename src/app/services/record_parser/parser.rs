//! Line classification and per-file parser state
//!
//! Header rules are evaluated in order and the first match wins:
//! `LB` block headers, `TR` variable declarations, `LC` captions, then data
//! lines decoded according to the active [`BlockMode`].

use super::LineFault;
use super::logs::decode_log_line;
use super::trends::decode_trend_line;
use crate::app::models::{BlockMode, LogRecord, TrendRecord};
use crate::app::services::variable_database::VariableDatabase;
use crate::constants::{block_kinds, fields, line_prefixes};
use crate::{Error, Result};
use tracing::debug;

/// Result of feeding one line to the parser
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    /// Structural line (`LB`, `TR`, `LC`) consumed without output
    Header,
    /// Empty line
    Blank,
    /// Data line outside any block, dropped
    Dropped,
    /// Decoded trend sample
    Trend(TrendRecord),
    /// Decoded log event
    Log(LogRecord),
}

/// Transient state of one archive file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserState {
    pub block_mode: BlockMode,
    /// Raw (untrimmed) variable name from the last `TR` line
    pub current_trend_variable: Option<String>,
    /// Trimmed log list identifier from the last logs `LB` line
    pub current_log_list_id: Option<String>,
}

/// Stateful parser for the lines of a single archive file
///
/// Lines must be fed strictly in file order. Any error returned is a
/// file-level format fault; callers stop feeding lines after one.
#[derive(Debug)]
pub struct RecordParser<'a> {
    file_name: String,
    variables: &'a VariableDatabase,
    state: ParserState,
    line_number: usize,
}

impl<'a> RecordParser<'a> {
    /// Create a parser for one archive file
    pub fn new(file_name: impl Into<String>, variables: &'a VariableDatabase) -> Self {
        Self {
            file_name: file_name.into(),
            variables,
            state: ParserState::default(),
            line_number: 0,
        }
    }

    /// Current parser state
    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Number of lines fed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Classify and decode the next line of the file
    ///
    /// # Errors
    /// * Returns `Error::Format` for malformed timestamps, missing fields and
    ///   trend samples before any `TR` declaration
    pub fn parse_line(&mut self, line: &str) -> Result<ParsedLine> {
        self.line_number += 1;
        let trimmed = line.trim();

        if trimmed.starts_with(line_prefixes::BLOCK_HEADER) {
            self.apply_block_header(line)?;
            return Ok(ParsedLine::Header);
        }

        if trimmed.starts_with(line_prefixes::TREND_VARIABLE) {
            let parts: Vec<&str> = line.split(',').collect();
            let variable = super::required_field(&parts, fields::TREND_VARIABLE, "variable")
                .map_err(|fault| self.fault(fault))?;
            self.state.current_trend_variable = Some(variable.to_string());
            return Ok(ParsedLine::Header);
        }

        if trimmed.starts_with(line_prefixes::CAPTION) {
            return Ok(ParsedLine::Header);
        }

        if trimmed.is_empty() {
            return Ok(ParsedLine::Blank);
        }

        let parts: Vec<&str> = line.split(',').collect();
        match self.state.block_mode {
            BlockMode::Trends => decode_trend_line(
                &parts,
                self.state.current_trend_variable.as_deref(),
            )
            .map(ParsedLine::Trend)
            .map_err(|fault| self.fault(fault)),
            BlockMode::Logs => decode_log_line(
                &parts,
                self.state.current_log_list_id.as_deref().unwrap_or_default(),
                self.variables,
            )
            .map(ParsedLine::Log)
            .map_err(|fault| self.fault(fault)),
            BlockMode::None => {
                debug!(
                    "{}:{} data line outside any block dropped",
                    self.file_name, self.line_number
                );
                Ok(ParsedLine::Dropped)
            }
        }
    }

    /// Switch block mode from an `LB` line
    ///
    /// Unknown block kinds leave the state untouched.
    fn apply_block_header(&mut self, line: &str) -> Result<()> {
        let parts: Vec<&str> = line.split(',').collect();
        let kind = super::required_field(&parts, fields::BLOCK_KIND, "block kind")
            .map_err(|fault| self.fault(fault))?
            .trim();

        match kind {
            block_kinds::LOGS => {
                let log_list =
                    super::required_field(&parts, fields::BLOCK_LOG_LIST, "log list")
                        .map_err(|fault| self.fault(fault))?
                        .trim();
                self.state.block_mode = BlockMode::Logs;
                self.state.current_log_list_id = Some(log_list.to_string());
                debug!(
                    "{}:{} entering logs block '{}'",
                    self.file_name, self.line_number, log_list
                );
            }
            block_kinds::TRENDS => {
                self.state.block_mode = BlockMode::Trends;
                debug!("{}:{} entering trends block", self.file_name, self.line_number);
            }
            other => {
                debug!(
                    "{}:{} ignoring block header of kind '{}'",
                    self.file_name, self.line_number, other
                );
            }
        }

        Ok(())
    }

    fn fault(&self, fault: LineFault) -> Error {
        Error::format(self.file_name.clone(), self.line_number, fault.to_string())
    }
}
