//! Archive record parser
//!
//! This module classifies the lines of a `.dat` archive and decodes data
//! lines into trend or log records according to the active block.
//!
//! ## Architecture
//!
//! - [`parser`] - Line classification and the per-file state machine
//! - [`trends`] - Trend data line decoding
//! - [`logs`] - Log data line decoding and alarm enrichment
//!
//! ## Record grammar
//!
//! ```text
//! LB,<id>,<id>,T            start a trends block
//! TR,<variable>             declare the variable of following samples
//! 20230101T120000.000Z,23.4 trend sample
//! LB,<id>,<id>,L,<loglist>  start a logs block
//! LC,...                    caption, ignored
//! <timestamp>,x,<code>,x,x,<variable>,x,<value>,<state>,<time>,x,<comment>
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use hds_converter::app::services::record_parser::{ParsedLine, RecordParser};
//! use hds_converter::app::services::variable_database::VariableDatabase;
//!
//! # fn example() -> hds_converter::Result<()> {
//! let variables = VariableDatabase::new();
//! let mut parser = RecordParser::new("plant.dat", &variables);
//!
//! parser.parse_line("LB,1,1,T")?;
//! parser.parse_line("TR,TempSensor1")?;
//! if let ParsedLine::Trend(record) = parser.parse_line("20230101T120000.000Z,23.4")? {
//!     assert_eq!(record.quality, 192);
//! }
//! # Ok(())
//! # }
//! ```

pub mod logs;
pub mod parser;
pub mod trends;

#[cfg(test)]
pub mod tests;

use std::fmt;

// Re-export main types for easy access
pub use parser::{ParsedLine, ParserState, RecordParser};

/// Reason a single line could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineFault {
    /// A required field index is past the end of the line
    MissingField { index: usize, name: &'static str },
    /// A timestamp field does not match the archive pattern
    Timestamp(String),
    /// A trend sample appeared before any `TR` declaration
    UndeclaredVariable,
}

impl fmt::Display for LineFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { index, name } => {
                write!(f, "missing field {} ({})", index, name)
            }
            Self::Timestamp(input) => {
                write!(f, "invalid timestamp '{}', expected yyyyMMddTHHmmss.fffZ", input)
            }
            Self::UndeclaredVariable => write!(
                f,
                "variable needs to be declared before checking for values"
            ),
        }
    }
}

/// Fetch a field by index, naming it in the fault when absent
pub(crate) fn required_field<'a>(
    parts: &[&'a str],
    index: usize,
    name: &'static str,
) -> Result<&'a str, LineFault> {
    parts
        .get(index)
        .copied()
        .ok_or(LineFault::MissingField { index, name })
}

/// Decode a timestamp field into the FILETIME-epoch counter
pub(crate) fn decode_timestamp(raw: &str) -> Result<i64, LineFault> {
    crate::app::services::timestamp_codec::decode(raw)
        .map_err(|_| LineFault::Timestamp(raw.to_string()))
}
