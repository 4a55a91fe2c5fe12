//! Variable record parsing
//!
//! Alarmed variables appear as `ALA`, `ACM` or `ATS` records in the database
//! export. The variable name is spread over fields 2..=13 as a path whose
//! unused segments are left empty; the alarm level sits in field 50.

use crate::app::models::Variable;
use crate::constants::{
    VARIABLE_LEVEL_FIELD, VARIABLE_NAME_FIRST_FIELD, VARIABLE_NAME_LAST_FIELD,
    VARIABLE_NAME_SEPARATOR, VARIABLE_RECORD_PREFIXES,
};
use crate::{Error, Result};
use encoding_rs::Encoding;

/// Check if a database line describes an alarmed variable
pub fn is_variable_record(line: &str) -> bool {
    VARIABLE_RECORD_PREFIXES
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

/// Build the dotted variable name from its path fields
///
/// Empty segments are skipped rather than producing empty path elements.
pub fn build_variable_name(fields: &[&str]) -> String {
    fields
        .iter()
        .skip(VARIABLE_NAME_FIRST_FIELD)
        .take(VARIABLE_NAME_LAST_FIELD - VARIABLE_NAME_FIRST_FIELD + 1)
        .filter(|segment| !segment.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(VARIABLE_NAME_SEPARATOR)
}

/// Parse an alarmed variable record
///
/// Returns `None` when the record is too short to carry the alarm level.
pub fn parse_variable_record(line: &str) -> Option<Variable> {
    let fields: Vec<&str> = line.split(',').collect();
    let level = fields.get(VARIABLE_LEVEL_FIELD)?;

    Some(Variable {
        name: build_variable_name(&fields),
        level: level.trim().to_string(),
    })
}

/// Resolve an encoding label such as `windows-1252` or `utf-8`
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
        Error::configuration(format!("Unknown variable database encoding: '{}'", label))
    })
}
