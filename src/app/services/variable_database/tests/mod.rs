//! Shared test utilities and fixtures for variable database tests

use crate::constants::{VARIABLE_LEVEL_FIELD, VARIABLE_NAME_FIRST_FIELD};
use std::fs;
use std::path::{Path, PathBuf};


/// Build a database record with the given name path segments and level
///
/// Segments fill fields 2.. in order; the record is padded to reach the
/// level field and a few trailing fields.
pub fn variable_record(prefix: &str, segments: &[&str], level: &str) -> String {
    let mut fields = vec![String::new(); VARIABLE_LEVEL_FIELD + 4];
    fields[0] = prefix.to_string();
    fields[1] = "1".to_string();
    for (offset, segment) in segments.iter().enumerate() {
        fields[VARIABLE_NAME_FIRST_FIELD + offset] = segment.to_string();
    }
    fields[VARIABLE_LEVEL_FIELD] = level.to_string();
    fields.join(",")
}

/// Write a database file with the given lines encoded as Windows-1252
pub fn write_database_file(dir: &Path, filename: &str, lines: &[String]) -> PathBuf {
    let text = lines.join("\r\n");
    let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(&text);
    let path = dir.join(filename);
    fs::write(&path, bytes).unwrap();
    path
}
