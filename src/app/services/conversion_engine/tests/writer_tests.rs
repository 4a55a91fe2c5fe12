//! Tests for positional CSV output

use super::*;
use crate::app::services::conversion_engine::RecordWriter;

fn fields(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn test_rows_are_unquoted_and_crlf_terminated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.csv");

    let mut writer = RecordWriter::create(&path, 0).unwrap();
    writer.write_fields(&fields(&["1", "a,b", "say \"hi\""])).unwrap();
    writer.write_fields(&fields(&["2", "", "x"])).unwrap();
    writer.flush().unwrap();
    assert_eq!(writer.rows_written(), 2);

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "1,a,b,say \"hi\"\r\n2,,x\r\n");
}

#[test]
fn test_extra_columns_pad_every_row() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.csv");

    let mut writer = RecordWriter::create(&path, 3).unwrap();
    writer.write_fields(&fields(&["1", "v"])).unwrap();
    writer.flush().unwrap();

    assert_eq!(read_rows(&path), vec!["1,v,,,".to_string()]);
}

#[test]
fn test_create_truncates_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.csv");
    std::fs::write(&path, "stale content\r\n").unwrap();

    let mut writer = RecordWriter::create(&path, 0).unwrap();
    writer.flush().unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_create_fails_when_path_is_a_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("taken");
    std::fs::create_dir(&path).unwrap();

    let error = RecordWriter::create(&path, 0).unwrap_err();
    assert!(matches!(error, crate::Error::Io { .. }));
}
