//! Tests for trend line decoding

use super::*;
use crate::Error;
use crate::app::services::record_parser::{ParsedLine, RecordParser};
use crate::constants::quality;

fn trends_parser(variables: &VariableDatabase) -> RecordParser<'_> {
    let mut parser = RecordParser::new("plant.dat", variables);
    parser.parse_line("LB,x,x,T").unwrap();
    parser
}

#[test]
fn test_trend_sample_decoding() {
    let variables = VariableDatabase::new();
    let mut parser = trends_parser(&variables);
    parser.parse_line("TR,TempSensor1").unwrap();

    let parsed = parser.parse_line("20230101T120000.000Z,23.4").unwrap();
    let ParsedLine::Trend(record) = parsed else {
        panic!("expected trend record");
    };

    assert_eq!(record.timestamp, NOON_2023);
    assert_eq!(record.variable_name, "TempSensor1");
    assert_eq!(record.value, "23.4");
    assert_eq!(record.quality, quality::GOOD);
}

#[test]
fn test_missing_sample_placeholder() {
    let variables = VariableDatabase::new();
    let mut parser = trends_parser(&variables);
    parser.parse_line("TR,TempSensor1").unwrap();

    let ParsedLine::Trend(record) = parser.parse_line("20230101T120001.000Z,?").unwrap() else {
        panic!("expected trend record");
    };

    assert_eq!(record.timestamp, NOON_2023 + ONE_SECOND);
    assert_eq!(record.value, "0");
    assert_eq!(record.quality, quality::BAD);
}

#[test]
fn test_sample_before_declaration_is_format_error() {
    let variables = VariableDatabase::new();
    let mut parser = trends_parser(&variables);

    let error = parser.parse_line("20230101T120000.000Z,23.4").unwrap_err();
    match error {
        Error::Format { message, line, .. } => {
            assert_eq!(line, 2);
            assert!(message.contains("declared"));
        }
        other => panic!("expected format error, got {:?}", other),
    }
}

#[test]
fn test_bad_timestamp_is_format_error() {
    let variables = VariableDatabase::new();
    let mut parser = trends_parser(&variables);
    parser.parse_line("TR,TempSensor1").unwrap();

    let error = parser.parse_line("2023-01-01 12:00:00,23.4").unwrap_err();
    assert!(error.is_format_error());
    assert!(error.to_string().contains("2023-01-01 12:00:00"));
}

#[test]
fn test_missing_value_field_is_format_error() {
    let variables = VariableDatabase::new();
    let mut parser = trends_parser(&variables);
    parser.parse_line("TR,TempSensor1").unwrap();

    assert!(parser.parse_line("20230101T120000.000Z").is_err());
}

#[test]
fn test_parser_does_not_deduplicate() {
    let variables = VariableDatabase::new();
    let mut parser = trends_parser(&variables);
    parser.parse_line("TR,TempSensor1").unwrap();

    let first = parser.parse_line("20230101T120000.000Z,23.4").unwrap();
    let second = parser.parse_line("20230101T120000.000Z,23.4").unwrap();
    assert_eq!(first, second);
}
