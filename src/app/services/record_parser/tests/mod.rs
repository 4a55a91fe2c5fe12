//! Tests for the archive record parser

pub mod trends_tests;

use crate::app::services::variable_database::VariableDatabase;

/// Timestamp of 2023-01-01 12:00:00 UTC as a FILETIME-epoch counter
pub const NOON_2023: i64 = 133_170_480_000_000_000;

/// One second in FILETIME ticks
pub const ONE_SECOND: i64 = 10_000_000;

/// Build a log data line from its meaningful fields
pub fn log_line(
    timestamp: &str,
    event_code: &str,
    variable: &str,
    value: &str,
    alarm_state: &str,
    event_time: &str,
    comment: &str,
) -> String {
    format!(
        "{},EVT,{},x3,x4,{},x6,{},{},{},x10,{}",
        timestamp, event_code, variable, value, alarm_state, event_time, comment
    )
}

/// Variable database with a couple of alarmed variables
pub fn sample_variables() -> VariableDatabase {
    let text = [
        alarm_record("BOILER", "PRESSURE", "4"),
        alarm_record("PUMP", "STATUS", "2"),
    ]
    .join("\n");
    VariableDatabase::from_text(&text).0
}

fn alarm_record(first: &str, second: &str, level: &str) -> String {
    let mut fields = vec![String::new(); 52];
    fields[0] = "ALA".to_string();
    fields[2] = first.to_string();
    fields[3] = second.to_string();
    fields[50] = level.to_string();
    fields.join(",")
}
