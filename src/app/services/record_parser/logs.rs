//! Log data line decoding
//!
//! Log lines carry the event code, variable, value, alarm state, an optional
//! event time and a comment. Decoding remaps the event code, looks up the
//! variable's alarm level and splits the value into numeric and text columns.

use super::{LineFault, decode_timestamp, required_field};
use crate::app::models::{LogRecord, split_log_value};
use crate::app::services::event_code_table;
use crate::app::services::variable_database::VariableDatabase;
use crate::constants::{fields, quality};

/// Decode a log event line of the given log list
pub fn decode_log_line(
    parts: &[&str],
    log_list_id: &str,
    variables: &VariableDatabase,
) -> Result<LogRecord, LineFault> {
    let mut timestamp =
        decode_timestamp(required_field(parts, fields::TIMESTAMP, "timestamp")?)?;

    let event_code = required_field(parts, fields::LOG_EVENT_CODE, "event code")?;
    let variable_name = required_field(parts, fields::LOG_VARIABLE, "variable")?;
    let raw_value = required_field(parts, fields::LOG_VALUE, "value")?;
    let alarm_state = required_field(parts, fields::LOG_ALARM_STATE, "alarm state")?;
    let event_time = required_field(parts, fields::LOG_EVENT_TIME, "event time")?;
    let comment = required_field(parts, fields::LOG_COMMENT, "comment")?;

    let event_time = event_time.trim();
    if !event_time.is_empty() {
        timestamp = decode_timestamp(event_time)?;
    }

    let (value, value_text) = split_log_value(raw_value);

    Ok(LogRecord {
        timestamp,
        log_list_id: log_list_id.to_string(),
        assoc_label: String::new(),
        event_number: event_code_table::remap_field(event_code).to_string(),
        event_title: String::new(),
        variable_name: variable_name.to_string(),
        value,
        value_text,
        quality: quality::GOOD,
        alarm_level: variables.level(variable_name).to_string(),
        alarm_state: alarm_state.to_string(),
        comment: strip_whitespace(comment),
        threshold: 0,
        num_param: 0,
        text_param: String::new(),
    })
}

/// Remove every whitespace character from a comment
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
