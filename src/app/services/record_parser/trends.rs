//! Trend data line decoding

use super::{LineFault, decode_timestamp, required_field};
use crate::app::models::TrendRecord;
use crate::constants::fields;

/// Decode a trend sample line for the declared variable
///
/// Field 0 is the sample timestamp and field 1 the raw value.
pub fn decode_trend_line(
    parts: &[&str],
    current_variable: Option<&str>,
) -> Result<TrendRecord, LineFault> {
    let variable = current_variable.ok_or(LineFault::UndeclaredVariable)?;

    let timestamp = decode_timestamp(required_field(parts, fields::TIMESTAMP, "timestamp")?)?;
    let raw_value = required_field(parts, fields::TREND_VALUE, "value")?;

    Ok(TrendRecord::from_raw_value(timestamp, variable, raw_value))
}
