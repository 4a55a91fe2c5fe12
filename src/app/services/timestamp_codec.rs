//! Archive timestamp decoding
//!
//! Archive timestamps are written as `yyyyMMddTHHmmss.fffZ` in UTC. The target
//! store expects a FILETIME-epoch counter: 100-nanosecond intervals since
//! 1601-01-01T00:00:00Z. The conversion goes through Unix seconds and adds the
//! fixed epoch offset, so nothing depends on a platform FILETIME type.

use crate::constants::{
    ARCHIVE_TIMESTAMP_PATTERN, FILETIME_TICKS_PER_MILLISECOND, FILETIME_TICKS_PER_SECOND,
    FILETIME_UNIX_EPOCH_OFFSET_SECS,
};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

static TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(ARCHIVE_TIMESTAMP_PATTERN).expect("archive timestamp pattern is a valid regex")
});

/// Parse an archive timestamp into a UTC date-time
///
/// The input must match the pattern exactly; there is no trimming and no
/// alternate separator support.
pub fn parse_archive_timestamp(input: &str) -> Result<NaiveDateTime> {
    let captures = TIMESTAMP_REGEX
        .captures(input)
        .ok_or_else(|| Error::timestamp_format(input))?;

    let part = |index: usize| -> Result<u32> {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(|| Error::timestamp_format(input))
    };

    let year = i32::try_from(part(1)?).map_err(|_| Error::timestamp_format(input))?;
    let date = NaiveDate::from_ymd_opt(year, part(2)?, part(3)?)
        .ok_or_else(|| Error::timestamp_format(input))?;
    let time = NaiveTime::from_hms_milli_opt(part(4)?, part(5)?, part(6)?, part(7)?)
        .ok_or_else(|| Error::timestamp_format(input))?;

    Ok(NaiveDateTime::new(date, time))
}

/// Convert a UTC date-time into the FILETIME-epoch counter
pub fn to_filetime_ticks(datetime: &NaiveDateTime) -> i64 {
    let utc = datetime.and_utc();
    let seconds_since_filetime_epoch = utc.timestamp() + FILETIME_UNIX_EPOCH_OFFSET_SECS;
    let milliseconds = i64::from(utc.timestamp_subsec_millis());

    seconds_since_filetime_epoch * FILETIME_TICKS_PER_SECOND
        + milliseconds * FILETIME_TICKS_PER_MILLISECOND
}

/// Decode an archive timestamp straight into the FILETIME-epoch counter
///
/// Instants before 1601-01-01T00:00:00Z have no counter and are rejected.
pub fn decode(input: &str) -> Result<i64> {
    let ticks = to_filetime_ticks(&parse_archive_timestamp(input)?);
    if ticks < 0 {
        return Err(Error::timestamp_format(input));
    }
    Ok(ticks)
}
