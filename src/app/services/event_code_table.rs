//! Archive event code remapping
//!
//! The archive tags every log line with an event-type code. The target store
//! classifies events with its own bitmask vocabulary, so every code is mapped
//! through a fixed table. Codes missing from the table map to `0`.

/// Event bitmask vocabulary of the target store
pub mod hds_events {
    pub const NONE: u64 = 0;
    pub const ALARM_ON: u64 = 1 << 0;
    pub const ALARM_OFF: u64 = 1 << 1;
    pub const ALARM_ACK: u64 = 1 << 2;
    pub const ALARM_MASKED: u64 = 1 << 3;
    pub const ALARM_UNMASKED: u64 = 1 << 4;
    pub const ALARM_INHIBITED: u64 = 1 << 5;
    pub const ALARM_RESET: u64 = 1 << 6;
    pub const VALUE_CHANGE: u64 = 1 << 8;
    pub const COMMAND: u64 = 1 << 9;
    pub const SETPOINT: u64 = 1 << 10;
    pub const RECIPE: u64 = 1 << 11;
    pub const OPERATOR_LOGIN: u64 = 1 << 12;
    pub const OPERATOR_LOGOUT: u64 = 1 << 13;
    pub const OPERATOR_MESSAGE: u64 = 1 << 14;
    pub const SYSTEM_START: u64 = 1 << 16;
    pub const SYSTEM_STOP: u64 = 1 << 17;
    pub const SYSTEM_ERROR: u64 = 1 << 18;
    pub const COMMUNICATION_LOST: u64 = 1 << 19;
    pub const COMMUNICATION_RESTORED: u64 = 1 << 20;
    pub const CONFIGURATION_CHANGE: u64 = 1 << 21;
    pub const TIME_CHANGE: u64 = 1 << 22;
    pub const REDUNDANCY_SWITCH: u64 = 1 << 23;
    pub const ARCHIVE_EVENT: u64 = 1 << 24;
    pub const USER_EVENT: u64 = 1 << 28;
}

use hds_events::*;

/// Archive event code → target bitmask, sorted by archive code
pub const EVENT_CODE_TABLE: &[(u64, u64)] = &[
    (0, NONE),
    (1, ALARM_ON),
    (2, ALARM_OFF),
    (4, ALARM_ACK),
    (8, ALARM_MASKED),
    (16, ALARM_UNMASKED),
    (32, ALARM_INHIBITED),
    (64, ALARM_RESET),
    (128, VALUE_CHANGE),
    (256, COMMAND),
    (512, SETPOINT),
    (1024, RECIPE),
    (2048, OPERATOR_LOGIN),
    (4096, OPERATOR_LOGOUT),
    (8192, OPERATOR_MESSAGE),
    (16384, SYSTEM_START),
    (32768, SYSTEM_STOP),
    (65536, SYSTEM_ERROR),
    (131072, COMMUNICATION_LOST),
    (262144, COMMUNICATION_RESTORED),
    (524288, CONFIGURATION_CHANGE),
    (1048576, TIME_CHANGE),
    (2097152, REDUNDANCY_SWITCH),
    (4194304, ARCHIVE_EVENT),
    (8388608, USER_EVENT),
    // Composite archive codes
    (16777216, ALARM_ON | ALARM_ACK),
    (33554432, ALARM_OFF | ALARM_ACK),
    (67108864, ALARM_ON | ALARM_MASKED),
    (134217728, ALARM_OFF | ALARM_RESET),
    (268435456, COMMAND | SETPOINT),
    (4294967296, OPERATOR_LOGIN | OPERATOR_MESSAGE),
    (8589934592, SYSTEM_ERROR | COMMUNICATION_LOST),
    (17179869184, SYSTEM_START | CONFIGURATION_CHANGE),
    (34359738368, USER_EVENT | OPERATOR_MESSAGE),
];

/// Map an archive event code onto the target bitmask
///
/// Unknown codes map to `0`.
pub fn remap(code: u64) -> u64 {
    EVENT_CODE_TABLE
        .binary_search_by_key(&code, |&(archive_code, _)| archive_code)
        .map(|index| EVENT_CODE_TABLE[index].1)
        .unwrap_or(NONE)
}

/// Map the raw event code field of a log line
///
/// A field that is not an unsigned integer is treated like an unknown code.
pub fn remap_field(raw_code: &str) -> u64 {
    match raw_code.trim().parse::<u64>() {
        Ok(code) => remap(code),
        Err(_) => {
            tracing::debug!("Non-numeric event code '{}' mapped to 0", raw_code);
            NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_and_unique() {
        assert!(
            EVENT_CODE_TABLE
                .windows(2)
                .all(|pair| pair[0].0 < pair[1].0)
        );
    }

    #[test]
    fn test_known_codes() {
        for &(code, bitmask) in EVENT_CODE_TABLE {
            assert_eq!(remap(code), bitmask, "code {}", code);
        }
        assert_eq!(remap(1), ALARM_ON);
        assert_eq!(remap(4), ALARM_ACK);
        assert_eq!(remap(34359738368), USER_EVENT | OPERATOR_MESSAGE);
    }

    #[test]
    fn test_unknown_codes_map_to_zero() {
        for code in [3, 5, 100, 536870912, 68719476736, u64::MAX] {
            assert_eq!(remap(code), 0, "code {}", code);
        }
    }

    #[test]
    fn test_remap_field() {
        assert_eq!(remap_field("2"), ALARM_OFF);
        assert_eq!(remap_field(" 8 "), ALARM_MASKED);
        assert_eq!(remap_field("abc"), 0);
        assert_eq!(remap_field(""), 0);
        assert_eq!(remap_field("-1"), 0);
    }
}
