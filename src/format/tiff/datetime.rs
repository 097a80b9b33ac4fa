//! `YYYY:MM:DD HH:MM:SS` date/time values.

use chrono::{NaiveDateTime, Timelike};

/// Layout of a date/time value without its zero terminator.
pub const DATE_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Characters in a date/time value without its zero terminator.
pub const DATE_TIME_LENGTH: usize = 19;

/// Parse a date/time value strictly.
///
/// Every field must have its full width and the date must exist in the
/// proleptic Gregorian calendar; leap seconds are rejected.
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    let bytes = value.as_bytes();
    if bytes.len() != DATE_TIME_LENGTH {
        return None;
    }
    let layout_ok = bytes.iter().enumerate().all(|(i, &b)| match i {
        4 | 7 | 13 | 16 => b == b':',
        10 => b == b' ',
        _ => b.is_ascii_digit(),
    });
    if !layout_ok {
        return None;
    }
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .ok()
        .filter(|t| t.second() < 60 && t.nanosecond() == 0)
}

pub fn is_valid_date_time(value: &str) -> bool {
    parse_date_time(value).is_some()
}
