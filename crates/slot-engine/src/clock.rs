//! Fixed-offset wall-clock arithmetic.
//!
//! Converts a local calendar date plus a minute-of-day into an absolute UTC
//! instant and back. Offsets are plain seconds east of UTC (19800 for +05:30),
//! applied uniformly: one offset per call, no DST awareness.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

/// Minutes in one calendar day. `"24:00"` parses to this value.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parse a local wall-clock time of the form `HH:MM` into minutes since midnight.
///
/// Hours may be one or two digits, minutes exactly two. `"24:00"` is accepted
/// as the end of the day. Returns `None` for anything else, which callers treat
/// as "no availability" rather than an error.
pub fn parse_wall_time(s: &str) -> Option<u32> {
    let (hours, minutes) = s.trim().split_once(':')?;
    if hours.is_empty()
        || hours.len() > 2
        || minutes.len() != 2
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }

    let total = hours * 60 + minutes;
    (total <= MINUTES_PER_DAY).then_some(total)
}

/// Convert a local date and minute-of-day into a UTC instant.
///
/// `None` when the result falls outside the representable calendar.
pub fn to_utc(date: NaiveDate, minute_of_day: u32, offset_seconds: i32) -> Option<DateTime<Utc>> {
    date.and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::minutes(i64::from(minute_of_day)))?
        .checked_sub_signed(Duration::seconds(i64::from(offset_seconds)))
        .map(|local| local.and_utc())
}

/// UTC bounds of a local calendar day: local midnight to the following local midnight.
pub fn day_bounds_utc(date: NaiveDate, offset_seconds: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    Some((
        to_utc(date, 0, offset_seconds)?,
        to_utc(date, MINUTES_PER_DAY, offset_seconds)?,
    ))
}

/// The local calendar date an instant falls on at the given offset.
pub fn local_date(instant: DateTime<Utc>, offset_seconds: i32) -> Option<NaiveDate> {
    instant
        .naive_utc()
        .checked_add_signed(Duration::seconds(i64::from(offset_seconds)))
        .map(|local| local.date())
}

/// Weekday number of a date, 0 = Sunday through 6 = Saturday.
pub fn local_weekday(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always in 0..7
    date.weekday().num_days_from_sunday() as u8
}

/// Render an instant as ISO-8601 UTC with millisecond precision,
/// e.g. `2025-01-06T09:00:00.000Z`.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 instant.
///
/// Accepts RFC 3339 (with offset or `Z`) and naive `YYYY-MM-DDTHH:MM:SS`,
/// which is interpreted as UTC.
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s.trim()) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|ndt| ndt.and_utc())
}
