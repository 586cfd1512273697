//! IANA zone names to fixed offsets.
//!
//! The engine itself works with one fixed offset per call. These helpers let
//! callers who only know a zone name pick that offset, and tell them when the
//! chosen window crosses a DST transition the engine will not follow.

use chrono::{DateTime, Duration, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, ScheduleError};
use crate::model::Span;

pub fn parse_zone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| ScheduleError::InvalidTimezone(name.to_string()))
}

/// Offset in seconds east of UTC that `zone` observes at `instant`.
pub fn offset_seconds_at(zone: &str, instant: DateTime<Utc>) -> Result<i32> {
    let tz = parse_zone(zone)?;
    Ok(offset_of(&tz, instant))
}

/// Whether `zone` changes its UTC offset anywhere inside `span`.
///
/// Checks every hour boundary, which catches all real-world transitions.
pub fn offset_changes_within(zone: &str, span: Span) -> Result<bool> {
    let tz = parse_zone(zone)?;
    let initial = offset_of(&tz, span.start);

    let mut cursor = span.start;
    while cursor < span.end {
        cursor = (cursor + Duration::hours(1)).min(span.end);
        if offset_of(&tz, cursor) != initial {
            return Ok(true);
        }
    }
    Ok(false)
}

fn offset_of(tz: &Tz, instant: DateTime<Utc>) -> i32 {
    tz.offset_from_utc_datetime(&instant.naive_utc())
        .fix()
        .local_minus_utc()
}
