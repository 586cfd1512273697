//! Tests for fixed-offset wall-clock arithmetic.

use chrono::{NaiveDate, TimeZone, Utc};
use slot_engine::clock::{
    day_bounds_utc, format_instant, local_date, local_weekday, parse_instant, parse_wall_time,
    to_utc, MINUTES_PER_DAY,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── parse_wall_time ─────────────────────────────────────────────────────────

#[test]
fn parses_two_digit_hours() {
    assert_eq!(parse_wall_time("09:00"), Some(540));
    assert_eq!(parse_wall_time("17:45"), Some(1065));
}

#[test]
fn parses_single_digit_hour_and_surrounding_whitespace() {
    assert_eq!(parse_wall_time("9:30"), Some(570));
    assert_eq!(parse_wall_time(" 08:15 "), Some(495));
}

#[test]
fn twenty_four_hundred_is_end_of_day() {
    assert_eq!(parse_wall_time("24:00"), Some(MINUTES_PER_DAY));
    assert_eq!(parse_wall_time("24:01"), None);
}

#[test]
fn rejects_malformed_times() {
    for bad in ["", "9", "12:60", "ab:cd", "+9:00", "09:0", "009:00", "25:00", "09-00"] {
        assert_eq!(parse_wall_time(bad), None, "{bad:?} should not parse");
    }
}

// ── to_utc / day_bounds_utc ─────────────────────────────────────────────────

#[test]
fn positive_half_hour_offset_shifts_back_into_utc() {
    // 09:00 at +05:30 is 03:30 UTC.
    let instant = to_utc(date(2025, 1, 6), 540, 19800).unwrap();
    assert_eq!(instant, Utc.with_ymd_and_hms(2025, 1, 6, 3, 30, 0).unwrap());
}

#[test]
fn negative_offset_shifts_forward_into_utc() {
    // 01:00 at -05:00 is 06:00 UTC.
    let instant = to_utc(date(2025, 1, 6), 60, -18000).unwrap();
    assert_eq!(instant, Utc.with_ymd_and_hms(2025, 1, 6, 6, 0, 0).unwrap());
}

#[test]
fn day_bounds_span_local_midnight_to_midnight() {
    let (start, end) = day_bounds_utc(date(2025, 1, 6), 3600).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2025, 1, 5, 23, 0, 0).unwrap());
    assert_eq!(end, Utc.with_ymd_and_hms(2025, 1, 6, 23, 0, 0).unwrap());
}

// ── local_date / local_weekday ──────────────────────────────────────────────

#[test]
fn local_date_rolls_over_with_offset() {
    let instant = Utc.with_ymd_and_hms(2025, 1, 5, 23, 30, 0).unwrap();
    assert_eq!(local_date(instant, 0), Some(date(2025, 1, 5)));
    assert_eq!(local_date(instant, 3600), Some(date(2025, 1, 6)));
    assert_eq!(local_date(instant, -86399), Some(date(2025, 1, 4)));
}

#[test]
fn conversions_past_the_calendar_edge_are_none() {
    assert_eq!(to_utc(NaiveDate::MAX, MINUTES_PER_DAY, 0), None);
    assert_eq!(day_bounds_utc(NaiveDate::MIN, 3600), None);
    assert_eq!(local_date(chrono::DateTime::<Utc>::MAX_UTC, 3600), None);
}

#[test]
fn weekday_numbering_starts_at_sunday() {
    assert_eq!(local_weekday(date(2025, 1, 5)), 0); // Sunday
    assert_eq!(local_weekday(date(2025, 1, 6)), 1); // Monday
    assert_eq!(local_weekday(date(2025, 1, 11)), 6); // Saturday
}

// ── format / parse ──────────────────────────────────────────────────────────

#[test]
fn formats_with_milliseconds_and_z_suffix() {
    let instant = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
    assert_eq!(format_instant(instant), "2025-01-06T09:00:00.000Z");
}

#[test]
fn parses_rfc3339_and_naive_instants() {
    assert_eq!(
        parse_instant("2025-01-06T09:00:00+01:00"),
        Some(Utc.with_ymd_and_hms(2025, 1, 6, 8, 0, 0).unwrap())
    );
    assert_eq!(
        parse_instant("2025-01-06T09:00:00.000Z"),
        Some(Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap())
    );
    assert_eq!(
        parse_instant("2025-01-06T09:00:00"),
        Some(Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap())
    );
    assert_eq!(parse_instant("next tuesday"), None);
}
