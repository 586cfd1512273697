//! Tests for IANA zone → fixed offset resolution.

use chrono::{TimeZone, Utc};
use slot_engine::model::Span;
use slot_engine::zone::{offset_changes_within, offset_seconds_at};
use slot_engine::ScheduleError;

#[test]
fn resolves_standard_and_daylight_offsets() {
    let winter = Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap();
    let summer = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();

    assert_eq!(offset_seconds_at("America/New_York", winter).unwrap(), -18000);
    assert_eq!(offset_seconds_at("America/New_York", summer).unwrap(), -14400);
    assert_eq!(offset_seconds_at("Asia/Kolkata", winter).unwrap(), 19800);
    assert_eq!(offset_seconds_at("UTC", summer).unwrap(), 0);
}

#[test]
fn detects_a_transition_inside_the_window() {
    // US clocks sprang forward on 2025-03-09.
    let dst_week = Span::new(
        Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(),
    );
    let quiet_week = Span::new(
        Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 1, 13, 0, 0, 0).unwrap(),
    );

    assert!(offset_changes_within("America/New_York", dst_week).unwrap());
    assert!(!offset_changes_within("America/New_York", quiet_week).unwrap());
    assert!(!offset_changes_within("Asia/Kolkata", dst_week).unwrap());
}

#[test]
fn unknown_zone_is_rejected() {
    let now = Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap();
    assert_eq!(
        offset_seconds_at("Mars/Olympus_Mons", now).unwrap_err(),
        ScheduleError::InvalidTimezone("Mars/Olympus_Mons".to_string())
    );
}
