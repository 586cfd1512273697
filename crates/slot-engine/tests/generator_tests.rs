//! Tests for single-rule and per-participant slot generation.

use chrono::{NaiveDate, TimeZone, Utc};
use slot_engine::generator::{generate_participant_slots, generate_slots};
use slot_engine::model::{AvailabilityRule, Span};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn rule(start: &str, end: &str, duration: u32) -> AvailabilityRule {
    AvailabilityRule {
        daily_start_time: start.to_string(),
        daily_end_time: end.to_string(),
        slot_duration_minutes: duration,
        ..AvailabilityRule::default()
    }
}

fn weekday_rule(start: &str, end: &str, duration: u32) -> AvailabilityRule {
    AvailabilityRule {
        excluded_weekdays: vec![0, 6],
        ..rule(start, end, duration)
    }
}

fn at(day: u32, hour: u32, min: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, hour, min, 0).unwrap()
}

/// 2025-01-06 is a Monday.
fn monday() -> Span {
    Span::new(at(6, 0, 0), at(6, 23, 59))
}

// ── Basic generation ────────────────────────────────────────────────────────

#[test]
fn one_hour_window_yields_four_quarter_hour_slots() {
    let slots: Vec<Span> = generate_slots(&weekday_rule("09:00", "10:00", 15), monday()).collect();

    assert_eq!(slots.len(), 4);
    assert_eq!(slots[0], Span::new(at(6, 9, 0), at(6, 9, 15)));
    assert_eq!(slots[1], Span::new(at(6, 9, 15), at(6, 9, 30)));
    assert_eq!(slots[2], Span::new(at(6, 9, 30), at(6, 9, 45)));
    assert_eq!(slots[3], Span::new(at(6, 9, 45), at(6, 10, 0)));
}

#[test]
fn trailing_partial_slot_is_not_emitted() {
    // 09:00-10:00 in 25-minute steps: 09:00-09:25, 09:25-09:50; 09:50-10:15 overruns.
    let slots: Vec<Span> = generate_slots(&rule("09:00", "10:00", 25), monday()).collect();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[1].end, at(6, 9, 50));
}

#[test]
fn excluded_weekday_yields_nothing() {
    let sunday = Span::new(at(5, 0, 0), at(5, 23, 59));
    assert_eq!(generate_slots(&weekday_rule("09:00", "10:00", 15), sunday).count(), 0);
}

#[test]
fn slots_are_clipped_to_the_range() {
    let range = Span::new(at(6, 9, 20), at(6, 23, 59));
    let slots: Vec<Span> = generate_slots(&weekday_rule("09:00", "10:00", 15), range).collect();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start, at(6, 9, 30));
}

#[test]
fn end_of_day_slot_runs_to_next_midnight() {
    let range = Span::new(at(6, 0, 0), at(7, 0, 0));
    let slots: Vec<Span> = generate_slots(&rule("23:00", "24:00", 60), range).collect();
    assert_eq!(slots, vec![Span::new(at(6, 23, 0), at(7, 0, 0))]);
}

// ── Degenerate rules ────────────────────────────────────────────────────────

#[test]
fn inverted_or_empty_daily_window_yields_nothing() {
    assert_eq!(generate_slots(&rule("10:00", "09:00", 15), monday()).count(), 0);
    assert_eq!(generate_slots(&rule("09:00", "09:00", 15), monday()).count(), 0);
}

#[test]
fn unparseable_time_yields_nothing() {
    assert_eq!(generate_slots(&rule("nine", "10:00", 15), monday()).count(), 0);
    assert_eq!(generate_slots(&rule("09:00", "", 15), monday()).count(), 0);
}

#[test]
fn zero_duration_yields_nothing() {
    assert_eq!(generate_slots(&rule("09:00", "10:00", 0), monday()).count(), 0);
}

#[test]
fn empty_range_yields_nothing() {
    let range = Span::new(at(6, 12, 0), at(6, 12, 0));
    assert_eq!(generate_slots(&rule("00:00", "24:00", 15), range).count(), 0);
}

// ── Offsets ─────────────────────────────────────────────────────────────────

#[test]
fn half_hour_offset_rule_lands_on_half_hours_utc() {
    let india = AvailabilityRule {
        timezone_offset_seconds: 19800,
        ..weekday_rule("09:00", "10:00", 15)
    };
    let slots: Vec<Span> = generate_slots(&india, monday()).collect();
    assert_eq!(slots.len(), 4);
    assert_eq!(slots[0], Span::new(at(6, 3, 30), at(6, 3, 45)));
    assert_eq!(slots[3].end, at(6, 4, 30));
}

#[test]
fn evening_rule_west_of_utc_spills_into_next_utc_day() {
    // 20:00-22:00 at -05:00 on Monday the 6th is 01:00-03:00 UTC on the 7th.
    let new_york = AvailabilityRule {
        timezone_offset_seconds: -18000,
        ..rule("20:00", "22:00", 60)
    };
    let tuesday_utc = Span::new(at(7, 0, 0), at(8, 0, 0));
    let slots: Vec<Span> = generate_slots(&new_york, tuesday_utc).collect();
    assert_eq!(
        slots,
        vec![
            Span::new(at(7, 1, 0), at(7, 2, 0)),
            Span::new(at(7, 2, 0), at(7, 3, 0)),
        ]
    );
}

#[test]
fn excluded_weekday_is_judged_in_rule_local_time() {
    // Those UTC-Tuesday slots are local Monday; excluding Monday removes them.
    let new_york = AvailabilityRule {
        timezone_offset_seconds: -18000,
        excluded_weekdays: vec![1],
        ..rule("20:00", "22:00", 60)
    };
    let tuesday_utc = Span::new(at(7, 0, 0), at(8, 0, 0));
    assert_eq!(generate_slots(&new_york, tuesday_utc).count(), 0);
}

// ── Date range of the rule ──────────────────────────────────────────────────

#[test]
fn rule_date_range_is_inclusive() {
    let bounded = AvailabilityRule {
        start_date: NaiveDate::from_ymd_opt(2025, 1, 8),
        end_date: NaiveDate::from_ymd_opt(2025, 1, 9),
        ..rule("09:00", "10:00", 60)
    };
    let week = Span::new(at(6, 0, 0), at(11, 0, 0));
    let starts: Vec<_> = generate_slots(&bounded, week).map(|s| s.start).collect();
    assert_eq!(starts, vec![at(8, 9, 0), at(9, 9, 0)]);
}

// ── Restartability ──────────────────────────────────────────────────────────

#[test]
fn iterator_is_restartable() {
    let r = weekday_rule("08:00", "18:00", 30);
    let week = Span::new(at(6, 0, 0), at(13, 0, 0));

    let iter = generate_slots(&r, week);
    let first: Vec<Span> = iter.clone().collect();
    let second: Vec<Span> = iter.collect();
    let third: Vec<Span> = generate_slots(&r, week).collect();

    assert_eq!(first.len(), 5 * 20);
    assert_eq!(first, second);
    assert_eq!(first, third);
    assert!(first.windows(2).all(|w| w[0] < w[1]), "slots must be ascending");
}

// ── Participant union ───────────────────────────────────────────────────────

#[test]
fn participant_rules_are_unioned_with_first_rule_metadata() {
    let a = AvailabilityRule {
        meeting_link: "https://meet/a".to_string(),
        ..rule("09:00", "10:00", 30)
    };
    let b = AvailabilityRule {
        meeting_link: "https://meet/b".to_string(),
        is_platform_managed: true,
        ..rule("09:30", "11:00", 30)
    };

    let slots = generate_participant_slots(&[a, b], monday());
    let starts: Vec<_> = slots.iter().map(|(s, _)| s.start).collect();
    assert_eq!(starts, vec![at(6, 9, 0), at(6, 9, 30), at(6, 10, 0), at(6, 10, 30)]);

    // 09:30 is produced by both rules; the first one wins.
    assert_eq!(slots[1].1.meeting_link, "https://meet/a");
    assert!(!slots[1].1.is_platform_managed);
    assert_eq!(slots[2].1.meeting_link, "https://meet/b");
    assert!(slots[2].1.is_platform_managed);
}

#[test]
fn participant_without_rules_has_no_slots() {
    assert!(generate_participant_slots(&[], monday()).is_empty());
}
