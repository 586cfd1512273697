//! Slot generation -- turns one availability rule into fixed-duration slots.
//!
//! Days are walked in the rule's own local time from the local date of
//! `range.start` to the local date of `range.end`. For each retained day the
//! daily window is cut into consecutive slots of `slot_duration_minutes`, and
//! only slots lying entirely inside `range` are emitted.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::clock;
use crate::model::{AvailabilityRule, SlotMeta, Span};

/// Lazy iterator over the slots of one rule within a range.
///
/// Pure function of its inputs: cloning it, or calling [`generate_slots`]
/// again, restarts the same sequence.
#[derive(Debug, Clone)]
pub struct SlotIter<'a> {
    rule: &'a AvailabilityRule,
    range: Span,
    daily: Option<(u32, u32)>,
    duration: Duration,
    next_day: Option<NaiveDate>,
    last_day: NaiveDate,
    cursor: Option<DateTime<Utc>>,
    day_end: DateTime<Utc>,
}

/// Generate the slots of `rule` that fall fully inside `range`, in ascending order.
///
/// A rule whose daily times do not parse, whose end is not after its start, or
/// whose duration is zero produces no slots. That is a valid "no availability"
/// state, not an error.
pub fn generate_slots(rule: &AvailabilityRule, range: Span) -> SlotIter<'_> {
    let offset = rule.timezone_offset_seconds;
    let daily = daily_window(rule);
    if daily.is_none() {
        tracing::warn!(
            daily_start_time = %rule.daily_start_time,
            daily_end_time = %rule.daily_end_time,
            slot_duration_minutes = rule.slot_duration_minutes,
            "availability rule yields no slots"
        );
    }

    let first_day = clock::local_date(range.start, offset);
    let last_day = clock::local_date(range.end, offset);

    // A range whose local dates fall off the calendar yields nothing.
    let next_day = match (daily, first_day, last_day) {
        (Some(_), Some(first), Some(_)) if range.start < range.end => Some(first),
        _ => None,
    };

    SlotIter {
        rule,
        range,
        daily,
        duration: Duration::minutes(i64::from(rule.slot_duration_minutes)),
        next_day,
        last_day: last_day.unwrap_or(NaiveDate::MIN),
        cursor: None,
        day_end: range.start,
    }
}

/// Parsed `(start, end)` minutes of the rule's daily window, if it can produce slots.
fn daily_window(rule: &AvailabilityRule) -> Option<(u32, u32)> {
    let start = clock::parse_wall_time(&rule.daily_start_time)?;
    let end = clock::parse_wall_time(&rule.daily_end_time)?;
    (end > start && rule.slot_duration_minutes > 0).then_some((start, end))
}

impl Iterator for SlotIter<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        loop {
            if let Some(slot_start) = self.cursor {
                let slot_end = slot_start.checked_add_signed(self.duration);
                if let Some(slot_end) = slot_end.filter(|end| *end <= self.day_end) {
                    self.cursor = Some(slot_end);
                    let slot = Span::new(slot_start, slot_end);
                    if self.range.contains(&slot) {
                        return Some(slot);
                    }
                    continue;
                }
                self.cursor = None;
            }

            let day = self.next_day.filter(|day| *day <= self.last_day)?;
            self.next_day = day.succ_opt();

            let (start_minute, end_minute) = self.daily?;
            if self.rule.excludes(clock::local_weekday(day)) || !self.rule.covers(day) {
                continue;
            }

            let offset = self.rule.timezone_offset_seconds;
            let (Some(day_start), Some(day_end)) = (
                clock::to_utc(day, start_minute, offset),
                clock::to_utc(day, end_minute, offset),
            ) else {
                continue;
            };
            tracing::trace!(%day, "generating slots for day");
            self.cursor = Some(day_start);
            self.day_end = day_end;
        }
    }
}

/// Generate the union of a participant's rules within `range`.
///
/// Slots are keyed by exact `(start, end)`; when two rules produce the same
/// slot the earlier rule's metadata is kept. The result is sorted ascending.
pub fn generate_participant_slots(
    rules: &[AvailabilityRule],
    range: Span,
) -> Vec<(Span, SlotMeta)> {
    let mut slots: BTreeMap<Span, SlotMeta> = BTreeMap::new();
    for rule in rules {
        for slot in generate_slots(rule, range) {
            slots.entry(slot).or_insert_with(|| rule.meta());
        }
    }
    slots.into_iter().collect()
}
