//! Project sparse template slots across neighbouring weeks.
//!
//! Callers with only a handful of confirmed slots (a recurring Tuesday 10:00,
//! say) use this to fill in the same time of day on every matching day in the
//! displayed range.

use std::collections::BTreeSet;

use chrono::Duration;

use crate::model::Span;

/// Shift each template by every day offset in `offsets`, keeping candidates
/// that lie fully inside the range covered by `days`.
///
/// Adjacent days are merged first, so a slot crossing midnight between two
/// displayed days is kept while one crossing the edge of the range is not.
/// Durations are preserved. The result is de-duplicated on exact `(start, end)`
/// and sorted ascending by start. Templates whose end is not after their start
/// are ignored, as are shifts that leave the representable calendar.
pub fn propagate(templates: &[Span], offsets: &[i64], days: &[Span]) -> Vec<Span> {
    let ranges = merge_days(days);
    let mut out: BTreeSet<Span> = BTreeSet::new();

    for template in templates {
        if template.end <= template.start {
            tracing::warn!(start = %template.start, end = %template.end, "skipping empty template slot");
            continue;
        }
        let duration = template.end - template.start;

        for &offset in offsets {
            let Some(candidate) = shift(template, offset, duration) else {
                tracing::warn!(offset, "skipping propagation offset outside the calendar");
                continue;
            };
            if ranges.iter().any(|range| range.contains(&candidate)) {
                out.insert(candidate);
            }
        }
    }

    out.into_iter().collect()
}

fn shift(template: &Span, offset_days: i64, duration: Duration) -> Option<Span> {
    let start = template.start.checked_add_signed(Duration::try_days(offset_days)?)?;
    let end = start.checked_add_signed(duration)?;
    Some(Span::new(start, end))
}

/// Merge overlapping or adjacent day bounds into sorted, disjoint ranges.
fn merge_days(days: &[Span]) -> Vec<Span> {
    let mut sorted: Vec<Span> = days.iter().copied().filter(|d| d.start < d.end).collect();
    sorted.sort();

    let mut merged: Vec<Span> = Vec::new();
    for day in sorted {
        if let Some(last) = merged.last_mut() {
            if day.start <= last.end {
                last.end = last.end.max(day.end);
                continue;
            }
        }
        merged.push(day);
    }
    merged
}
