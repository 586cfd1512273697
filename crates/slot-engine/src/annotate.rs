//! Booking exclusion, block flags and metadata overrides.
//!
//! Every test here is the half-open overlap `[a, b)` vs `[c, d)`: a slot that
//! merely touches an interval is unaffected. Entries with a missing or
//! unparseable bound, or with the end not after the start, are skipped and logged.

use serde::{Deserialize, Serialize};

use crate::model::{push_unique, AnnotatedSlot, BlockedInterval, BookedInterval, ModifiedSlot, Span};

/// The interval lists supplied wholesale with one call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intervals {
    #[serde(default)]
    pub booked: Vec<BookedInterval>,
    #[serde(default)]
    pub blocked: Vec<BlockedInterval>,
    #[serde(default)]
    pub modified: Vec<ModifiedSlot>,
}

/// Apply bookings, blocks and overrides to `slots` in place.
///
/// - Overlapping bookings record their id in `booked_by`; the slot keeps its index.
/// - Overlapping blocks record their id in `blocked_by`.
/// - The first override in input order that overlaps replaces the slot's
///   metadata and sets `modified_by`. Slots that already carry an override keep it.
pub fn annotate(slots: &mut [AnnotatedSlot], intervals: &Intervals) {
    let booked: Vec<(Span, &BookedInterval)> = valid_entries(&intervals.booked, "booked", BookedInterval::span);
    let blocked: Vec<(Span, &BlockedInterval)> =
        valid_entries(&intervals.blocked, "blocked", BlockedInterval::span);
    let modified: Vec<(Span, &ModifiedSlot)> =
        valid_entries(&intervals.modified, "modified", ModifiedSlot::span);

    for slot in slots.iter_mut() {
        for (span, entry) in &booked {
            if slot.span.overlaps(span) {
                push_unique(&mut slot.booked_by, entry.booking_id.clone());
            }
        }

        for (span, entry) in &blocked {
            if slot.span.overlaps(span) {
                push_unique(&mut slot.blocked_by, entry.blocker_id.clone());
            }
        }

        if slot.modified_by.is_none() {
            if let Some((_, entry)) = modified.iter().find(|(span, _)| slot.span.overlaps(span)) {
                slot.meta = entry.meta();
                slot.modified_by = Some(entry.owner_id.clone());
            }
        }
    }
}

/// Pair each well-formed entry with its span, logging and dropping the rest.
fn valid_entries<'a, T>(
    entries: &'a [T],
    kind: &'static str,
    span_of: fn(&T) -> Option<Span>,
) -> Vec<(Span, &'a T)> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match span_of(entry) {
            Some(span) => Some((span, entry)),
            None => {
                tracing::warn!(kind, index, "skipping malformed interval");
                None
            }
        })
        .collect()
}
