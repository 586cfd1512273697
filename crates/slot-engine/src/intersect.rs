//! Exact-match intersection of participants' slot sets.
//!
//! Two participants share a slot only if their generated `(start, end)` pairs
//! are identical. Overlap is not enough: a slot one side is free for only part
//! of the time is not common availability.

use std::collections::HashMap;

use crate::model::{AnnotatedSlot, Span};

/// Keep the baseline slots that also appear in `incoming`, folding the
/// incoming annotations into them.
///
/// Baseline order is preserved. Slots missing from either side are dropped
/// and cannot come back in a later iteration.
pub fn intersect(baseline: Vec<AnnotatedSlot>, incoming: Vec<AnnotatedSlot>) -> Vec<AnnotatedSlot> {
    let before = baseline.len();
    let mut by_key: HashMap<Span, AnnotatedSlot> = HashMap::with_capacity(incoming.len());
    for slot in incoming {
        by_key.entry(slot.span).or_insert(slot);
    }

    let merged: Vec<AnnotatedSlot> = baseline
        .into_iter()
        .filter_map(|mut slot| {
            let other = by_key.remove(&slot.span)?;
            slot.absorb(other);
            Some(slot)
        })
        .collect();

    tracing::debug!(before, after = merged.len(), "intersected baseline");
    merged
}
