//! Final schedule results, in row form and as parallel arrays.
//!
//! Rows are the natural Rust shape. Workflow backends that only pass flat
//! lists between steps take [`ScheduleOutput::columns`] instead, where every
//! per-slot array has the same length and index `i` always refers to the same
//! slot.

use serde::{Deserialize, Serialize};

use crate::model::{AnnotatedSlot, Span};

/// `[start, end]` as ISO-8601 UTC strings.
pub type SlotPair = [String; 2];

/// One slot of the finished schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSlot {
    #[serde(flatten)]
    pub slot: AnnotatedSlot,
    /// Not booked, not before the earliest bookable instant, inside the week.
    pub bookable: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScheduleOutput {
    /// UTC bounds of each day in the requested week.
    pub days: Vec<Span>,
    /// Every common slot inside the week, sorted ascending.
    pub slots: Vec<ScheduledSlot>,
    /// Template slots propagated across the week.
    pub grid: Vec<Span>,
}

/// The parallel-array form of a [`ScheduleOutput`].
///
/// `day_bounds` and `grid` are the only arrays not indexed by slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlotColumns {
    pub meeting_links: Vec<String>,
    pub addresses: Vec<String>,
    /// `None`, or the booking ids joined with `,`.
    pub booked_by: Vec<Option<String>>,
    pub modified_by: Vec<Option<String>>,
    /// The slot when bookable, cleared to `None` otherwise.
    pub bookable: Vec<Option<SlotPair>>,
    pub day_bounds: Vec<SlotPair>,
    pub slots: Vec<SlotPair>,
    /// `None`, or the blocker ids joined with `,`.
    pub blocked_by: Vec<Option<String>>,
    pub platform_managed: Vec<bool>,
    pub grid: Vec<SlotPair>,
}

impl ScheduleOutput {
    pub fn empty(days: Vec<Span>) -> Self {
        Self {
            days,
            slots: Vec::new(),
            grid: Vec::new(),
        }
    }

    pub fn bookable(&self) -> impl Iterator<Item = &ScheduledSlot> {
        self.slots.iter().filter(|s| s.bookable)
    }

    pub fn columns(&self) -> SlotColumns {
        let mut columns = SlotColumns {
            day_bounds: self.days.iter().map(Span::to_pair).collect(),
            grid: self.grid.iter().map(Span::to_pair).collect(),
            ..SlotColumns::default()
        };

        for scheduled in &self.slots {
            let slot = &scheduled.slot;
            let pair = slot.span.to_pair();
            columns.meeting_links.push(slot.meta.meeting_link.clone());
            columns.addresses.push(slot.meta.address.clone());
            columns.booked_by.push(join_ids(&slot.booked_by));
            columns.modified_by.push(slot.modified_by.clone());
            columns.bookable.push(scheduled.bookable.then(|| pair.clone()));
            columns.blocked_by.push(join_ids(&slot.blocked_by));
            columns.platform_managed.push(slot.meta.is_platform_managed);
            columns.slots.push(pair);
        }

        columns
    }
}

impl SlotColumns {
    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// True when every per-slot array has the same length.
    pub fn is_aligned(&self) -> bool {
        let n = self.slots.len();
        [
            self.meeting_links.len(),
            self.addresses.len(),
            self.booked_by.len(),
            self.modified_by.len(),
            self.bookable.len(),
            self.blocked_by.len(),
            self.platform_managed.len(),
        ]
        .iter()
        .all(|&len| len == n)
    }
}

fn join_ids(ids: &[String]) -> Option<String> {
    (!ids.is_empty()).then(|| ids.join(","))
}
