//! Data model shared by every stage of the engine.
//!
//! Inputs (rules and intervals) are deserialized from whatever the caller's
//! workflow backend sends; outputs are built fresh on every pass and never
//! persisted by the engine itself.

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::clock;

/// A half-open UTC time range `[start, end)`.
///
/// Ordering is by start, then end, which is the canonical slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Span {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Half-open overlap: touching boundaries do not count.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Closed containment: `other` lies entirely within `self`.
    pub fn contains(&self, other: &Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// The `[start, end]` ISO-8601 pair used in every array output.
    pub fn to_pair(&self) -> [String; 2] {
        [clock::format_instant(self.start), clock::format_instant(self.end)]
    }
}

/// One participant's recurring weekly availability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRule {
    /// Local wall-clock `HH:MM`.
    pub daily_start_time: String,
    /// Local wall-clock `HH:MM`; `"24:00"` means end of day.
    pub daily_end_time: String,
    pub slot_duration_minutes: u32,
    /// Weekdays with no availability, 0 = Sunday through 6 = Saturday.
    #[serde(default)]
    pub excluded_weekdays: Vec<u8>,
    /// Seconds east of UTC for the rule's wall-clock times.
    #[serde(default)]
    pub timezone_offset_seconds: i32,
    /// First local date the rule applies to (inclusive). Unbounded when absent.
    #[serde(default)]
    pub start_date: Option<chrono::NaiveDate>,
    /// Last local date the rule applies to (inclusive). Unbounded when absent.
    #[serde(default)]
    pub end_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub meeting_link: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub is_platform_managed: bool,
}

impl AvailabilityRule {
    pub fn excludes(&self, weekday: u8) -> bool {
        self.excluded_weekdays.contains(&weekday)
    }

    pub fn covers(&self, date: chrono::NaiveDate) -> bool {
        self.start_date.is_none_or(|first| date >= first)
            && self.end_date.is_none_or(|last| date <= last)
    }

    pub fn meta(&self) -> SlotMeta {
        SlotMeta {
            meeting_link: self.meeting_link.clone(),
            address: self.address.clone(),
            is_platform_managed: self.is_platform_managed,
        }
    }
}

/// Location metadata carried by each slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotMeta {
    pub meeting_link: String,
    pub address: String,
    pub is_platform_managed: bool,
}

/// A committed reservation. Slots overlapping it are not bookable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookedInterval {
    #[serde(default, deserialize_with = "lenient_instant")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_instant")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub booking_id: String,
}

/// A user-initiated block. Overlapping slots are flagged, never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockedInterval {
    #[serde(default, deserialize_with = "lenient_instant")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_instant")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub blocker_id: String,
}

/// A per-slot override of the rule's location metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifiedSlot {
    #[serde(default, deserialize_with = "lenient_instant")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_instant")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub meeting_link: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub is_platform_managed: bool,
}

impl ModifiedSlot {
    pub fn meta(&self) -> SlotMeta {
        SlotMeta {
            meeting_link: self.meeting_link.clone(),
            address: self.address.clone(),
            is_platform_managed: self.is_platform_managed,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInstant {
    Text(String),
    Other(IgnoredAny),
}

/// Read an interval bound through [`clock::parse_instant`]. Anything that is
/// not a parseable instant becomes `None`, so the entry is skipped on its own
/// instead of failing the whole request.
fn lenient_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawInstant>::deserialize(deserializer)? {
        Some(RawInstant::Text(s)) => clock::parse_instant(&s),
        Some(RawInstant::Other(_)) | None => None,
    })
}

/// Bounds of a caller-supplied interval, or `None` if either bound is
/// missing or unparseable, or if the interval is inverted.
fn valid_span(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Option<Span> {
    match (start, end) {
        (Some(start), Some(end)) if start < end => Some(Span::new(start, end)),
        _ => None,
    }
}

impl BookedInterval {
    pub fn span(&self) -> Option<Span> {
        valid_span(self.start, self.end)
    }
}

impl BlockedInterval {
    pub fn span(&self) -> Option<Span> {
        valid_span(self.start, self.end)
    }
}

impl ModifiedSlot {
    pub fn span(&self) -> Option<Span> {
        valid_span(self.start, self.end)
    }
}

/// A generated slot with everything the annotation stage attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedSlot {
    #[serde(flatten)]
    pub span: Span,
    #[serde(flatten)]
    pub meta: SlotMeta,
    /// Ids of overlapping bookings, in first-seen order, without duplicates.
    #[serde(default)]
    pub booked_by: Vec<String>,
    /// Ids of overlapping blocks, in first-seen order, without duplicates.
    #[serde(default)]
    pub blocked_by: Vec<String>,
    /// Owner of the override whose metadata replaced the rule's.
    #[serde(default)]
    pub modified_by: Option<String>,
}

impl AnnotatedSlot {
    pub fn new(span: Span, meta: SlotMeta) -> Self {
        Self {
            span,
            meta,
            booked_by: Vec::new(),
            blocked_by: Vec::new(),
            modified_by: None,
        }
    }

    pub fn is_booked(&self) -> bool {
        !self.booked_by.is_empty()
    }

    /// Fold another participant's annotations for the same slot into this one.
    ///
    /// Booked and blocked ids are unioned. An override already recorded here
    /// is kept; otherwise the other side's override (with its metadata) is taken.
    pub fn absorb(&mut self, other: AnnotatedSlot) {
        for id in other.booked_by {
            push_unique(&mut self.booked_by, id);
        }
        for id in other.blocked_by {
            push_unique(&mut self.blocked_by, id);
        }
        if self.modified_by.is_none() && other.modified_by.is_some() {
            self.modified_by = other.modified_by;
            self.meta = other.meta;
        }
    }
}

pub(crate) fn push_unique(ids: &mut Vec<String>, id: String) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}
