//! Week window construction for paginated calendar views.
//!
//! The viewer's date is normalized to a local calendar date, shifted by whole
//! weeks in local time, and only then converted to UTC. Shifting after the
//! UTC conversion gives wrong boundaries for offsets near the date line.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::config::MAX_PADDING_DAYS;
use crate::error::{Result, ScheduleError};
use crate::model::Span;

/// How many days a week window spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekMode {
    /// Seven days starting at the target date.
    #[default]
    Standard,
    /// Seven days plus the following day, for views that render overflow.
    Extended,
}

impl WeekMode {
    pub fn day_count(self) -> u32 {
        match self {
            WeekMode::Standard => 7,
            WeekMode::Extended => 8,
        }
    }
}

/// The requested week, anchored at a local date in the viewer's offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    /// Local date of day 0 (viewer date shifted by the week offset).
    pub first_day: NaiveDate,
    pub viewer_offset_seconds: i32,
    pub mode: WeekMode,
}

impl WeekWindow {
    /// Build the window for `viewer_date` shifted by `week_offset` weeks.
    ///
    /// `viewer_date` is either `YYYY-MM-DD` (already a local date) or an
    /// RFC 3339 instant, which is first normalized to the viewer's local date.
    ///
    /// # Errors
    /// Returns `ScheduleError::MissingParameter` if `viewer_date` is blank and
    /// `ScheduleError::InvalidDate` if it cannot be parsed or the shift
    /// overflows the calendar.
    pub fn new(
        viewer_date: &str,
        week_offset: i32,
        viewer_offset_seconds: i32,
        mode: WeekMode,
    ) -> Result<Self> {
        let trimmed = viewer_date.trim();
        if trimmed.is_empty() {
            return Err(ScheduleError::MissingParameter("viewer_date"));
        }

        let local = match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => clock::parse_instant(trimmed)
                .and_then(|instant| clock::local_date(instant, viewer_offset_seconds))
                .ok_or_else(|| ScheduleError::InvalidDate(trimmed.to_string()))?,
        };

        Self::from_local_date(local, week_offset, viewer_offset_seconds, mode)
    }

    /// Build the window from an already-local date.
    ///
    /// Fails with `ScheduleError::InvalidDate` unless the window, padded by
    /// the largest accepted padding, stays inside the representable calendar.
    pub fn from_local_date(
        local: NaiveDate,
        week_offset: i32,
        viewer_offset_seconds: i32,
        mode: WeekMode,
    ) -> Result<Self> {
        let first_day = Duration::try_days(i64::from(week_offset) * 7)
            .and_then(|shift| local.checked_add_signed(shift))
            .ok_or_else(|| ScheduleError::InvalidDate(format!("{local} shifted by {week_offset} weeks")))?;

        let window = Self {
            first_day,
            viewer_offset_seconds,
            mode,
        };
        if window.checked_padded_span(MAX_PADDING_DAYS).is_none() {
            return Err(ScheduleError::InvalidDate(format!(
                "week of {first_day} falls outside the supported calendar"
            )));
        }
        Ok(window)
    }

    /// UTC bounds of each local day, in order.
    pub fn days(&self) -> Vec<Span> {
        (0..self.mode.day_count())
            .filter_map(|i| self.first_day.checked_add_signed(Duration::days(i64::from(i))))
            .filter_map(|day| clock::day_bounds_utc(day, self.viewer_offset_seconds))
            .map(|(start, end)| Span::new(start, end))
            .collect()
    }

    /// From the first day's start to the last day's end.
    pub fn span(&self) -> Span {
        self.padded_span(0)
    }

    /// The window widened by `padding_days` on both sides, used as the
    /// generation range so rules in other offsets still cover the week.
    ///
    /// Empty when the padded window cannot be represented, which only happens
    /// for windows not built through [`WeekWindow::new`].
    pub fn padded_span(&self, padding_days: u32) -> Span {
        self.checked_padded_span(padding_days)
            .unwrap_or_else(|| Span::new(DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MIN_UTC))
    }

    pub fn contains(&self, slot: &Span) -> bool {
        self.span().contains(slot)
    }

    fn checked_padded_span(&self, padding_days: u32) -> Option<Span> {
        let (start, _) = clock::day_bounds_utc(self.first_day, self.viewer_offset_seconds)?;
        let end = start.checked_add_signed(Duration::days(i64::from(self.mode.day_count())))?;
        let pad = Duration::days(i64::from(padding_days));
        Some(Span::new(
            start.checked_sub_signed(pad)?,
            end.checked_add_signed(pad)?,
        ))
    }
}
