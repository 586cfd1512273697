//! Engine options.
//!
//! Every field has a default, so an empty TOML document or an absent `config`
//! object in a request is valid.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::window::WeekMode;

/// Largest accepted neighbour-day padding for the generation range.
pub const MAX_PADDING_DAYS: u32 = 2;

/// Largest accepted propagation offset, in days either way.
pub const MAX_PROPAGATION_OFFSET_DAYS: i64 = 366;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Days added on each side of the week when generating slots.
    pub padding_days: u32,
    pub week_mode: WeekMode,
    /// Lead time in hours: slots starting before `now + earliest_bookable_hours`
    /// are not bookable.
    pub earliest_bookable_hours: u32,
    /// Day offsets used when propagating template slots.
    pub propagation_offsets: Vec<i64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            padding_days: 1,
            week_mode: WeekMode::Standard,
            earliest_bookable_hours: 0,
            propagation_offsets: vec![-7, 0, 7],
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidConfig` on a syntax error or a value
    /// that fails [`EngineConfig::validate`].
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(s).map_err(|e| ScheduleError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ScheduleError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.padding_days > MAX_PADDING_DAYS {
            return Err(ScheduleError::InvalidConfig(format!(
                "padding_days must be at most {MAX_PADDING_DAYS}, got {}",
                self.padding_days
            )));
        }
        if self.propagation_offsets.is_empty() {
            return Err(ScheduleError::InvalidConfig(
                "propagation_offsets must not be empty".to_string(),
            ));
        }
        if let Some(offset) = self
            .propagation_offsets
            .iter()
            .find(|offset| !(-MAX_PROPAGATION_OFFSET_DAYS..=MAX_PROPAGATION_OFFSET_DAYS).contains(*offset))
        {
            return Err(ScheduleError::InvalidConfig(format!(
                "propagation_offsets must lie within ±{MAX_PROPAGATION_OFFSET_DAYS} days, got {offset}"
            )));
        }
        Ok(())
    }

    /// The first instant at which a slot may start and still be bookable.
    ///
    /// A lead time reaching past the end of the calendar saturates there.
    pub fn earliest_bookable(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(Duration::hours(i64::from(self.earliest_bookable_hours)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
