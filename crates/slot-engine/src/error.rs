//! Error types for slot-engine operations.
//!
//! Only caller mistakes surface here. Bad participant data (unparseable daily
//! times, inverted ranges, intervals missing a bound) degrades to "no slots" or
//! "skip this entry" and is logged instead.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ScheduleError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Iteration {iteration} is out of range for {participant_count} participant(s)")]
    InvalidIteration {
        iteration: u32,
        participant_count: u32,
    },

    #[error("Iteration {iteration} requires the baseline from the previous iteration")]
    MissingBaseline { iteration: u32 },

    #[error("Baseline out of sequence: expected iteration {expected}, found {found}")]
    BaselineOutOfSequence { expected: u32, found: u32 },

    #[error("Baseline was computed for a different week window")]
    WindowMismatch,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
