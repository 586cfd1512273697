//! # slot-engine
//!
//! Deterministic availability intersection and slot scheduling.
//!
//! Given each participant's recurring weekly availability, their bookings,
//! blocks and per-slot overrides, and the viewer's week and offset, the engine
//! produces the timezone-correct list of fixed-duration slots every participant
//! can attend, annotated for display and booking.
//!
//! Participants are folded in one call at a time (see [`pipeline`]); the
//! running intersection is a plain value owned by the caller.
//!
//! ## Modules
//!
//! - [`clock`] — Fixed-offset wall-clock ↔ UTC arithmetic
//! - [`model`] — Rules, intervals and slots
//! - [`generator`] — One rule → ordered fixed-duration slots
//! - [`window`] — Viewer date + week offset → day boundaries
//! - [`intersect`] — Exact-match intersection across participants
//! - [`annotate`] — Booked exclusion, blocked flags, metadata overrides
//! - [`propagate`] — Template slots projected across adjacent weeks
//! - [`output`] — Row and parallel-array results
//! - [`pipeline`] — The participant-at-a-time resumption protocol
//! - [`config`] — Engine options
//! - [`zone`] — IANA zone names → fixed offsets
//! - [`error`] — Error types

pub mod annotate;
pub mod clock;
pub mod config;
pub mod error;
pub mod generator;
pub mod intersect;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod propagate;
pub mod window;
pub mod zone;

pub use annotate::{annotate, Intervals};
pub use config::EngineConfig;
pub use error::ScheduleError;
pub use generator::{generate_participant_slots, generate_slots};
pub use intersect::intersect;
pub use model::{
    AnnotatedSlot, AvailabilityRule, BlockedInterval, BookedInterval, ModifiedSlot, SlotMeta, Span,
};
pub use output::{ScheduleOutput, ScheduledSlot, SlotColumns};
pub use pipeline::{advance, schedule, Baseline, IterationRequest, Participant, ScheduleRequest, Step};
pub use propagate::propagate;
pub use window::{WeekMode, WeekWindow};
