//! The participant-at-a-time resumption protocol.
//!
//! Participants arrive one per call. Each call generates that participant's
//! slots, annotates them with the call's intervals, intersects them with the
//! baseline handed back by the previous call, and either returns the new
//! baseline (asking for the next participant) or the finished schedule.
//!
//! The engine keeps nothing between calls. The caller owns the [`Baseline`],
//! may park it (it serializes), retry, or drop it to cancel. Two concurrent
//! requests must each thread their own baseline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::annotate::{annotate, Intervals};
use crate::config::EngineConfig;
use crate::error::{Result, ScheduleError};
use crate::generator::generate_participant_slots;
use crate::intersect::intersect;
use crate::model::{AnnotatedSlot, AvailabilityRule, Span};
use crate::output::{ScheduleOutput, ScheduledSlot};
use crate::propagate::propagate;
use crate::window::WeekWindow;

/// Which week the viewer asked for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowRequest {
    /// `YYYY-MM-DD` or an RFC 3339 instant. Required.
    #[serde(default)]
    pub viewer_date: String,
    #[serde(default)]
    pub week_offset: i32,
    #[serde(default)]
    pub viewer_offset_seconds: i32,
}

impl WindowRequest {
    pub fn build(&self, config: &EngineConfig) -> Result<WeekWindow> {
        WeekWindow::new(
            &self.viewer_date,
            self.week_offset,
            self.viewer_offset_seconds,
            config.week_mode,
        )
    }
}

/// One participant's rules and the intervals that apply to them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub rules: Vec<AvailabilityRule>,
    #[serde(flatten)]
    pub intervals: Intervals,
}

/// Input for a single iteration of the protocol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IterationRequest {
    #[serde(flatten)]
    pub window: WindowRequest,
    /// 1-based position of `participant` in the sequence.
    pub iteration: u32,
    pub participant_count: u32,
    #[serde(flatten)]
    pub participant: Participant,
    /// Reference instant for the earliest-bookable cut-off. No cut-off when absent.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    /// Sparse slots to propagate across the week on the final iteration.
    #[serde(default)]
    pub templates: Vec<Span>,
    #[serde(default)]
    pub config: EngineConfig,
}

/// A whole multi-participant request, for callers that have every
/// participant in hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    #[serde(flatten)]
    pub window: WindowRequest,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    #[serde(default)]
    pub templates: Vec<Span>,
    #[serde(default)]
    pub config: EngineConfig,
}

/// The running intersection, owned by the caller between iterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// The iteration that produced this baseline.
    pub iteration: u32,
    pub participant_count: u32,
    pub window: WeekWindow,
    pub slots: Vec<AnnotatedSlot>,
}

/// What the caller should do next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Step {
    /// Fetch the next participant and call [`advance`] again with this baseline.
    NeedNext { baseline: Baseline },
    /// The last participant has been folded in.
    Done { output: ScheduleOutput },
}

/// Settings that stay fixed across every iteration of one request.
struct Shared<'a> {
    window: WeekWindow,
    now: Option<DateTime<Utc>>,
    templates: &'a [Span],
    config: &'a EngineConfig,
}

/// Run one iteration of the protocol.
///
/// `prior` must be the baseline returned by iteration `iteration - 1`; it is
/// ignored on iteration 1. With `participant_count == 0` the result is an
/// empty schedule.
///
/// # Errors
/// - `ScheduleError::MissingParameter` / `InvalidDate` for a bad `viewer_date`.
/// - `ScheduleError::InvalidConfig` if the embedded config fails validation.
/// - `ScheduleError::InvalidIteration` if `iteration` is 0 or past `participant_count`.
/// - `ScheduleError::MissingBaseline`, `BaselineOutOfSequence` or `WindowMismatch`
///   if `prior` does not belong to the previous iteration of this request.
pub fn advance(request: &IterationRequest, prior: Option<Baseline>) -> Result<Step> {
    request.config.validate()?;
    let window = request.window.build(&request.config)?;

    if request.participant_count == 0 {
        return Ok(Step::Done {
            output: ScheduleOutput::empty(window.days()),
        });
    }

    let shared = Shared {
        window,
        now: request.now,
        templates: &request.templates,
        config: &request.config,
    };
    step(
        &shared,
        request.iteration,
        request.participant_count,
        &request.participant,
        prior,
    )
}

/// Fold every participant in `request` into one schedule, with the same
/// result as calling [`advance`] once per participant.
pub fn schedule(request: &ScheduleRequest) -> Result<ScheduleOutput> {
    request.config.validate()?;
    let window = request.window.build(&request.config)?;

    let shared = Shared {
        window,
        now: request.now,
        templates: &request.templates,
        config: &request.config,
    };

    let mut merged: Option<Vec<AnnotatedSlot>> = None;
    for participant in &request.participants {
        let incoming = participant_slots(&shared, participant);
        merged = Some(match merged.take() {
            None => incoming,
            Some(baseline) => intersect(baseline, incoming),
        });
    }

    Ok(match merged {
        Some(slots) => finish(&shared, slots),
        None => ScheduleOutput::empty(shared.window.days()),
    })
}

/// Generate and annotate one participant's slots over the padded window.
fn participant_slots(shared: &Shared<'_>, participant: &Participant) -> Vec<AnnotatedSlot> {
    let range = shared.window.padded_span(shared.config.padding_days);
    let mut slots: Vec<AnnotatedSlot> = generate_participant_slots(&participant.rules, range)
        .into_iter()
        .map(|(span, meta)| AnnotatedSlot::new(span, meta))
        .collect();
    annotate(&mut slots, &participant.intervals);

    tracing::debug!(
        participant = participant.id.as_deref().unwrap_or(""),
        generated = slots.len(),
        "processing participant"
    );
    slots
}

fn step(
    shared: &Shared<'_>,
    iteration: u32,
    participant_count: u32,
    participant: &Participant,
    prior: Option<Baseline>,
) -> Result<Step> {
    if iteration == 0 || iteration > participant_count {
        return Err(ScheduleError::InvalidIteration {
            iteration,
            participant_count,
        });
    }

    tracing::debug!(iteration, participant_count, "advancing schedule");
    let incoming = participant_slots(shared, participant);

    let slots = if iteration == 1 {
        incoming
    } else {
        let prior = prior.ok_or(ScheduleError::MissingBaseline { iteration })?;
        if prior.iteration != iteration - 1 {
            return Err(ScheduleError::BaselineOutOfSequence {
                expected: iteration - 1,
                found: prior.iteration,
            });
        }
        if prior.participant_count != participant_count {
            return Err(ScheduleError::InvalidIteration {
                iteration,
                participant_count,
            });
        }
        if prior.window != shared.window {
            return Err(ScheduleError::WindowMismatch);
        }
        intersect(prior.slots, incoming)
    };

    if iteration < participant_count {
        return Ok(Step::NeedNext {
            baseline: Baseline {
                iteration,
                participant_count,
                window: shared.window,
                slots,
            },
        });
    }

    Ok(Step::Done {
        output: finish(shared, slots),
    })
}

/// Clip the final baseline to the week and decide bookability.
fn finish(shared: &Shared<'_>, slots: Vec<AnnotatedSlot>) -> ScheduleOutput {
    let earliest = shared.now.map(|now| shared.config.earliest_bookable(now));

    let slots: Vec<ScheduledSlot> = slots
        .into_iter()
        .filter(|slot| shared.window.contains(&slot.span))
        .map(|slot| {
            let bookable = !slot.is_booked() && earliest.is_none_or(|cutoff| slot.span.start >= cutoff);
            ScheduledSlot { slot, bookable }
        })
        .collect();

    let days = shared.window.days();
    let grid = propagate(shared.templates, &shared.config.propagation_offsets, &days);

    tracing::debug!(
        slots = slots.len(),
        bookable = slots.iter().filter(|s| s.bookable).count(),
        grid = grid.len(),
        "schedule complete"
    );

    ScheduleOutput { days, slots, grid }
}
