//! WASM bindings for slot-engine.
//!
//! Exposes full schedules, single protocol iterations, week windows and
//! template propagation to JavaScript via `wasm-bindgen`. All complex types
//! are passed as JSON strings so workflow plugins can hand values straight
//! through between steps.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use serde::{Deserialize, Serialize};
use slot_engine::pipeline::{Baseline, IterationRequest, ScheduleRequest, Step};
use slot_engine::{Span, WeekMode, WeekWindow};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// A finished schedule in both shapes, so plugins can pick rows or arrays.
#[derive(Serialize)]
struct ScheduleDto {
    output: slot_engine::ScheduleOutput,
    columns: slot_engine::SlotColumns,
}

/// Result of one iteration. `columns` is only present when `status == "done"`.
#[derive(Serialize)]
struct StepDto {
    #[serde(flatten)]
    step: Step,
    #[serde(skip_serializing_if = "Option::is_none")]
    columns: Option<slot_engine::SlotColumns>,
}

#[derive(Deserialize)]
struct SpanInput {
    start: String,
    end: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_error(context: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error("Serialization error", e))
}

/// Convert a JSON array of `{start, end}` objects into spans.
///
/// Accepts RFC 3339 and naive `YYYY-MM-DDTHH:MM:SS` (read as UTC), same as
/// the rest of the engine's inputs.
fn parse_spans_json(json: &str) -> Result<Vec<Span>, JsValue> {
    let inputs: Vec<SpanInput> =
        serde_json::from_str(json).map_err(|e| js_error("Invalid spans JSON", e))?;

    inputs
        .into_iter()
        .map(|input| {
            let start = slot_engine::clock::parse_instant(&input.start)
                .ok_or_else(|| JsValue::from_str(&format!("Invalid datetime '{}'", input.start)))?;
            let end = slot_engine::clock::parse_instant(&input.end)
                .ok_or_else(|| JsValue::from_str(&format!("Invalid datetime '{}'", input.end)))?;
            Ok(Span::new(start, end))
        })
        .collect()
}

fn pairs(spans: &[Span]) -> Vec<[String; 2]> {
    spans.iter().map(Span::to_pair).collect()
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute the schedule for every participant in a request.
///
/// `request_json` is a `ScheduleRequest` object. Returns `{output, columns}`.
#[wasm_bindgen(js_name = "computeSchedule")]
pub fn compute_schedule(request_json: &str) -> Result<String, JsValue> {
    let request: ScheduleRequest =
        serde_json::from_str(request_json).map_err(|e| js_error("Invalid request JSON", e))?;
    let output = slot_engine::schedule(&request).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let columns = output.columns();
    to_json(&ScheduleDto { output, columns })
}

/// Run one iteration of the participant-at-a-time protocol.
///
/// `baseline_json` is the `baseline` from the previous call's result, or
/// `undefined` on the first iteration. Returns `{"status": "need_next",
/// "baseline": ...}` or `{"status": "done", "output": ..., "columns": ...}`.
#[wasm_bindgen(js_name = "advanceIteration")]
pub fn advance_iteration(request_json: &str, baseline_json: Option<String>) -> Result<String, JsValue> {
    let request: IterationRequest =
        serde_json::from_str(request_json).map_err(|e| js_error("Invalid request JSON", e))?;
    let baseline: Option<Baseline> = baseline_json
        .as_deref()
        .map(serde_json::from_str::<Baseline>)
        .transpose()
        .map_err(|e| js_error("Invalid baseline JSON", e))?;

    let step = slot_engine::advance(&request, baseline).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let columns = match &step {
        Step::Done { output } => Some(output.columns()),
        Step::NeedNext { .. } => None,
    };
    to_json(&StepDto { step, columns })
}

/// Day boundaries of the requested week as `[start, end]` ISO-8601 pairs.
#[wasm_bindgen(js_name = "weekWindow")]
pub fn week_window(
    viewer_date: &str,
    week_offset: i32,
    offset_seconds: i32,
    extended: bool,
) -> Result<String, JsValue> {
    let mode = if extended {
        WeekMode::Extended
    } else {
        WeekMode::Standard
    };
    let window = WeekWindow::new(viewer_date, week_offset, offset_seconds, mode)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&pairs(&window.days()))
}

/// Project template slots across the given days.
///
/// `templates_json` and `days_json` are arrays of `{start, end}`; `offsets_json`
/// is an array of day offsets such as `[-7, 0, 7]`. Returns `[start, end]` pairs.
#[wasm_bindgen(js_name = "propagateSlots")]
pub fn propagate_slots(templates_json: &str, days_json: &str, offsets_json: &str) -> Result<String, JsValue> {
    let templates = parse_spans_json(templates_json)?;
    let days = parse_spans_json(days_json)?;
    let offsets: Vec<i64> =
        serde_json::from_str(offsets_json).map_err(|e| js_error("Invalid offsets JSON", e))?;

    to_json(&pairs(&slot_engine::propagate(&templates, &offsets, &days)))
}
