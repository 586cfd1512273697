//! `slots` CLI — compute bookable meeting slots from JSON requests.
//!
//! ## Usage
//!
//! ```sh
//! # Full multi-participant schedule (stdin → stdout)
//! slots schedule < request.json
//!
//! # Same, as parallel arrays, with engine options from a file
//! slots --config engine.toml schedule -i request.json --columns
//!
//! # One iteration of the participant-at-a-time protocol
//! slots step -i step.json
//!
//! # Day boundaries of next week for a viewer at +05:30
//! slots window --date 2025-01-06 --week-offset 1 --offset-seconds 19800
//!
//! # Project template slots across the displayed week
//! slots propagate --date 2025-01-06 -i templates.json
//! ```

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use slot_engine::clock;
use slot_engine::pipeline::{self, Baseline, IterationRequest, ScheduleRequest};
use slot_engine::{EngineConfig, Span, WeekMode, WeekWindow};

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Bookable meeting slots across participants"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine options (TOML); replaces any `config` embedded in the request
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level to stderr (otherwise RUST_LOG, default warn)
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the schedule for every participant in a request
    Schedule {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit parallel arrays instead of slot records
        #[arg(long)]
        columns: bool,
        /// Reference instant for the earliest-bookable cut-off (RFC 3339)
        #[arg(long)]
        now: Option<String>,
    },
    /// Run one iteration: reads `{"request": ..., "baseline": ...}`
    Step {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Reference instant for the earliest-bookable cut-off (RFC 3339)
        #[arg(long)]
        now: Option<String>,
    },
    /// Print the UTC day boundaries of a week
    Window {
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Project template slots across a week: reads `{"templates": [...], "days"?: [...]}`
    Propagate {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        window: OptionalWindowArgs,
    },
}

#[derive(clap::Args)]
struct WindowArgs {
    /// Viewer date, `YYYY-MM-DD` or an RFC 3339 instant
    #[arg(long)]
    date: String,
    /// Weeks to page forward (positive) or backward (negative)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    week_offset: i32,
    /// Viewer offset in seconds east of UTC
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    offset_seconds: i32,
    /// Eight days instead of seven
    #[arg(long)]
    extended: bool,
}

#[derive(clap::Args)]
struct OptionalWindowArgs {
    /// Viewer date; required unless the input carries `days`
    #[arg(long)]
    date: Option<String>,
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    week_offset: i32,
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    offset_seconds: i32,
    #[arg(long)]
    extended: bool,
}

#[derive(Deserialize)]
struct StepInput {
    request: IterationRequest,
    #[serde(default)]
    baseline: Option<Baseline>,
}

#[derive(Deserialize)]
struct PropagateInput {
    templates: Vec<Span>,
    #[serde(default)]
    days: Option<Vec<Span>>,
}

#[derive(Serialize)]
struct PairsOutput {
    slots: Vec<[String; 2]>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = cli
        .config
        .as_deref()
        .map(EngineConfig::load)
        .transpose()
        .context("Failed to load engine config")?;

    match cli.command {
        Commands::Schedule {
            input,
            output,
            columns,
            now,
        } => {
            let text = read_input(input.as_deref())?;
            let mut request: ScheduleRequest =
                serde_json::from_str(&text).context("Failed to parse schedule request")?;
            if let Some(config) = config {
                request.config = config;
            }
            request.now = resolve_now(now.as_deref(), request.now, &request.config)?;

            let result = pipeline::schedule(&request).context("Failed to compute schedule")?;
            let json = if columns {
                serde_json::to_string_pretty(&result.columns())?
            } else {
                serde_json::to_string_pretty(&result)?
            };
            write_output(output.as_deref(), &json)?;
        }
        Commands::Step { input, output, now } => {
            let text = read_input(input.as_deref())?;
            let input: StepInput =
                serde_json::from_str(&text).context("Failed to parse step input")?;
            let StepInput {
                mut request,
                baseline,
            } = input;
            if let Some(config) = config {
                request.config = config;
            }
            request.now = resolve_now(now.as_deref(), request.now, &request.config)?;

            let step = pipeline::advance(&request, baseline).context("Failed to advance iteration")?;
            write_output(output.as_deref(), &serde_json::to_string_pretty(&step)?)?;
        }
        Commands::Window { window } => {
            let week = WeekWindow::new(
                &window.date,
                window.week_offset,
                window.offset_seconds,
                mode(window.extended),
            )
            .context("Failed to build week window")?;
            let pairs: Vec<[String; 2]> = week.days().iter().map(Span::to_pair).collect();
            println!("{}", serde_json::to_string_pretty(&pairs)?);
        }
        Commands::Propagate {
            input,
            output,
            window,
        } => {
            let text = read_input(input.as_deref())?;
            let parsed: PropagateInput =
                serde_json::from_str(&text).context("Failed to parse propagate input")?;
            let config = config.unwrap_or_default();

            let days = match (parsed.days, window.date.as_deref()) {
                (Some(days), _) => days,
                (None, Some(date)) => WeekWindow::new(
                    date,
                    window.week_offset,
                    window.offset_seconds,
                    mode(window.extended),
                )
                .context("Failed to build week window")?
                .days(),
                (None, None) => anyhow::bail!("propagate needs either `days` in the input or --date"),
            };

            let grid = slot_engine::propagate(&parsed.templates, &config.propagation_offsets, &days);
            let out = PairsOutput {
                slots: grid.iter().map(Span::to_pair).collect(),
            };
            write_output(output.as_deref(), &serde_json::to_string_pretty(&out)?)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn mode(extended: bool) -> WeekMode {
    if extended {
        WeekMode::Extended
    } else {
        WeekMode::Standard
    }
}

/// Pick the reference instant: `--now` wins, then the request's own `now`.
/// Without either, the current time is used only when a lead time is configured.
fn resolve_now(
    flag: Option<&str>,
    from_request: Option<DateTime<Utc>>,
    config: &EngineConfig,
) -> Result<Option<DateTime<Utc>>> {
    if let Some(raw) = flag {
        let now = clock::parse_instant(raw)
            .with_context(|| format!("Invalid --now instant: {}", raw))?;
        return Ok(Some(now));
    }
    if from_request.is_some() {
        return Ok(from_request);
    }
    Ok((config.earliest_bookable_hours > 0).then(Utc::now))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
