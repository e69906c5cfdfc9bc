//! Command implementations for the WFD CLI.
//!
//! `replay` and `ingest` push deliveries through the widget event loop and
//! print a dashboard snapshot as JSON. `export` writes the day summaries
//! as CSV.

use clap::{Args, Subcommand};
use wfd_core::metric::Metric;
use wfd_data::wind::WindDirectionMean;

pub mod export;
pub mod replay;
pub mod snapshot;

/// Options that shape the dashboard view.
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Metric to project the weekly trend on
    #[arg(short, long, default_value_t = Metric::Temperature)]
    pub metric: Metric,

    /// Day to select (YYYY-MM-DD); defaults to the first forecast day
    #[arg(short, long)]
    pub day: Option<String>,

    /// Average wind bearings arithmetically instead of as vectors
    #[arg(long)]
    pub arithmetic_wind: bool,
}

impl ViewArgs {
    pub fn wind_mean(&self) -> WindDirectionMean {
        if self.arithmetic_wind {
            WindDirectionMean::Arithmetic
        } else {
            WindDirectionMean::Vector
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay the mock forecast fixture through the widget
    Replay {
        /// Fixture path (Open-Meteo hourly JSON); the bundled week if omitted
        #[arg(short, long)]
        fixture: Option<String>,

        /// Delay before the fixture is delivered, in milliseconds
        #[arg(long, default_value_t = 1000)]
        delay_ms: u64,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Feed recorded realtime deliveries through the widget
    Ingest {
        /// JSON file with one delivery or an array of deliveries
        #[arg(short, long)]
        events: String,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Write the per-day summary table as CSV
    Export {
        /// Output CSV path
        #[arg(short, long)]
        output: String,

        /// Fixture path; the bundled week if neither source is given
        #[arg(short, long, conflicts_with = "events")]
        fixture: Option<String>,

        /// Recorded deliveries to export instead of a fixture
        #[arg(short, long)]
        events: Option<String>,

        /// Average wind bearings arithmetically instead of as vectors
        #[arg(long)]
        arithmetic_wind: bool,
    },
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Replay { .. } => "replay",
            Command::Ingest { .. } => "ingest",
            Command::Export { .. } => "export",
        }
    }
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Replay {
            fixture,
            delay_ms,
            view,
        } => replay::run_replay(fixture.as_deref(), delay_ms, &view).await,
        Command::Ingest { events, view } => replay::run_ingest(&events, &view).await,
        Command::Export {
            output,
            fixture,
            events,
            arithmetic_wind,
        } => {
            export::run_export(
                &output,
                fixture.as_deref(),
                events.as_deref(),
                arithmetic_wind,
            )
            .await
        }
    }
}
