//! Replay the fixture or recorded deliveries through the widget runtime.

use crate::snapshot::Snapshot;
use crate::ViewArgs;
use anyhow::Context;
use chrono::Utc;
use log::info;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use wfd_core::observation::DeliveryBatch;
use wfd_dashboard::DashboardState;
use wfd_data::day_forecast::DayAggregator;
use wfd_utils::dates::parse_date;
use wfd_widget::context::{WidgetConfig, WidgetContext};
use wfd_widget::fixture::{self, MockForecast};
use wfd_widget::host;

/// A recorded events file: either a single delivery or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum EventsFile {
    Many(Vec<Vec<DeliveryBatch>>),
    One(Vec<DeliveryBatch>),
}

/// Parse recorded realtime deliveries, one entry per realtime event.
pub fn parse_deliveries(json: &str) -> anyhow::Result<Vec<Vec<DeliveryBatch>>> {
    let file: EventsFile =
        serde_json::from_str(json).context("Events file is neither a delivery nor a list of deliveries")?;
    Ok(match file {
        EventsFile::Many(events) => events,
        EventsFile::One(delivery) => vec![delivery],
    })
}

pub fn load_deliveries(path: &str) -> anyhow::Result<Vec<Vec<DeliveryBatch>>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read events file {}", path))?;
    parse_deliveries(&json)
}

pub fn load_fixture(path: Option<&str>) -> anyhow::Result<MockForecast> {
    match path {
        Some(path) => MockForecast::from_path(Path::new(path)),
        None => MockForecast::bundled(),
    }
}

/// Run fixture mode: start the widget, deliver the fixture after `delay_ms`.
pub async fn run_replay(fixture_path: Option<&str>, delay_ms: u64, view: &ViewArgs) -> anyhow::Result<()> {
    let forecast = load_fixture(fixture_path)?;
    let (handle, runtime) = host::channel();
    let task = tokio::spawn(runtime.run());

    handle.start(WidgetConfig::default()).await?;
    fixture::replay(&handle, &forecast, Duration::from_millis(delay_ms)).await?;
    drop(handle);

    let context = task.await?;
    print_snapshot(context, view)
}

/// Send each recorded delivery as its own realtime event.
pub async fn run_ingest(events: &str, view: &ViewArgs) -> anyhow::Result<()> {
    let deliveries = load_deliveries(events)?;
    info!("Ingesting {} realtime events from {}", deliveries.len(), events);

    let (handle, runtime) = host::channel();
    let task = tokio::spawn(runtime.run());
    handle.start(WidgetConfig::default()).await?;
    for delivery in deliveries {
        handle.realtime(delivery).await?;
    }
    drop(handle);

    let context = task.await?;
    print_snapshot(context, view)
}

/// Derive the dashboard from a finished widget context.
pub fn dashboard(context: &WidgetContext, view: &ViewArgs) -> anyhow::Result<DashboardState> {
    let mut state = DashboardState::new(DayAggregator::new(view.wind_mean()));
    state.refresh(&context.weather_data, Utc::now());
    state.select_metric(view.metric);
    if let Some(day) = &view.day {
        let date = parse_date(day)?;
        if !state.select_day(date) {
            anyhow::bail!("No forecast for {}", date);
        }
    }
    Ok(state)
}

fn print_snapshot(context: WidgetContext, view: &ViewArgs) -> anyhow::Result<()> {
    let state = dashboard(&context, view)?;
    let snapshot = Snapshot::new(
        context.realtime_event_count,
        context.is_loading,
        context.weather_data,
        &state,
    );
    println!("{}", snapshot.to_json()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfd_core::metric::Metric;
    use wfd_widget::context::HostEvent;

    const ONE: &str = r#"[{"result": [
        {"variable": "temperature_2m", "value": 70, "time": "2024-01-01T06:00:00Z", "group": "g1"},
        {"variable": "precipitation", "value": 0.2, "time": "2024-01-01T06:00:00Z", "group": "g1"}
    ]}]"#;

    const MANY: &str = r#"[
        [{"result": [{"variable": "temperature_2m", "value": 70, "group": "g1"}]}],
        [{"result": []}],
        [{"result": [{"variable": "temperature_2m", "value": 71, "group": "g2"}]}, {"result": []}]
    ]"#;

    fn view() -> ViewArgs {
        ViewArgs {
            metric: Metric::Wind,
            day: None,
            arithmetic_wind: false,
        }
    }

    #[test]
    fn test_single_delivery_file() {
        let events = parse_deliveries(ONE).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0][0].result.len(), 2);
    }

    #[test]
    fn test_many_deliveries_file() {
        let events = parse_deliveries(MANY).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].len(), 2);
    }

    #[test]
    fn test_bad_events_file() {
        assert!(parse_deliveries(r#"{"result": []}"#).is_err());
    }

    #[test]
    fn test_dashboard_from_context() {
        let now = Utc::now();
        let mut context = WidgetContext::new();
        for delivery in parse_deliveries(ONE).unwrap() {
            context.apply(HostEvent::Realtime(delivery), &now);
        }
        let state = dashboard(&context, &view()).unwrap();
        assert_eq!(state.days.len(), 1);
        assert_eq!(state.selected_metric, Metric::Wind);
        assert!(state.selected_day.is_some());

        let mut missing_day = view();
        missing_day.day = Some("1999-01-01".to_string());
        assert!(dashboard(&context, &missing_day).is_err());

        let mut bad_day = view();
        bad_day.day = Some("tomorrow".to_string());
        assert!(dashboard(&context, &bad_day).is_err());
    }
}
