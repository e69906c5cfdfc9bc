//! CSV export of the per-day summaries.

use crate::replay::{load_deliveries, load_fixture};
use chrono::Utc;
use log::info;
use serde::Serialize;
use std::io::Write;
use wfd_core::hour_record::{build_records, HourRecord};
use wfd_data::day_forecast::{DayAggregator, DayForecast};
use wfd_data::wind::WindDirectionMean;
use wfd_utils::dates::format_date;

#[derive(Debug, Serialize)]
struct DayRow {
    date: String,
    day_name: String,
    min_temp: f64,
    max_temp: f64,
    avg_temp: f64,
    total_precipitation: f64,
    avg_precipitation_prob: f64,
    avg_wind_speed: f64,
    dominant_wind_direction: f64,
    hours: usize,
}

impl From<&DayForecast> for DayRow {
    fn from(day: &DayForecast) -> Self {
        DayRow {
            date: format_date(&day.date),
            day_name: day.day_name.clone(),
            min_temp: day.min_temp,
            max_temp: day.max_temp,
            avg_temp: day.avg_temp,
            total_precipitation: day.total_precipitation,
            avg_precipitation_prob: day.avg_precipitation_prob,
            avg_wind_speed: day.avg_wind_speed,
            dominant_wind_direction: day.dominant_wind_direction,
            hours: day.hourly_data.len(),
        }
    }
}

const HEADER: [&str; 10] = [
    "date",
    "day_name",
    "min_temp",
    "max_temp",
    "avg_temp",
    "total_precipitation",
    "avg_precipitation_prob",
    "avg_wind_speed",
    "dominant_wind_direction",
    "hours",
];

/// Write one header row and one row per day.
pub fn write_days<W: Write>(writer: W, days: &[DayForecast]) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(HEADER)?;
    for day in days {
        wtr.serialize(DayRow::from(day))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Records from recorded deliveries, latest non-empty delivery wins.
fn records_from_events(path: &str) -> anyhow::Result<Vec<HourRecord>> {
    let now = Utc::now();
    let mut records = Vec::new();
    for delivery in load_deliveries(path)? {
        let built = build_records(&delivery, &now);
        if !built.is_empty() {
            records = built;
        }
    }
    Ok(records)
}

pub async fn run_export(
    output: &str,
    fixture: Option<&str>,
    events: Option<&str>,
    arithmetic_wind: bool,
) -> anyhow::Result<()> {
    let records = match events {
        Some(path) => records_from_events(path)?,
        None => {
            let forecast = load_fixture(fixture)?;
            build_records(&[forecast.to_delivery(&Utc::now())], &Utc::now())
        }
    };
    let wind_mean = if arithmetic_wind {
        WindDirectionMean::Arithmetic
    } else {
        WindDirectionMean::Vector
    };
    let days = DayAggregator::new(wind_mean).aggregate(&records);

    let file = std::fs::File::create(output)?;
    write_days(file, &days)?;
    info!("Wrote {} days to {}", days.len(), output);
    Ok(())
}
