use crate::wind::WindDirectionMean;
use chrono::{Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wfd_core::hour_record::HourRecord;
use wfd_utils::dates::{calendar_day, day_name};
use wfd_utils::numbers::mean;

/// Summary of one local calendar day of hourly records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayForecast {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon".
    pub day_name: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub total_precipitation: f64,
    pub avg_precipitation_prob: f64,
    pub avg_wind_speed: f64,
    pub dominant_wind_direction: f64,
    /// The day's records, ascending by `forecast_time`.
    pub hourly_data: Vec<HourRecord>,
}

impl DayForecast {
    /// Summarize one day of records. None if the day has no temperature
    /// samples to take a min/max over.
    pub fn from_hours(
        date: NaiveDate,
        mut hours: Vec<HourRecord>,
        wind_mean: WindDirectionMean,
    ) -> Option<DayForecast> {
        let temperatures: Vec<f64> = hours
            .iter()
            .map(|h| h.temperature_two_m)
            .filter(|t| t.is_finite())
            .collect();
        let avg_temp = mean(&temperatures)?;
        let min_temp = temperatures.iter().copied().fold(f64::INFINITY, f64::min);
        let max_temp = temperatures.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let column = |f: fn(&HourRecord) -> f64| hours.iter().map(f).collect::<Vec<f64>>();
        let precipitations = column(|h| h.precipitation);
        let probabilities = column(|h| h.precipitation_probability);
        let wind_speeds = column(|h| h.wind_speed_ten_m);
        let wind_directions = column(|h| h.wind_direction_ten_m);

        hours.sort_by_key(|h| h.forecast_time);

        Some(DayForecast {
            date,
            day_name: day_name(&date),
            min_temp,
            max_temp,
            avg_temp,
            total_precipitation: precipitations.iter().sum(),
            avg_precipitation_prob: mean(&probabilities).unwrap_or(0.0),
            avg_wind_speed: mean(&wind_speeds).unwrap_or(0.0),
            dominant_wind_direction: wind_mean.mean(&wind_directions).unwrap_or(0.0),
            hourly_data: hours,
        })
    }

    /// Mean of a per-hour quantity over the day, 0 for a day without hours.
    pub fn hourly_mean(&self, f: impl Fn(&HourRecord) -> f64) -> f64 {
        let values: Vec<f64> = self.hourly_data.iter().map(f).collect();
        mean(&values).unwrap_or(0.0)
    }
}

/// Groups hourly records into calendar days.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayAggregator {
    pub wind_mean: WindDirectionMean,
}

impl DayAggregator {
    pub fn new(wind_mean: WindDirectionMean) -> Self {
        Self { wind_mean }
    }

    /// Aggregate by the machine's local calendar day.
    pub fn aggregate(&self, records: &[HourRecord]) -> Vec<DayForecast> {
        self.aggregate_in(records, &Local)
    }

    /// Aggregate by calendar day in `tz`.
    ///
    /// Every record lands in exactly one day. Days come back ascending by
    /// date, each with its hours ascending by `forecast_time`.
    pub fn aggregate_in<Tz: TimeZone>(&self, records: &[HourRecord], tz: &Tz) -> Vec<DayForecast> {
        let mut partitions: BTreeMap<NaiveDate, Vec<HourRecord>> = BTreeMap::new();
        for record in records {
            partitions
                .entry(calendar_day(&record.forecast_time, tz))
                .or_default()
                .push(record.clone());
        }

        let days: Vec<DayForecast> = partitions
            .into_iter()
            .filter_map(|(date, hours)| {
                let day = DayForecast::from_hours(date, hours, self.wind_mean);
                if day.is_none() {
                    log::warn!("[WFD] aggregator: no temperature samples for {}, skipping", date);
                }
                day
            })
            .collect();
        log::info!(
            "[WFD] aggregator: {} records folded into {} days",
            records.len(),
            days.len()
        );
        days
    }
}
