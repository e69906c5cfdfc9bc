//! Selection state of the dashboard.
//!
//! `DashboardState` owns the derived day list and what the user has picked
//! from it. Day summaries are rebuilt from scratch on every refresh; the
//! selection is carried across refreshes by date, never by position.

use crate::chart::{hourly_points_in, HourlyChartPoint};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use wfd_core::hour_record::HourRecord;
use wfd_core::metric::Metric;
use wfd_data::day_forecast::{DayAggregator, DayForecast};
use wfd_data::week_series::{project, WeekPoint};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    /// Day summaries, ascending by date
    pub days: Vec<DayForecast>,
    pub selected_day: Option<NaiveDate>,
    pub selected_metric: Metric,
    /// Index into the selected day's hours
    pub selected_hour: Option<usize>,
    pub last_update: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub aggregator: DayAggregator,
}

impl DashboardState {
    pub fn new(aggregator: DayAggregator) -> Self {
        Self {
            aggregator,
            ..Default::default()
        }
    }

    /// Rebuild the days from `records`, grouping by local calendar day.
    pub fn refresh(&mut self, records: &[HourRecord], now: DateTime<Utc>) -> bool {
        self.refresh_in(records, now, &Local)
    }

    /// Rebuild the days from `records`, grouping by calendar day in `tz`.
    ///
    /// Returns false and leaves the state untouched when `records` is empty.
    pub fn refresh_in<Tz: TimeZone>(
        &mut self,
        records: &[HourRecord],
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> bool {
        if records.is_empty() {
            return false;
        }
        self.days = self.aggregator.aggregate_in(records, tz);
        self.last_update = Some(now);

        let still_present = self
            .selected_day
            .map(|date| self.day(date).is_some())
            .unwrap_or(false);
        if !still_present {
            if self.selected_day.is_some() {
                log::info!("[WFD] dashboard: selected day no longer present, resetting");
            }
            self.selected_day = self.days.first().map(|d| d.date);
            self.selected_hour = None;
        }
        if let (Some(hour), Some(day)) = (self.selected_hour, self.selected()) {
            if hour >= day.hourly_data.len() {
                self.selected_hour = None;
            }
        }
        true
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayForecast> {
        self.days.iter().find(|d| d.date == date)
    }

    /// The selected day's summary, if any.
    pub fn selected(&self) -> Option<&DayForecast> {
        self.selected_day.and_then(|date| self.day(date))
    }

    /// Select a day by date. Unknown dates are ignored.
    ///
    /// The hour selection indexes into a day's hours, so it is cleared when
    /// the day changes.
    pub fn select_day(&mut self, date: NaiveDate) -> bool {
        if self.day(date).is_none() {
            log::warn!("[WFD] dashboard: no forecast for {}", date);
            return false;
        }
        if self.selected_day != Some(date) {
            self.selected_day = Some(date);
            self.selected_hour = None;
        }
        true
    }

    pub fn select_metric(&mut self, metric: Metric) {
        self.selected_metric = metric;
    }

    /// Select an hour of the selected day; selecting it again clears it.
    pub fn toggle_hour(&mut self, index: usize) {
        self.selected_hour = if self.selected_hour == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    /// Weekly trend for the selected metric.
    pub fn week_series(&self) -> Vec<WeekPoint> {
        project(&self.days, self.selected_metric)
    }

    /// Hourly chart rows of the selected day, labelled in `tz`.
    pub fn hourly_chart_in<Tz: TimeZone>(&self, tz: &Tz) -> Vec<HourlyChartPoint>
    where
        Tz::Offset: std::fmt::Display,
    {
        self.selected()
            .map(|day| hourly_points_in(day, self.selected_hour, tz))
            .unwrap_or_default()
    }

    pub fn hourly_chart(&self) -> Vec<HourlyChartPoint> {
        self.hourly_chart_in(&Local)
    }
}
