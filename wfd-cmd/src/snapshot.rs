//! JSON view of the dashboard after a run.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use wfd_core::hour_record::HourRecord;
use wfd_core::metric::Metric;
use wfd_dashboard::cards::{day_cards, day_heading, DayCard};
use wfd_dashboard::chart::{ChartSpec, HourlyChartPoint};
use wfd_dashboard::DashboardState;
use wfd_data::day_forecast::DayForecast;
use wfd_data::week_series::WeekPoint;

/// A day summary without its hourly records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub day_name: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub total_precipitation: f64,
    pub avg_precipitation_prob: f64,
    pub avg_wind_speed: f64,
    pub dominant_wind_direction: f64,
    pub hours: usize,
}

impl From<&DayForecast> for DaySummary {
    fn from(day: &DayForecast) -> Self {
        DaySummary {
            date: day.date,
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

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub event_count: u64,
    pub is_loading: bool,
    pub metric: Metric,
    pub selected_day: Option<NaiveDate>,
    pub heading: Option<String>,
    pub chart: ChartSpec,
    pub records: Vec<HourRecord>,
    pub days: Vec<DaySummary>,
    pub cards: Vec<DayCard>,
    pub week: Vec<WeekPoint>,
    pub hourly: Vec<HourlyChartPoint>,
}

impl Snapshot {
    pub fn new(
        event_count: u64,
        is_loading: bool,
        records: Vec<HourRecord>,
        state: &DashboardState,
    ) -> Snapshot {
        let today = Local::now().date_naive();
        Snapshot {
            event_count,
            is_loading,
            metric: state.selected_metric,
            selected_day: state.selected_day,
            heading: state.selected().map(day_heading),
            chart: ChartSpec::for_metric(state.selected_metric),
            records,
            days: state.days.iter().map(DaySummary::from).collect(),
            cards: day_cards(&state.days, today, state.selected_day),
            week: state.week_series(),
            hourly: state.hourly_chart(),
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use wfd_core::hour_record::build_records;
    use wfd_widget::fixture::MockForecast;

    #[test]
    fn test_snapshot_shape() {
        let now = Utc.with_ymd_and_hms(2025, 7, 14, 12, 0, 0).unwrap();
        let fixture = MockForecast::bundled().unwrap();
        let records = build_records(&[fixture.to_delivery(&now)], &now);
        let mut state = DashboardState::default();
        state.refresh_in(&records, now, &Utc);

        let snapshot = Snapshot::new(1, false, records, &state);
        assert_eq!(snapshot.records.len(), 7 * 24);
        assert_eq!(snapshot.days.len(), state.days.len());
        assert_eq!(snapshot.week.len(), snapshot.days.len());
        assert_eq!(snapshot.cards.len(), snapshot.days.len());
        let hours: usize = snapshot.days.iter().map(|d| d.hours).sum();
        assert_eq!(hours, 7 * 24);

        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(json["event_count"], 1);
        assert!(json["days"][0].get("hourlyData").is_none());
        assert_eq!(json["metric"], "temperature");
        assert_eq!(json["chart"]["unit"], "°F");
    }
}
