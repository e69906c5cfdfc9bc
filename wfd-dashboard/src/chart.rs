//! Chart-ready rows and per-metric chart descriptors.

use chrono::{Local, TimeZone};
use serde::Serialize;
use wfd_core::hour_record::HourRecord;
use wfd_core::metric::Metric;
use wfd_data::day_forecast::DayForecast;
use wfd_utils::dates::hour_label;
use wfd_utils::numbers::{round_half_up, round_to};

/// One hour of the selected day, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyChartPoint {
    /// Local hour label, e.g. "6 AM".
    pub time: String,
    pub temperature: i64,
    #[serde(rename = "temperature80m")]
    pub temperature_80m: i64,
    pub precipitation: f64,
    pub rain: f64,
    pub showers: f64,
    pub precip_prob: i64,
    pub wind_speed: f64,
    pub wind_direction: i64,
    /// Shallow soil moisture in percent, shown under the humidity label.
    pub humidity: f64,
    pub soil_moisture: f64,
    #[serde(rename = "soilMoisture1to3")]
    pub soil_moisture_1_to_3: f64,
    #[serde(rename = "soilMoisture3to9")]
    pub soil_moisture_3_to_9: f64,
    #[serde(rename = "soilMoisture9to27")]
    pub soil_moisture_9_to_27: f64,
    pub evapotranspiration: f64,
    pub index: usize,
    pub is_selected: bool,
}

fn percent(fraction: f64) -> f64 {
    round_to(fraction * 100.0, 1)
}

impl HourlyChartPoint {
    pub fn from_record<Tz: TimeZone>(
        record: &HourRecord,
        index: usize,
        selected_hour: Option<usize>,
        tz: &Tz,
    ) -> HourlyChartPoint
    where
        Tz::Offset: std::fmt::Display,
    {
        HourlyChartPoint {
            time: hour_label(&record.forecast_time, tz),
            temperature: round_half_up(record.temperature_two_m) as i64,
            temperature_80m: round_half_up(record.temperature_eighty_m) as i64,
            precipitation: round_to(record.precipitation, 2),
            rain: round_to(record.rain, 2),
            showers: round_to(record.showers, 2),
            precip_prob: round_half_up(record.precipitation_probability) as i64,
            wind_speed: round_to(record.wind_speed_ten_m, 1),
            wind_direction: round_half_up(record.wind_direction_ten_m) as i64,
            humidity: percent(record.soil_moisture_zero_to_one_cm),
            soil_moisture: percent(record.soil_moisture_zero_to_one_cm),
            soil_moisture_1_to_3: percent(record.soil_moisture_one_to_three_cm),
            soil_moisture_3_to_9: percent(record.soil_moisture_three_to_nine_cm),
            soil_moisture_9_to_27: percent(record.soil_moisture_nine_to_twentyseven_cm),
            evapotranspiration: round_to(record.evapotranspiration, 3),
            index,
            is_selected: selected_hour == Some(index),
        }
    }

    /// The value plotted for `metric`.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature as f64,
            Metric::Precipitation => self.precip_prob as f64,
            Metric::Wind => self.wind_speed,
            Metric::Humidity => self.humidity,
            Metric::SoilMoisture => self.soil_moisture,
            Metric::Evapotranspiration => self.evapotranspiration,
        }
    }
}

/// Rows for the hourly chart, labelled in the machine's local zone.
pub fn hourly_points(day: &DayForecast, selected_hour: Option<usize>) -> Vec<HourlyChartPoint> {
    hourly_points_in(day, selected_hour, &Local)
}

pub fn hourly_points_in<Tz: TimeZone>(
    day: &DayForecast,
    selected_hour: Option<usize>,
    tz: &Tz,
) -> Vec<HourlyChartPoint>
where
    Tz::Offset: std::fmt::Display,
{
    day.hourly_data
        .iter()
        .enumerate()
        .map(|(i, record)| HourlyChartPoint::from_record(record, i, selected_hour, tz))
        .collect()
}

/// Y axis range of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AxisDomain {
    /// Data range widened by `padding` on both ends.
    Padded { padding: f64 },
    Fixed { min: f64, max: f64 },
    Auto,
}

impl AxisDomain {
    /// Concrete bounds for a set of plotted values.
    pub fn resolve(&self, values: &[f64]) -> Option<(f64, f64)> {
        match *self {
            AxisDomain::Fixed { min, max } => Some((min, max)),
            AxisDomain::Padded { padding } => {
                let (lo, hi) = bounds(values)?;
                Some((lo - padding, hi + padding))
            }
            AxisDomain::Auto => bounds(values),
        }
    }
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((lo, hi))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Area,
    Bar,
    Line,
}

/// How one metric is drawn on the hourly chart and the weekly trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub metric: Metric,
    pub kind: ChartKind,
    /// Field of [`HourlyChartPoint`] that is plotted.
    pub data_key: &'static str,
    pub unit: &'static str,
    pub color: &'static str,
    pub domain: AxisDomain,
    pub tooltip_label: &'static str,
    /// Fraction digits shown in the tooltip.
    pub decimals: usize,
    pub trend_title: &'static str,
    pub trend_label: &'static str,
}

impl ChartSpec {
    pub fn for_metric(metric: Metric) -> ChartSpec {
        let percent = AxisDomain::Fixed { min: 0.0, max: 100.0 };
        let (kind, data_key, unit, color, domain, tooltip_label, decimals, trend_label) =
            match metric {
                Metric::Temperature => (
                    ChartKind::Area,
                    "temperature",
                    "°F",
                    "#57a773",
                    AxisDomain::Padded { padding: 5.0 },
                    "Temperature",
                    0,
                    "High Temp",
                ),
                Metric::Precipitation => (
                    ChartKind::Bar,
                    "precipProb",
                    "%",
                    "#9bd1e5",
                    percent,
                    "Precipitation Chance",
                    0,
                    "Precipitation",
                ),
                Metric::Wind => (
                    ChartKind::Line,
                    "windSpeed",
                    "mph",
                    "#157145",
                    AxisDomain::Auto,
                    "Wind Speed",
                    1,
                    "Wind Speed",
                ),
                Metric::Humidity => (
                    ChartKind::Area,
                    "humidity",
                    "%",
                    "#9bd1e5",
                    percent,
                    "Humidity",
                    1,
                    "Humidity",
                ),
                Metric::SoilMoisture => (
                    ChartKind::Area,
                    "soilMoisture",
                    "%",
                    "#57a773",
                    percent,
                    "Soil Moisture",
                    1,
                    "Soil Moisture",
                ),
                Metric::Evapotranspiration => (
                    ChartKind::Area,
                    "evapotranspiration",
                    "inch",
                    "#157145",
                    AxisDomain::Auto,
                    "Evapotranspiration",
                    3,
                    "Evapotranspiration",
                ),
            };
        ChartSpec {
            metric,
            kind,
            data_key,
            unit,
            color,
            domain,
            tooltip_label,
            decimals,
            trend_title: trend_title(metric),
            trend_label,
        }
    }

    /// Tooltip text for one plotted value, e.g. "12.5 mph".
    pub fn format_value(&self, value: f64) -> String {
        let separator = if self.unit == "°F" || self.unit == "%" { "" } else { " " };
        format!("{:.*}{}{}", self.decimals, value, separator, self.unit)
    }
}

fn trend_title(metric: Metric) -> &'static str {
    match metric {
        Metric::Temperature => "7-Day Temperature Trend",
        Metric::Precipitation => "7-Day Precipitation Trend",
        Metric::Wind => "7-Day Wind Trend",
        Metric::Humidity => "7-Day Humidity Trend",
        Metric::SoilMoisture => "7-Day Soil Moisture Trend",
        Metric::Evapotranspiration => "7-Day Evapotranspiration Trend",
    }
}
