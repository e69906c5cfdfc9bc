//! Mock forecast fixture, used when no live host is attached.
//!
//! The fixture is an Open-Meteo style hourly response. It is turned into a
//! single delivery batch carrying the same observation shape a live host
//! sends, so fixture mode exercises the full ingestion path.

use crate::host::HostHandle;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use wfd_core::hour_record::Variable;
use wfd_core::observation::{DeliveryBatch, RawObservation};
use wfd_utils::dates::{hours_between, parse_naive_timestamp};

/// Seven days of hourly data bundled with the workspace.
pub const BUNDLED_FIXTURE: &str = include_str!("../../fixtures/mock-data.json");

/// Fixture columns, in delivery order, and the variable each one feeds.
const COLUMNS: [(&str, Variable); 13] = [
    ("temperature_2m", Variable::Temperature2m),
    ("temperature_80m", Variable::Temperature80m),
    ("precipitation", Variable::Precipitation),
    ("rain", Variable::Rain),
    ("showers", Variable::Showers),
    ("precipitation_probability", Variable::PrecipitationProbability),
    ("evapotranspiration", Variable::Evapotranspiration),
    ("wind_speed_10m", Variable::WindSpeed10m),
    ("wind_direction_10m", Variable::WindDirection10m),
    ("soil_moisture_0_to_1cm", Variable::SoilMoisture0To1cm),
    ("soil_moisture_1_to_3cm", Variable::SoilMoisture1To3cm),
    ("soil_moisture_3_to_9cm", Variable::SoilMoisture3To9cm),
    ("soil_moisture_9_to_27cm", Variable::SoilMoisture9To27cm),
];

#[derive(Debug, Clone, Deserialize)]
pub struct MockForecast {
    /// Offset of the naive `hourly.time` values; local time when absent.
    #[serde(default)]
    pub utc_offset_seconds: Option<i32>,
    #[serde(default)]
    pub hourly_units: HashMap<String, String>,
    pub hourly: HourlyColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HourlyColumns {
    pub time: Vec<String>,
    #[serde(flatten)]
    pub columns: HashMap<String, Vec<Option<f64>>>,
}

impl MockForecast {
    pub fn parse(json: &str) -> Result<MockForecast> {
        serde_json::from_str(json).context("Failed to parse mock forecast")
    }

    pub fn bundled() -> Result<MockForecast> {
        Self::parse(BUNDLED_FIXTURE)
    }

    pub fn from_path(path: &Path) -> Result<MockForecast> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        Self::parse(&json)
    }

    fn instant(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self.utc_offset_seconds {
            Some(seconds) => FixedOffset::east_opt(seconds)?
                .from_local_datetime(naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
            None => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    fn value(&self, column: &str, hour: usize) -> Option<f64> {
        self.hourly
            .columns
            .get(column)
            .and_then(|values| values.get(hour).copied().flatten())
    }

    /// One delivery holding 13 observations per fixture hour.
    ///
    /// Hours with an unreadable time are skipped.
    pub fn to_delivery(&self, now: &DateTime<Utc>) -> DeliveryBatch {
        let mut result = Vec::with_capacity(self.hourly.time.len() * COLUMNS.len());
        for (i, raw_time) in self.hourly.time.iter().enumerate() {
            let Some(naive) = parse_naive_timestamp(raw_time) else {
                log::warn!("[WFD] fixture: skipping hour {} with time {:?}", i, raw_time);
                continue;
            };
            let Some(instant) = self.instant(&naive) else {
                log::warn!("[WFD] fixture: {} does not exist in the fixture timezone", raw_time);
                continue;
            };
            let date = naive.format("%Y-%m-%d").to_string();
            let hour = naive.format("%H").to_string();
            let group = format!("{date}_{hour}");
            let time = instant.to_rfc3339_opts(SecondsFormat::Millis, true);
            let metadata = match json!({
                "hours_from_now": hours_between(now, &instant),
                "forecast_hour": i,
                "forecast_date": date,
                "forecast_time": format!("{hour}:00"),
            }) {
                Value::Object(map) => map,
                _ => Map::new(),
            };

            for (column, variable) in COLUMNS {
                result.push(RawObservation {
                    variable: variable.name().to_string(),
                    value: self.value(column, i),
                    time: Some(time.clone()),
                    group: Some(group.clone()),
                    metadata: Some(metadata.clone()),
                    unit: self.hourly_units.get(column).cloned(),
                });
            }
        }
        log::info!(
            "[WFD] fixture: {} observations for {} hours",
            result.len(),
            self.hourly.time.len()
        );
        DeliveryBatch::new(result)
    }
}

/// Wait `delay`, then deliver the fixture as one realtime event.
pub async fn replay(host: &HostHandle, fixture: &MockForecast, delay: Duration) -> Result<()> {
    log::info!("[WFD] fixture: delivering mock data in {:?}", delay);
    tokio::time::sleep(delay).await;
    let delivery = fixture.to_delivery(&Utc::now());
    host.realtime(vec![delivery]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::channel;
    use wfd_core::hour_record::build_records;

    const SMALL: &str = r#"{
        "utc_offset_seconds": -18000,
        "hourly_units": { "temperature_2m": "°F", "soil_moisture_0_to_1cm": "m³/m³" },
        "hourly": {
            "time": ["2024-01-01T06:00", "2024-01-01T07:00", "not a time"],
            "temperature_2m": [40.5, null, 41.0],
            "soil_moisture_0_to_1cm": [0.31]
        }
    }"#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_observation_shape() {
        let fixture = MockForecast::parse(SMALL).unwrap();
        let delivery = fixture.to_delivery(&now());
        assert_eq!(delivery.result.len(), 2 * 13);

        let first = &delivery.result[0];
        assert_eq!(first.variable, "temperature_2m");
        assert_eq!(first.value, Some(40.5));
        assert_eq!(first.group.as_deref(), Some("2024-01-01_06"));
        assert_eq!(first.time.as_deref(), Some("2024-01-01T11:00:00.000Z"));
        assert_eq!(first.unit.as_deref(), Some("°F"));
        let metadata = first.metadata.as_ref().unwrap();
        assert_eq!(metadata["hours_from_now"], 2);
        assert_eq!(metadata["forecast_hour"], 0);
        assert_eq!(metadata["forecast_date"], "2024-01-01");
        assert_eq!(metadata["forecast_time"], "06:00");

        let soil = &delivery.result[9];
        assert_eq!(soil.variable, "soil_moisture_0_1cm");
        assert_eq!(soil.value, Some(0.31));
    }

    #[test]
    fn test_missing_values_stay_empty() {
        let fixture = MockForecast::parse(SMALL).unwrap();
        let delivery = fixture.to_delivery(&now());
        let second_hour = &delivery.result[13..];
        // null in the column
        assert_eq!(second_hour[0].value, None);
        // column shorter than `time`
        assert_eq!(second_hour[9].value, None);
        // column absent
        assert_eq!(second_hour[2].value, None);
        assert_eq!(second_hour[2].unit, None);
    }

    #[test]
    fn test_bundled_fixture_builds_a_week() {
        let fixture = MockForecast::bundled().unwrap();
        assert_eq!(fixture.hourly.time.len(), 7 * 24);
        let delivery = fixture.to_delivery(&now());
        assert_eq!(delivery.result.len(), 7 * 24 * 13);

        let records = build_records(&[delivery], &now());
        assert_eq!(records.len(), 7 * 24);
        assert!(records.iter().all(|r| r.forecast_date.is_some()));
    }

    #[tokio::test]
    async fn test_replay_delivers_once() {
        let (host, runtime) = channel();
        let task = tokio::spawn(runtime.run());
        let fixture = MockForecast::parse(SMALL).unwrap();
        replay(&host, &fixture, Duration::from_millis(1)).await.unwrap();
        drop(host);

        let context = task.await.unwrap();
        assert_eq!(context.realtime_event_count, 1);
        assert_eq!(context.weather_data.len(), 2);
        assert!(!context.is_loading);
    }
}
