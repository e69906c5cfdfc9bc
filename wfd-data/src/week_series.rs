use crate::day_forecast::DayForecast;
use chrono::NaiveDate;
use serde::Serialize;
use wfd_core::metric::Metric;
use wfd_utils::numbers::{round_half_up, round_to};

/// The rounded value(s) a week point carries for the active metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "metric", rename_all = "snake_case")]
pub enum WeekValue {
    /// Daily low and high, °F.
    Temperature { min: i64, max: i64 },
    /// Mean precipitation probability, percent.
    Precipitation { probability: i64 },
    /// Mean wind speed, mph.
    Wind { speed: i64 },
    /// Shallow soil moisture as percent; same quantity as `SoilMoisture`.
    Humidity { percent: i64 },
    SoilMoisture { percent: i64 },
    /// Mean hourly evapotranspiration, inches, 3 decimals.
    Evapotranspiration { inches: f64 },
}

/// One day on the weekly trend line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekPoint {
    pub date: NaiveDate,
    pub day: String,
    #[serde(flatten)]
    pub value: WeekValue,
}

impl WeekPoint {
    /// The value to plot; for temperature that is the daily high.
    pub fn primary(&self) -> f64 {
        match self.value {
            WeekValue::Temperature { max, .. } => max as f64,
            WeekValue::Precipitation { probability } => probability as f64,
            WeekValue::Wind { speed } => speed as f64,
            WeekValue::Humidity { percent } | WeekValue::SoilMoisture { percent } => percent as f64,
            WeekValue::Evapotranspiration { inches } => inches,
        }
    }
}

fn shallow_moisture_percent(day: &DayForecast) -> i64 {
    round_half_up(day.hourly_mean(|h| h.soil_moisture_zero_to_one_cm * 100.0)) as i64
}

/// Project each day onto the selected metric, in day order.
pub fn project(days: &[DayForecast], metric: Metric) -> Vec<WeekPoint> {
    days.iter()
        .map(|day| {
            let value = match metric {
                Metric::Temperature => WeekValue::Temperature {
                    min: round_half_up(day.min_temp) as i64,
                    max: round_half_up(day.max_temp) as i64,
                },
                Metric::Precipitation => WeekValue::Precipitation {
                    probability: round_half_up(day.avg_precipitation_prob) as i64,
                },
                Metric::Wind => WeekValue::Wind {
                    speed: round_half_up(day.avg_wind_speed) as i64,
                },
                Metric::Humidity => WeekValue::Humidity {
                    percent: shallow_moisture_percent(day),
                },
                Metric::SoilMoisture => WeekValue::SoilMoisture {
                    percent: shallow_moisture_percent(day),
                },
                Metric::Evapotranspiration => WeekValue::Evapotranspiration {
                    inches: round_to(day.hourly_mean(|h| h.evapotranspiration), 3),
                },
            };
            WeekPoint {
                date: day.date,
                day: day.day_name.clone(),
                value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day_forecast::DayAggregator;
    use chrono::{Duration, TimeZone, Utc};
    use wfd_core::hour_record::build_records;
    use wfd_core::observation::{DeliveryBatch, RawObservation};

    /// Three hours on 2024-01-01 (UTC) with the given wind speeds.
    fn days_with_wind(speeds: &[f64]) -> Vec<DayForecast> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap();
        let mut observations = Vec::new();
        for (i, speed) in speeds.iter().enumerate() {
            let time = (start + Duration::hours(i as i64)).to_rfc3339();
            observations.push(RawObservation::new("wind_speed_10m", *speed).with_time(&time));
            observations.push(
                RawObservation::new("soil_moisture_0_1cm", 0.3 + i as f64 * 0.01).with_time(&time),
            );
            observations.push(
                RawObservation::new("evapotranspiration", 0.0123 * (i + 1) as f64).with_time(&time),
            );
            observations.push(
                RawObservation::new("temperature_2m", 40.4 + i as f64 * 10.0).with_time(&time),
            );
            observations.push(
                RawObservation::new("precipitation_probability", 15.0 * i as f64).with_time(&time),
            );
        }
        let records = build_records(&[DeliveryBatch::new(observations)], &start);
        DayAggregator::default().aggregate_in(&records, &Utc)
    }

    #[test]
    fn test_wind() {
        let days = days_with_wind(&[5.0, 10.0, 15.0]);
        let week = project(&days, Metric::Wind);
        assert_eq!(week.len(), 1);
        assert_eq!(week[0].value, WeekValue::Wind { speed: 10 });
        assert_eq!(week[0].day, "Mon");
        assert_eq!(week[0].primary(), 10.0);
    }

    #[test]
    fn test_temperature_rounds() {
        let days = days_with_wind(&[5.0, 10.0, 15.0]);
        let week = project(&days, Metric::Temperature);
        assert_eq!(week[0].value, WeekValue::Temperature { min: 40, max: 60 });
    }

    #[test]
    fn test_precipitation() {
        let days = days_with_wind(&[5.0, 10.0, 15.0]);
        let week = project(&days, Metric::Precipitation);
        assert_eq!(week[0].value, WeekValue::Precipitation { probability: 15 });
    }

    #[test]
    fn test_humidity_aliases_soil_moisture() {
        let days = days_with_wind(&[5.0, 10.0, 15.0]);
        let humidity = project(&days, Metric::Humidity);
        let soil = project(&days, Metric::SoilMoisture);
        assert_eq!(humidity[0].value, WeekValue::Humidity { percent: 31 });
        assert_eq!(soil[0].value, WeekValue::SoilMoisture { percent: 31 });
        assert_eq!(humidity[0].primary(), soil[0].primary());
    }

    #[test]
    fn test_evapotranspiration_three_places() {
        let days = days_with_wind(&[5.0, 10.0, 15.0]);
        let week = project(&days, Metric::Evapotranspiration);
        // mean of 0.0123, 0.0246, 0.0369
        assert_eq!(week[0].value, WeekValue::Evapotranspiration { inches: 0.025 });
    }

    #[test]
    fn test_one_point_per_day_in_order() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let observations: Vec<RawObservation> = (0..7)
            .map(|d| {
                let time = (start + Duration::days(d)).to_rfc3339();
                RawObservation::new("temperature_2m", 60.0 + d as f64).with_time(&time)
            })
            .collect();
        let records = build_records(&[DeliveryBatch::new(observations)], &start);
        let days = DayAggregator::default().aggregate_in(&records, &Utc);
        let week = project(&days, Metric::Temperature);
        assert_eq!(week.len(), 7);
        assert!(week.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(week[6].value, WeekValue::Temperature { min: 66, max: 66 });
    }

    #[test]
    fn test_serialized_shape() {
        let days = days_with_wind(&[5.0, 10.0, 15.0]);
        let week = project(&days, Metric::Wind);
        let json = serde_json::to_value(&week[0]).unwrap();
        assert_eq!(json["metric"], "wind");
        assert_eq!(json["speed"], 10);
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["day"], "Mon");
    }
}
