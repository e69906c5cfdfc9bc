use crate::normalizer::{normalize_batch, Accumulator};
use crate::observation::DeliveryBatch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wfd_utils::dates::{hours_between, parse_timestamp};

/// The variables a weather hour is built from, in the order the host
/// delivers them.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Variable {
    Temperature2m,
    Temperature80m,
    Precipitation,
    Rain,
    Showers,
    PrecipitationProbability,
    Evapotranspiration,
    WindSpeed10m,
    WindDirection10m,
    SoilMoisture0To1cm,
    SoilMoisture1To3cm,
    SoilMoisture3To9cm,
    SoilMoisture9To27cm,
}

impl Variable {
    pub const ALL: [Variable; 13] = [
        Variable::Temperature2m,
        Variable::Temperature80m,
        Variable::Precipitation,
        Variable::Rain,
        Variable::Showers,
        Variable::PrecipitationProbability,
        Variable::Evapotranspiration,
        Variable::WindSpeed10m,
        Variable::WindDirection10m,
        Variable::SoilMoisture0To1cm,
        Variable::SoilMoisture1To3cm,
        Variable::SoilMoisture3To9cm,
        Variable::SoilMoisture9To27cm,
    ];

    /// Source variable name as delivered by the host.
    pub fn name(self) -> &'static str {
        match self {
            Variable::Temperature2m => "temperature_2m",
            Variable::Temperature80m => "temperature_80m",
            Variable::Precipitation => "precipitation",
            Variable::Rain => "rain",
            Variable::Showers => "showers",
            Variable::PrecipitationProbability => "precipitation_probability",
            Variable::Evapotranspiration => "evapotranspiration",
            Variable::WindSpeed10m => "wind_speed_10m",
            Variable::WindDirection10m => "wind_direction_10m",
            Variable::SoilMoisture0To1cm => "soil_moisture_0_1cm",
            Variable::SoilMoisture1To3cm => "soil_moisture_1_3cm",
            Variable::SoilMoisture3To9cm => "soil_moisture_3_9cm",
            Variable::SoilMoisture9To27cm => "soil_moisture_9_27cm",
        }
    }

    pub fn from_name(name: &str) -> Option<Variable> {
        Variable::ALL.into_iter().find(|v| v.name() == name)
    }

    /// Value used when the variable is absent from an hour.
    /// Temperatures fall back to each other before these.
    pub fn default_value(self) -> f64 {
        match self {
            Variable::Temperature2m => 75.0,
            Variable::Temperature80m => 77.0,
            Variable::Precipitation
            | Variable::Rain
            | Variable::Showers
            | Variable::PrecipitationProbability
            | Variable::Evapotranspiration => 0.0,
            Variable::WindSpeed10m => 5.0,
            Variable::WindDirection10m => 180.0,
            Variable::SoilMoisture0To1cm => 0.20,
            Variable::SoilMoisture1To3cm => 0.22,
            Variable::SoilMoisture3To9cm => 0.24,
            Variable::SoilMoisture9To27cm => 0.26,
        }
    }
}

/// One hour of forecast weather with every field populated.
///
/// Units follow the feed: °F, inches, percent, mph, degrees and m³/m³.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourRecord {
    /// Synthetic id, `weather_<group key>_<build millis>`. Not stable across rebuilds.
    pub id: String,
    pub forecast_time: DateTime<Utc>,
    pub forecast_date: Option<String>,
    pub hours_from_now: i64,
    pub temperature_two_m: f64,
    pub temperature_eighty_m: f64,
    pub precipitation: f64,
    pub rain: f64,
    pub showers: f64,
    pub precipitation_probability: f64,
    pub evapotranspiration: f64,
    pub wind_speed_ten_m: f64,
    pub wind_direction_ten_m: f64,
    pub soil_moisture_zero_to_one_cm: f64,
    pub soil_moisture_one_to_three_cm: f64,
    pub soil_moisture_three_to_nine_cm: f64,
    pub soil_moisture_nine_to_twentyseven_cm: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HourRecord {
    /// Build a record from a merged accumulator. Total over any input:
    /// missing variables take their defaults and an unreadable time
    /// becomes the build instant.
    pub fn from_accumulator(acc: &Accumulator, now: &DateTime<Utc>) -> HourRecord {
        let value = |v: Variable| acc.value(v.name());
        let or_default = |v: Variable| value(v).unwrap_or(v.default_value());

        let forecast_time = match acc.time.as_deref().filter(|t| !t.is_empty()) {
            Some(time) => parse_timestamp(time).unwrap_or_else(|| {
                log::warn!("[WFD] builder: unreadable time {:?} for group {}", time, acc.key);
                *now
            }),
            None => *now,
        };

        let hours_from_now = acc
            .metadata_f64("hours_from_now")
            .map(|h| h as i64)
            .unwrap_or_else(|| hours_between(now, &forecast_time));

        let temperature_two_m = value(Variable::Temperature2m)
            .or(value(Variable::Temperature80m))
            .unwrap_or(Variable::Temperature2m.default_value());
        let temperature_eighty_m = value(Variable::Temperature80m)
            .or(value(Variable::Temperature2m))
            .unwrap_or(Variable::Temperature80m.default_value());

        HourRecord {
            id: format!("weather_{}_{}", acc.key, now.timestamp_millis()),
            forecast_time,
            forecast_date: acc.metadata_str("forecast_date").map(str::to_string),
            hours_from_now,
            temperature_two_m,
            temperature_eighty_m,
            precipitation: or_default(Variable::Precipitation),
            rain: or_default(Variable::Rain),
            showers: or_default(Variable::Showers),
            precipitation_probability: or_default(Variable::PrecipitationProbability),
            evapotranspiration: or_default(Variable::Evapotranspiration),
            wind_speed_ten_m: or_default(Variable::WindSpeed10m),
            wind_direction_ten_m: or_default(Variable::WindDirection10m),
            soil_moisture_zero_to_one_cm: or_default(Variable::SoilMoisture0To1cm),
            soil_moisture_one_to_three_cm: or_default(Variable::SoilMoisture1To3cm),
            soil_moisture_three_to_nine_cm: or_default(Variable::SoilMoisture3To9cm),
            soil_moisture_nine_to_twentyseven_cm: or_default(Variable::SoilMoisture9To27cm),
            created_at: forecast_time,
            updated_at: forecast_time,
        }
    }

    /// Field value for a variable.
    pub fn get(&self, variable: Variable) -> f64 {
        match variable {
            Variable::Temperature2m => self.temperature_two_m,
            Variable::Temperature80m => self.temperature_eighty_m,
            Variable::Precipitation => self.precipitation,
            Variable::Rain => self.rain,
            Variable::Showers => self.showers,
            Variable::PrecipitationProbability => self.precipitation_probability,
            Variable::Evapotranspiration => self.evapotranspiration,
            Variable::WindSpeed10m => self.wind_speed_ten_m,
            Variable::WindDirection10m => self.wind_direction_ten_m,
            Variable::SoilMoisture0To1cm => self.soil_moisture_zero_to_one_cm,
            Variable::SoilMoisture1To3cm => self.soil_moisture_one_to_three_cm,
            Variable::SoilMoisture3To9cm => self.soil_moisture_three_to_nine_cm,
            Variable::SoilMoisture9To27cm => self.soil_moisture_nine_to_twentyseven_cm,
        }
    }
}

/// Turn a set of deliveries into hour records, one per group key per batch.
///
/// Batches are normalized independently and their records concatenated in
/// delivery order.
pub fn build_records(deliveries: &[DeliveryBatch], now: &DateTime<Utc>) -> Vec<HourRecord> {
    let mut records = Vec::new();
    for batch in deliveries.iter().filter(|b| !b.is_empty()) {
        let table = normalize_batch(batch, now);
        records.extend(
            table
                .into_groups()
                .iter()
                .map(|acc| HourRecord::from_accumulator(acc, now)),
        );
    }
    log::info!("[WFD] builder: Created {} weather records", records.len());
    records
}
