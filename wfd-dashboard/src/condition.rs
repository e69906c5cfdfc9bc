//! Weather condition and icon classification.

use serde::Serialize;
use std::fmt;

/// Animated icon set names.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeatherIcon {
    Rain,
    Sleet,
    Cloudy,
    ClearDay,
    PartlyCloudyDay,
    Snow,
}

/// Human readable condition shown next to the icon.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum Condition {
    HeavyRain,
    LightRain,
    Cloudy,
    Sunny,
    PartlyCloudy,
    Cold,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Condition::HeavyRain => write!(f, "Heavy Rain"),
            Condition::LightRain => write!(f, "Light Rain"),
            Condition::Cloudy => write!(f, "Cloudy"),
            Condition::Sunny => write!(f, "Sunny"),
            Condition::PartlyCloudy => write!(f, "Partly Cloudy"),
            Condition::Cold => write!(f, "Cold"),
        }
    }
}

/// Condition for an hour or a day.
///
/// Precipitation in inches and probability in percent are checked before
/// temperature in °F.
pub fn classify(temp: f64, precipitation: f64, precip_prob: f64) -> (Condition, WeatherIcon) {
    if precipitation > 0.5 {
        (Condition::HeavyRain, WeatherIcon::Rain)
    } else if precipitation > 0.1 {
        (Condition::LightRain, WeatherIcon::Sleet)
    } else if precip_prob > 70.0 {
        (Condition::Cloudy, WeatherIcon::Cloudy)
    } else if temp > 85.0 {
        (Condition::Sunny, WeatherIcon::ClearDay)
    } else if temp > 70.0 {
        (Condition::PartlyCloudy, WeatherIcon::PartlyCloudyDay)
    } else if temp > 50.0 {
        (Condition::Cloudy, WeatherIcon::Cloudy)
    } else if temp < 32.0 {
        (Condition::Cold, WeatherIcon::Snow)
    } else {
        (Condition::Cold, WeatherIcon::Cloudy)
    }
}
