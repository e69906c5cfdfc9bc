use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The metric family the dashboard is currently charting.
///
/// `Humidity` is an alias: it is read from the shallowest soil moisture
/// band, exactly like `SoilMoisture`, and only the label differs.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Temperature,
    Precipitation,
    Wind,
    Humidity,
    SoilMoisture,
    Evapotranspiration,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Temperature,
        Metric::Precipitation,
        Metric::Wind,
        Metric::Humidity,
        Metric::SoilMoisture,
        Metric::Evapotranspiration,
    ];

    /// Tag used on the wire and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Precipitation => "precipitation",
            Metric::Wind => "wind",
            Metric::Humidity => "humidity",
            Metric::SoilMoisture => "soil_moisture",
            Metric::Evapotranspiration => "evapotranspiration",
        }
    }

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Precipitation => "Precipitation",
            Metric::Wind => "Wind",
            Metric::Humidity => "Humidity",
            Metric::SoilMoisture => "Soil Moisture",
            Metric::Evapotranspiration => "Evapotranspiration",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq)]
pub struct MetricParseError(pub String);

impl fmt::Display for MetricParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown metric '{}', expected one of: temperature, precipitation, wind, humidity, soil_moisture, evapotranspiration",
            self.0
        )
    }
}

impl std::error::Error for MetricParseError {}

impl FromStr for Metric {
    type Err = MetricParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == tag)
            .ok_or_else(|| MetricParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::Metric;

    #[test]
    fn test_parse_metric() {
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>(), Ok(metric));
            assert_eq!(metric.to_string(), metric.as_str());
        }
        assert_eq!(" Wind ".parse::<Metric>(), Ok(Metric::Wind));
        assert!("pressure".parse::<Metric>().is_err());
    }

    #[test]
    fn test_metric_serde() {
        let json = serde_json::to_string(&Metric::SoilMoisture).unwrap();
        assert_eq!(json, "\"soil_moisture\"");
        let parsed: Metric = serde_json::from_str("\"evapotranspiration\"").unwrap();
        assert_eq!(parsed, Metric::Evapotranspiration);
        assert_eq!(Metric::default(), Metric::Temperature);
    }
}
