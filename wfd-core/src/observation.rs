use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One delivery from the host runtime: `{ "result": [ ...observations ] }`.
///
/// A delivery without `result` deserializes to an empty batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryBatch {
    #[serde(default)]
    pub result: Vec<RawObservation>,
}

impl DeliveryBatch {
    pub fn new(result: Vec<RawObservation>) -> Self {
        Self { result }
    }

    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }
}

/// A single timestamped scalar observation as delivered by the host runtime
/// or generated from the mock fixture.
///
/// Field parsing is lenient: a value sent as a numeric string is accepted,
/// anything else that is not a number leaves `value` empty, and non-object
/// metadata is dropped. Malformed observations never fail a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    #[serde(default, deserialize_with = "lenient_variable")]
    pub variable: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub group: Option<String>,
    #[serde(default, deserialize_with = "lenient_metadata")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl RawObservation {
    /// Observation with only a variable name and a value.
    pub fn new(variable: &str, value: f64) -> Self {
        Self {
            variable: variable.to_string(),
            value: Some(value),
            ..Default::default()
        }
    }

    pub fn with_time(mut self, time: &str) -> Self {
        self.time = Some(time.to_string());
        self
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Key identifying the physical hour this observation belongs to.
    ///
    /// First non-empty of: `group`, `metadata.forecast_time`, `time`, and
    /// finally `now` in RFC 3339 with millisecond precision.
    pub fn group_key(&self, now: &DateTime<Utc>) -> String {
        non_empty(self.group.as_deref())
            .map(str::to_string)
            .or_else(|| self.metadata_forecast_time())
            .or_else(|| non_empty(self.time.as_deref()).map(str::to_string))
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    fn metadata_forecast_time(&self) -> Option<String> {
        match self.metadata.as_ref()?.get("forecast_time")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            _ => None,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn lenient_variable<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

fn lenient_metadata<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Map<String, Value>>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::{DeliveryBatch, RawObservation};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    const DELIVERY: &str = r#"[
        {"result": [
            {"variable": "temperature_2m", "value": 70, "time": "2024-01-01T12:00:00.000Z", "group": "2024-01-01_06"},
            {"variable": "precipitation", "value": "0.2", "group": "2024-01-01_06"},
            {"variable": "rain", "value": null, "metadata": {"forecast_time": "06:00"}},
            {"variable": "showers", "value": true, "metadata": "not-a-map"}
        ]},
        {}
    ]"#;

    #[test]
    fn test_parse_delivery() {
        let batches: Vec<DeliveryBatch> = serde_json::from_str(DELIVERY).unwrap();
        assert_eq!(batches.len(), 2);
        assert!(batches[1].is_empty());

        let result = &batches[0].result;
        assert_eq!(result.len(), 4);
        assert_eq!(result[0].value, Some(70.0));
        assert_eq!(result[1].value, Some(0.2));
        assert_eq!(result[2].value, None);
        assert_eq!(result[3].value, None);
        assert!(result[3].metadata.is_none());
    }

    #[test]
    fn test_group_key_precedence() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let meta = json!({"forecast_time": "06:00"}).as_object().unwrap().clone();

        let grouped = RawObservation::new("rain", 1.0)
            .with_group("2024-01-01_06")
            .with_time("2024-01-01T06:00:00Z")
            .with_metadata(meta.clone());
        assert_eq!(grouped.group_key(&now), "2024-01-01_06");

        let by_meta = RawObservation::new("rain", 1.0)
            .with_time("2024-01-01T06:00:00Z")
            .with_metadata(meta);
        assert_eq!(by_meta.group_key(&now), "06:00");

        let by_time = RawObservation::new("rain", 1.0).with_time("2024-01-01T06:00:00Z");
        assert_eq!(by_time.group_key(&now), "2024-01-01T06:00:00Z");

        let bare = RawObservation::new("rain", 1.0).with_group("");
        assert_eq!(bare.group_key(&now), "2024-01-01T00:00:00.000Z");
    }
}
