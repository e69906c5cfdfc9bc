//! Shared state of one widget instance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wfd_core::hour_record::{build_records, HourRecord};
use wfd_core::observation::DeliveryBatch;

pub const DEFAULT_HEADER_COLOR: &str = "#005194";
pub const DEFAULT_TITLE: &str = "UOR - Weather Forecast";

fn default_header_color() -> String {
    DEFAULT_HEADER_COLOR.to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

/// Configuration handed over by the host when the widget starts.
///
/// Keys the widget does not know about are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default = "default_header_color")]
    pub header_color: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            header_color: default_header_color(),
            title: default_title(),
            extra: Map::new(),
        }
    }
}

/// Something the host runtime tells the widget.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Start(WidgetConfig),
    Realtime(Vec<DeliveryBatch>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetContext {
    pub weather_data: Vec<HourRecord>,
    pub is_loading: bool,
    pub widget: Option<WidgetConfig>,
    pub realtime_event_count: u64,
}

impl Default for WidgetContext {
    fn default() -> Self {
        Self {
            weather_data: Vec::new(),
            is_loading: true,
            widget: None,
            realtime_event_count: 0,
        }
    }
}

impl WidgetContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one host event. Returns true if the context changed.
    pub fn apply(&mut self, event: HostEvent, now: &DateTime<Utc>) -> bool {
        match event {
            HostEvent::Start(config) => {
                log::info!("[WFD] widget: started with title {:?}", config.title);
                self.widget = Some(config);
                true
            }
            HostEvent::Realtime(deliveries) => {
                let records = build_records(&deliveries, now);
                self.realtime_event_count += 1;
                log::info!(
                    "[WFD] widget: realtime event {} carried {} records",
                    self.realtime_event_count,
                    records.len()
                );
                // an empty delivery keeps whatever was shown before
                if !records.is_empty() {
                    self.weather_data = records;
                    self.is_loading = false;
                }
                true
            }
            HostEvent::Error(message) => {
                log::error!("[WFD] widget: host error: {}", message);
                let changed = self.is_loading;
                self.is_loading = false;
                changed
            }
        }
    }
}
