//! Host runtime adapter for the weather forecast widget.
//!
//! A host (the live telemetry runtime, or the bundled fixture in
//! development) talks to the widget only through [`context::HostEvent`]s.
//! The [`host`] event loop applies them to a [`context::WidgetContext`],
//! and [`fixture`] turns the mock forecast into the same event stream.
//!
//! ```rust
//! use wfd_widget::context::{HostEvent, WidgetContext};
//! use wfd_widget::fixture::MockForecast;
//!
//! let fixture = MockForecast::bundled().unwrap();
//! let now = chrono::Utc::now();
//! let mut context = WidgetContext::new();
//! context.apply(HostEvent::Realtime(vec![fixture.to_delivery(&now)]), &now);
//! assert_eq!(context.weather_data.len(), 7 * 24);
//! assert!(!context.is_loading);
//! ```

pub mod context;
pub mod fixture;
pub mod host;
