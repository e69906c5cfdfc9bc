//! Core types and realtime event ingestion for the weather forecast dashboard.
//!
//! Raw observations arrive from the host runtime in delivery batches. Each
//! batch is merged by group key ([`normalizer`]) and every merged group
//! becomes one fully populated [`hour_record::HourRecord`].
//!
//! # Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use wfd_core::hour_record::build_records;
//! use wfd_core::observation::{DeliveryBatch, RawObservation};
//!
//! let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let batch = DeliveryBatch::new(vec![
//!     RawObservation::new("temperature_2m", 70.0).with_group("2024-01-01_06"),
//!     RawObservation::new("precipitation", 0.2).with_group("2024-01-01_06"),
//! ]);
//! let records = build_records(&[batch], &now);
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].temperature_eighty_m, 70.0);
//! ```

pub mod hour_record;
pub mod metric;
pub mod normalizer;
pub mod observation;
