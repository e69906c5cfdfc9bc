//! Shared utility functions for WFD crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

    /// Format used for day keys: "YYYY-MM-DD"
    pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DAY_KEY_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
        NaiveDate::parse_from_str(s.trim(), DAY_KEY_FORMAT)
            .map_err(|e| DateError(format!("{s}: {e}")))
    }

    /// Parse an ISO 8601 timestamp.
    ///
    /// Offsets are honoured. A timestamp without an offset
    /// ("2024-01-01T06:00" or "2024-01-01T06:00:00") is read as local time.
    /// Returns None when the string is not a timestamp at all.
    pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        parse_naive_timestamp(s)?
            .and_local_timezone(Local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Parse a timestamp without an offset, e.g. "2024-01-01T06:00".
    pub fn parse_naive_timestamp(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
            .ok()
    }

    /// The calendar day an instant falls on in the given timezone.
    pub fn calendar_day<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
        instant.with_timezone(tz).date_naive()
    }

    /// Short weekday name, e.g. "Mon"
    pub fn day_name(date: &NaiveDate) -> String {
        date.format("%a").to_string()
    }

    /// Compact display date, e.g. "1/5/24"
    pub fn short_display_date(date: &NaiveDate) -> String {
        date.format("%-m/%-d/%y").to_string()
    }

    /// Long display date, e.g. "January 5"
    pub fn long_display_date(date: &NaiveDate) -> String {
        date.format("%B %-d").to_string()
    }

    /// 12-hour clock label for an instant in the given timezone, e.g. "6 AM"
    pub fn hour_label<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        instant.with_timezone(tz).format("%-I %p").to_string()
    }

    /// Whole hours between two instants, rounded half up.
    pub fn hours_between(from: &DateTime<Utc>, to: &DateTime<Utc>) -> i64 {
        let millis = (*to - *from).num_milliseconds() as f64;
        crate::numbers::round_half_up(millis / 3_600_000.0) as i64
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{FixedOffset, TimeZone, Utc};

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2024-01-05");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
            assert!(parse_date("2024-13-01").is_err());
        }

        #[test]
        fn test_parse_timestamp_with_offset() {
            let parsed = parse_timestamp("2024-01-01T06:00:00-06:00").unwrap();
            assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
            let zulu = parse_timestamp("2024-01-01T06:00:00.000Z").unwrap();
            assert_eq!(zulu, Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap());
            assert!(parse_timestamp("06:00").is_none());
            assert!(parse_timestamp("").is_none());
        }

        #[test]
        fn test_parse_naive_timestamp() {
            let parsed = parse_naive_timestamp("2024-01-01T06:00").unwrap();
            assert_eq!(parsed.format("%H:%M").to_string(), "06:00");
            assert!(parse_naive_timestamp("2024-01-01T06:00:30").is_some());
            assert!(parse_naive_timestamp("2024-01-01").is_none());
        }

        #[test]
        fn test_calendar_day_uses_timezone() {
            let instant = Utc.with_ymd_and_hms(2024, 1, 2, 3, 0, 0).unwrap();
            let chicago = FixedOffset::west_opt(6 * 3600).unwrap();
            assert_eq!(
                calendar_day(&instant, &chicago),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
            );
            assert_eq!(
                calendar_day(&instant, &Utc),
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
            );
        }

        #[test]
        fn test_display_formats() {
            let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
            assert_eq!(day_name(&date), "Fri");
            assert_eq!(short_display_date(&date), "1/5/24");
            assert_eq!(long_display_date(&date), "January 5");

            let morning = Utc.with_ymd_and_hms(2024, 1, 5, 6, 0, 0).unwrap();
            assert_eq!(hour_label(&morning, &Utc), "6 AM");
            let evening = Utc.with_ymd_and_hms(2024, 1, 5, 18, 0, 0).unwrap();
            assert_eq!(hour_label(&evening, &Utc), "6 PM");
        }

        #[test]
        fn test_hours_between() {
            let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let to = Utc.with_ymd_and_hms(2024, 1, 1, 5, 30, 0).unwrap();
            assert_eq!(hours_between(&from, &to), 6);
            assert_eq!(hours_between(&to, &from), -5);
        }
    }
}

/// Rounding that matches how the dashboard displays numbers
pub mod numbers {
    /// Round to the nearest integer, ties toward positive infinity.
    ///
    /// `f64::round` sends -2.5 to -3; the dashboard expects -2.
    pub fn round_half_up(value: f64) -> f64 {
        // adding 0.5 first rounds up just below the tie
        let floor = value.floor();
        if value - floor >= 0.5 {
            floor + 1.0
        } else {
            floor
        }
    }

    /// Round to a fixed number of decimal places, e.g. 3 for evapotranspiration.
    pub fn round_to(value: f64, places: i32) -> f64 {
        let factor = 10f64.powi(places);
        (value * factor).round() / factor
    }

    /// Arithmetic mean, None for an empty slice.
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_round_half_up() {
            assert_eq!(round_half_up(2.5), 3.0);
            assert_eq!(round_half_up(-2.5), -2.0);
            assert_eq!(round_half_up(9.49), 9.0);
            assert_eq!(round_half_up(0.49999999999999994), 0.0);
            assert_eq!(round_half_up(-0.5), 0.0);
            assert_eq!(round_half_up(-0.51), -1.0);
        }

        #[test]
        fn test_round_to() {
            assert_eq!(round_to(0.12345, 3), 0.123);
            assert_eq!(round_to(21.0, 1), 21.0);
            assert_eq!(round_to(0.456, 2), 0.46);
        }

        #[test]
        fn test_mean() {
            assert_eq!(mean(&[5.0, 10.0, 15.0]), Some(10.0));
            assert_eq!(mean(&[]), None);
        }
    }
}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
