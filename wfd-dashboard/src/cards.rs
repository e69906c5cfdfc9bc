//! Day cards of the weekly overview.

use crate::condition::{classify, Condition, WeatherIcon};
use chrono::NaiveDate;
use serde::Serialize;
use wfd_data::day_forecast::DayForecast;
use wfd_utils::dates::{long_display_date, short_display_date};
use wfd_utils::numbers::round_half_up;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCard {
    pub date: NaiveDate,
    /// "Today" or the short weekday name
    pub label: String,
    /// e.g. "1/5/24"
    pub display_date: String,
    pub high: i64,
    pub low: i64,
    pub precip_chance: i64,
    pub condition: Condition,
    pub icon: WeatherIcon,
    pub is_selected: bool,
}

pub fn is_today(day: &DayForecast, today: NaiveDate) -> bool {
    day.date == today
}

pub fn card_label(day: &DayForecast, today: NaiveDate) -> String {
    if is_today(day, today) {
        "Today".to_string()
    } else {
        day.day_name.clone()
    }
}

/// Heading above the hourly chart, e.g. "Fri - January 5".
pub fn day_heading(day: &DayForecast) -> String {
    format!("{} - {}", day.day_name, long_display_date(&day.date))
}

impl DayCard {
    pub fn new(day: &DayForecast, today: NaiveDate, selected: Option<NaiveDate>) -> DayCard {
        let (condition, icon) = classify(
            day.avg_temp,
            day.total_precipitation,
            day.avg_precipitation_prob,
        );
        DayCard {
            date: day.date,
            label: card_label(day, today),
            display_date: short_display_date(&day.date),
            high: round_half_up(day.max_temp) as i64,
            low: round_half_up(day.min_temp) as i64,
            precip_chance: round_half_up(day.avg_precipitation_prob) as i64,
            condition,
            icon,
            is_selected: selected == Some(day.date),
        }
    }
}

pub fn day_cards(days: &[DayForecast], today: NaiveDate, selected: Option<NaiveDate>) -> Vec<DayCard> {
    days.iter().map(|d| DayCard::new(d, today, selected)).collect()
}
