use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::error::AppError;

pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Parses a clock value in "HH:MM" form.
pub fn parse_clock(text: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(text, "%H:%M")
        .map_err(|_| AppError::Format(format!("expected HH:MM, got '{}'", text)))
}

/// Minutes since midnight.
pub fn to_minutes(t: NaiveTime) -> u32 {
    use chrono::Timelike;
    t.hour() * 60 + t.minute()
}

/// Inverse of `to_minutes`. Offsets at or past 24:00 saturate to the end
/// of the clock instead of wrapping: the hour clamps to 23 and the minute
/// to 59.
pub fn from_minutes(minutes: u32) -> NaiveTime {
    let hours = (minutes / 60).min(23);
    let mins = (minutes % 60).min(59);
    NaiveTime::from_hms_opt(hours, mins, 0).expect("clamped values form a valid clock time")
}

/// Weekday label for a date, Monday first.
pub fn day_name(date: NaiveDate) -> &'static str {
    DAY_NAMES[date.weekday().num_days_from_monday() as usize]
}
