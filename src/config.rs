use std::env;

use chrono::NaiveTime;

use crate::clock;
use crate::error::AppError;

/// Subjects seeded into an empty database on first start.
pub const DEFAULT_SUBJECTS: [&str; 8] = [
    "Python",
    "HTML",
    "CSS",
    "PHP",
    "MySQL",
    "PostgreSQL",
    "Math_General",
    "Lire_la_Bible",
];

/// Parameters driving the weekly planning algorithm.
/// Every value can be overridden from the environment; the defaults match
/// a 06:00-23:00 study day with 90-minute sessions.
#[derive(Clone, Debug)]
pub struct PlanningConfig {
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub lunch_break: (NaiveTime, NaiveTime),
    pub dinner_break: (NaiveTime, NaiveTime),
    /// Minutes per study session.
    pub session_duration: u32,
    /// Minutes between two sessions in the same free interval.
    pub break_duration: u32,
    /// A homework item is urgent when due within this many days.
    pub homework_preparation_days: i64,
    /// A course is due for revision once this many days old.
    pub revision_threshold_days: i64,
}

#[derive(Clone, Debug)]
pub struct NotificationConfig {
    pub enabled: bool,
    /// Notify this many minutes before a slot starts.
    pub advance_minutes: i64,
    /// Poll cadence of the reminder loop.
    pub poll_interval_secs: u64,
}

impl PlanningConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let config = Self {
            day_start: env_clock("PLANNER_DAY_START", "06:00")?,
            day_end: env_clock("PLANNER_DAY_END", "23:00")?,
            lunch_break: env_span("PLANNER_LUNCH_BREAK", "12:00-13:00")?,
            dinner_break: env_span("PLANNER_DINNER_BREAK", "19:00-20:00")?,
            session_duration: env_number("PLANNER_SESSION_MINUTES", 90)?,
            break_duration: env_number("PLANNER_BREAK_MINUTES", 15)?,
            homework_preparation_days: env_number("PLANNER_HOMEWORK_PREPARATION_DAYS", 3)?,
            revision_threshold_days: env_number("PLANNER_REVISION_THRESHOLD_DAYS", 7)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects parameter combinations that would make the allocator loop
    /// forever or plan inside an empty day window.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.session_duration == 0 {
            return Err(AppError::Config(
                "session duration must be positive".to_string(),
            ));
        }
        if self.day_start >= self.day_end {
            return Err(AppError::Config(format!(
                "day window is empty: {} >= {}",
                self.day_start, self.day_end
            )));
        }
        if self.homework_preparation_days < 0 || self.revision_threshold_days < 0 {
            return Err(AppError::Config(
                "day thresholds must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            day_start: clock::from_minutes(6 * 60),
            day_end: clock::from_minutes(23 * 60),
            lunch_break: (clock::from_minutes(12 * 60), clock::from_minutes(13 * 60)),
            dinner_break: (clock::from_minutes(19 * 60), clock::from_minutes(20 * 60)),
            session_duration: 90,
            break_duration: 15,
            homework_preparation_days: 3,
            revision_threshold_days: 7,
        }
    }
}

impl NotificationConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            enabled: env::var("PLANNER_NOTIFICATIONS")
                .map(|v| v != "0" && v.to_lowercase() != "false")
                .unwrap_or(true),
            advance_minutes: env_number("PLANNER_NOTIFY_ADVANCE_MINUTES", 15)?,
            poll_interval_secs: env_number("PLANNER_NOTIFY_POLL_SECS", 60)?,
        })
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            advance_minutes: 15,
            poll_interval_secs: 60,
        }
    }
}

fn env_clock(key: &str, default: &str) -> Result<NaiveTime, AppError> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    clock::parse_clock(&raw).map_err(|_| AppError::Config(format!("{}: expected HH:MM, got '{}'", key, raw)))
}

fn env_span(key: &str, default: &str) -> Result<(NaiveTime, NaiveTime), AppError> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    let (start, end) = raw
        .split_once('-')
        .ok_or_else(|| AppError::Config(format!("{}: expected HH:MM-HH:MM, got '{}'", key, raw)))?;
    Ok((
        clock::parse_clock(start.trim())
            .map_err(|_| AppError::Config(format!("{}: bad start time '{}'", key, start)))?,
        clock::parse_clock(end.trim())
            .map_err(|_| AppError::Config(format!("{}: bad end time '{}'", key, end)))?,
    ))
}

fn env_number<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::Config(format!("{}: expected a number, got '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}
