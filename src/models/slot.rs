use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ActivityType {
    Course,
    Homework,
    Learning,
    Revision,
}

/// One scheduled block in the generated week. Created only by the weekly
/// generator; `notified` flips once the reminder loop has fired for it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduleSlot {
    pub id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub activity_type: ActivityType,
    pub subject: String,
    pub description: String,
    pub notified: bool,
}

/// Insert draft for a slot, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewScheduleSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub activity_type: ActivityType,
    pub subject: String,
    pub description: String,
}
