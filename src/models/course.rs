use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A timetabled course occurrence. `week_date` is the concrete date the
/// course takes place; `revised` flips to true once a revision session
/// has been scheduled for it and never reverts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub day_of_week: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub week_date: NaiveDate,
    pub revised: bool,
}

/// Clock fields arrive as "HH:MM" text and are parsed at the API boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub name: String,
    pub day_of_week: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub week_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub day_of_week: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}
