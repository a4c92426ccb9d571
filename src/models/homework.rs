use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum HomeworkStatus {
    Pending,
    InProgress,
    Completed,
}

/// A homework item with a deadline. The scheduler reads these but never
/// changes their status; status moves through the API only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Homework {
    pub id: i64,
    pub subject: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub due_time: NaiveTime,
    pub preparation_days: i64,
    pub status: HomeworkStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHomeworkRequest {
    pub subject: String,
    #[serde(default)]
    pub description: String,
    pub due_date: NaiveDate,
    pub due_time: String,
    pub preparation_days: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateHomeworkStatusRequest {
    pub status: HomeworkStatus,
}
