use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A self-study subject in the rotation pool. `total_hours` counts
/// scheduled study time, credited when the planner assigns a session,
/// not when the session is actually sat.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LearningSubject {
    pub id: i64,
    pub name: String,
    pub priority: i64,
    pub total_hours: f64,
    pub last_studied: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubjectRequest {
    pub name: String,
    pub priority: Option<i64>,
}
