use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{Course, Homework, LearningSubject, NewScheduleSlot};

/// Persistence seam consumed by the weekly generator. The scheduler only
/// ever talks to the store through this trait, which keeps the planning
/// logic testable against an in-memory implementation.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn courses_for_week(&self, week_start: NaiveDate) -> Result<Vec<Course>, AppError>;

    async fn urgent_homework(
        &self,
        today: NaiveDate,
        threshold_days: i64,
    ) -> Result<Vec<Homework>, AppError>;

    /// Stale courses not yet revised, oldest first, capped at `limit`.
    async fn courses_for_revision(
        &self,
        cutoff: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Course>, AppError>;

    async fn least_studied_subjects(&self, limit: i64) -> Result<Vec<LearningSubject>, AppError>;

    async fn delete_slots(
        &self,
        from: NaiveDate,
        to_exclusive: NaiveDate,
    ) -> Result<u64, AppError>;

    async fn insert_slots(&self, slots: &[NewScheduleSlot]) -> Result<usize, AppError>;

    async fn credit_study_time(&self, subject: &str, hours: f64) -> Result<(), AppError>;

    async fn mark_course_revised(&self, course_id: i64) -> Result<(), AppError>;
}

pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScheduleStore for SqliteStore {
    async fn courses_for_week(&self, week_start: NaiveDate) -> Result<Vec<Course>, AppError> {
        repository::fetch_courses_for_week(&self.db, week_start).await
    }

    async fn urgent_homework(
        &self,
        today: NaiveDate,
        threshold_days: i64,
    ) -> Result<Vec<Homework>, AppError> {
        repository::fetch_urgent_homework(&self.db, today, threshold_days).await
    }

    async fn courses_for_revision(
        &self,
        cutoff: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Course>, AppError> {
        repository::fetch_courses_for_revision(&self.db, cutoff, limit).await
    }

    async fn least_studied_subjects(&self, limit: i64) -> Result<Vec<LearningSubject>, AppError> {
        repository::fetch_least_studied(&self.db, limit).await
    }

    async fn delete_slots(
        &self,
        from: NaiveDate,
        to_exclusive: NaiveDate,
    ) -> Result<u64, AppError> {
        repository::delete_slots_in_range(&self.db, from, to_exclusive).await
    }

    async fn insert_slots(&self, slots: &[NewScheduleSlot]) -> Result<usize, AppError> {
        repository::insert_slots(&self.db, slots).await
    }

    async fn credit_study_time(&self, subject: &str, hours: f64) -> Result<(), AppError> {
        repository::credit_study_time(&self.db, subject, hours).await
    }

    async fn mark_course_revised(&self, course_id: i64) -> Result<(), AppError> {
        repository::mark_course_revised(&self.db, course_id).await
    }
}
