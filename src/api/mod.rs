use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{patch, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::db::{SqliteStore, repository};
use crate::error::AppError;
use crate::models::*;
use crate::services::ScheduleService;
use crate::services::scheduler::{self, WeeklySummary};
use crate::state::AppState;

#[derive(Deserialize)]
struct HomeworkQueryParams {
    /// "pending", "overdue" or absent for everything.
    filter: Option<String>,
}

#[derive(Deserialize)]
struct WeekParams {
    week_start: NaiveDate,
}

#[derive(Deserialize)]
struct GenerateRequest {
    week_start: NaiveDate,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/{id}", patch(update_course).delete(delete_course))
        .route("/homework", get(list_homework).post(create_homework))
        .route("/homework/{id}", axum::routing::delete(delete_homework))
        .route("/homework/{id}/status", patch(update_homework_status))
        .route("/subjects", get(list_subjects).post(create_subject))
        .route("/schedule", get(get_schedule))
        .route("/schedule/summary", get(get_schedule_summary))
        .route("/schedule/generate", post(generate_schedule))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = repository::fetch_courses(&state.db).await?;
    Ok(Json(courses))
}

async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<NewCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let course = repository::insert_course(&state.db, req).await?;
    Ok(Json(course))
}

async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let course = repository::update_course(&state.db, id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(course))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if repository::delete_course(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn list_homework(
    State(state): State<AppState>,
    Query(params): Query<HomeworkQueryParams>,
) -> Result<Json<Vec<Homework>>, AppError> {
    let today = Utc::now().date_naive();
    let homework = match params.filter.as_deref() {
        Some("pending") => repository::fetch_pending_homework(&state.db, today).await?,
        Some("overdue") => repository::fetch_overdue_homework(&state.db, today).await?,
        Some(other) => {
            return Err(AppError::BadRequest(format!(
                "unknown homework filter '{}'",
                other
            )));
        }
        None => repository::fetch_homework(&state.db).await?,
    };
    Ok(Json(homework))
}

async fn create_homework(
    State(state): State<AppState>,
    Json(req): Json<NewHomeworkRequest>,
) -> Result<Json<Homework>, AppError> {
    let homework = repository::insert_homework(&state.db, req).await?;
    Ok(Json(homework))
}

async fn update_homework_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateHomeworkStatusRequest>,
) -> Result<StatusCode, AppError> {
    if repository::update_homework_status(&state.db, id, req.status).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn delete_homework(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if repository::delete_homework(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn list_subjects(
    State(state): State<AppState>,
) -> Result<Json<Vec<LearningSubject>>, AppError> {
    let subjects = repository::fetch_subjects(&state.db).await?;
    Ok(Json(subjects))
}

async fn create_subject(
    State(state): State<AppState>,
    Json(req): Json<NewSubjectRequest>,
) -> Result<Json<LearningSubject>, AppError> {
    let subject = repository::insert_subject(&state.db, req).await?;
    Ok(Json(subject))
}

async fn get_schedule(
    State(state): State<AppState>,
    Query(params): Query<WeekParams>,
) -> Result<Json<Vec<ScheduleSlot>>, AppError> {
    let week_start = scheduler::monday_of(params.week_start);
    let week_end = week_start + chrono::Duration::days(7);
    let slots = repository::fetch_slots_for_range(&state.db, week_start, week_end).await?;
    Ok(Json(slots))
}

async fn get_schedule_summary(
    State(state): State<AppState>,
    Query(params): Query<WeekParams>,
) -> Result<Json<WeeklySummary>, AppError> {
    let week_start = scheduler::monday_of(params.week_start);
    let week_end = week_start + chrono::Duration::days(7);
    let slots = repository::fetch_slots_for_range(&state.db, week_start, week_end).await?;
    Ok(Json(scheduler::summarize(&slots)))
}

async fn generate_schedule(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = Arc::new(SqliteStore::new(state.db.clone()));
    let service = ScheduleService::new(store, state.planning.clone());
    let count = service.generate_week(req.week_start).await?;
    Ok(Json(serde_json::json!({
        "week_start": scheduler::monday_of(req.week_start),
        "slots": count,
    })))
}
