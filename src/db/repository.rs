use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::SqlitePool;

use crate::clock;
use crate::config::DEFAULT_SUBJECTS;
use crate::error::AppError;
use crate::models::{
    Course, Homework, HomeworkStatus, LearningSubject, NewCourseRequest, NewHomeworkRequest,
    NewScheduleSlot, NewSubjectRequest, ScheduleSlot, UpdateCourseRequest,
};

// ---------------------------------------------------------------- courses

pub async fn fetch_courses(db: &SqlitePool) -> Result<Vec<Course>, AppError> {
    let courses = sqlx::query_as::<_, Course>(
        "SELECT id, name, day_of_week, start_time, end_time, week_date, revised
         FROM courses ORDER BY week_date DESC, start_time",
    )
    .fetch_all(db)
    .await?;
    Ok(courses)
}

pub async fn fetch_courses_for_week(
    db: &SqlitePool,
    week_start: NaiveDate,
) -> Result<Vec<Course>, AppError> {
    let week_end = week_start + chrono::Duration::days(7);
    let courses = sqlx::query_as::<_, Course>(
        "SELECT id, name, day_of_week, start_time, end_time, week_date, revised
         FROM courses
         WHERE week_date >= ? AND week_date < ?
         ORDER BY week_date, start_time",
    )
    .bind(week_start)
    .bind(week_end)
    .fetch_all(db)
    .await?;
    Ok(courses)
}

/// Courses old enough to revise and not yet revised, oldest first.
pub async fn fetch_courses_for_revision(
    db: &SqlitePool,
    cutoff: NaiveDate,
    limit: i64,
) -> Result<Vec<Course>, AppError> {
    let courses = sqlx::query_as::<_, Course>(
        "SELECT id, name, day_of_week, start_time, end_time, week_date, revised
         FROM courses
         WHERE revised = 0 AND week_date <= ?
         ORDER BY week_date ASC
         LIMIT ?",
    )
    .bind(cutoff)
    .bind(limit)
    .fetch_all(db)
    .await?;
    Ok(courses)
}

pub async fn insert_course(db: &SqlitePool, req: NewCourseRequest) -> Result<Course, AppError> {
    let start_time = clock::parse_clock(&req.start_time)?;
    let end_time = clock::parse_clock(&req.end_time)?;
    let day_of_week = req
        .day_of_week
        .unwrap_or_else(|| clock::day_name(req.week_date).to_string());

    let result = sqlx::query(
        "INSERT INTO courses (name, day_of_week, start_time, end_time, week_date, revised)
         VALUES (?, ?, ?, ?, ?, 0)",
    )
    .bind(&req.name)
    .bind(&day_of_week)
    .bind(start_time)
    .bind(end_time)
    .bind(req.week_date)
    .execute(db)
    .await?;

    Ok(Course {
        id: result.last_insert_rowid(),
        name: req.name,
        day_of_week,
        start_time,
        end_time,
        week_date: req.week_date,
        revised: false,
    })
}

pub async fn update_course(
    db: &SqlitePool,
    id: i64,
    req: UpdateCourseRequest,
) -> Result<Option<Course>, AppError> {
    let mut current = match find_course_by_id(db, id).await? {
        Some(c) => c,
        None => return Ok(None),
    };

    if let Some(name) = req.name {
        current.name = name;
    }
    if let Some(day_of_week) = req.day_of_week {
        current.day_of_week = day_of_week;
    }
    if let Some(start_time) = req.start_time {
        current.start_time = clock::parse_clock(&start_time)?;
    }
    if let Some(end_time) = req.end_time {
        current.end_time = clock::parse_clock(&end_time)?;
    }

    sqlx::query(
        "UPDATE courses SET name = ?, day_of_week = ?, start_time = ?, end_time = ? WHERE id = ?",
    )
    .bind(&current.name)
    .bind(&current.day_of_week)
    .bind(current.start_time)
    .bind(current.end_time)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn find_course_by_id(db: &SqlitePool, id: i64) -> Result<Option<Course>, AppError> {
    let course = sqlx::query_as::<_, Course>(
        "SELECT id, name, day_of_week, start_time, end_time, week_date, revised
         FROM courses WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(course)
}

pub async fn delete_course(db: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn mark_course_revised(db: &SqlitePool, id: i64) -> Result<(), AppError> {
    sqlx::query("UPDATE courses SET revised = 1 WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

// --------------------------------------------------------------- homework

pub async fn fetch_homework(db: &SqlitePool) -> Result<Vec<Homework>, AppError> {
    let homework = sqlx::query_as::<_, Homework>(
        "SELECT id, subject, description, due_date, due_time, preparation_days, status
         FROM homework ORDER BY due_date DESC, due_time DESC",
    )
    .fetch_all(db)
    .await?;
    Ok(homework)
}

/// Unfinished homework with a deadline today or later.
pub async fn fetch_pending_homework(
    db: &SqlitePool,
    today: NaiveDate,
) -> Result<Vec<Homework>, AppError> {
    let homework = sqlx::query_as::<_, Homework>(
        "SELECT id, subject, description, due_date, due_time, preparation_days, status
         FROM homework
         WHERE status != ? AND due_date >= ?
         ORDER BY due_date ASC, due_time ASC",
    )
    .bind(HomeworkStatus::Completed)
    .bind(today)
    .fetch_all(db)
    .await?;
    Ok(homework)
}

/// Unfinished homework whose deadline has already passed.
pub async fn fetch_overdue_homework(
    db: &SqlitePool,
    today: NaiveDate,
) -> Result<Vec<Homework>, AppError> {
    let homework = sqlx::query_as::<_, Homework>(
        "SELECT id, subject, description, due_date, due_time, preparation_days, status
         FROM homework
         WHERE status != ? AND due_date < ?
         ORDER BY due_date DESC",
    )
    .bind(HomeworkStatus::Completed)
    .bind(today)
    .fetch_all(db)
    .await?;
    Ok(homework)
}

/// Unfinished homework due within `threshold_days` of `today`, soonest
/// deadline first. These get top priority in the weekly plan.
pub async fn fetch_urgent_homework(
    db: &SqlitePool,
    today: NaiveDate,
    threshold_days: i64,
) -> Result<Vec<Homework>, AppError> {
    let horizon = today + chrono::Duration::days(threshold_days);
    let homework = sqlx::query_as::<_, Homework>(
        "SELECT id, subject, description, due_date, due_time, preparation_days, status
         FROM homework
         WHERE status != ? AND due_date >= ? AND due_date <= ?
         ORDER BY due_date ASC, due_time ASC",
    )
    .bind(HomeworkStatus::Completed)
    .bind(today)
    .bind(horizon)
    .fetch_all(db)
    .await?;
    Ok(homework)
}

pub async fn insert_homework(db: &SqlitePool, req: NewHomeworkRequest) -> Result<Homework, AppError> {
    let due_time = clock::parse_clock(&req.due_time)?;
    let preparation_days = req.preparation_days.unwrap_or(3);

    let result = sqlx::query(
        "INSERT INTO homework (subject, description, due_date, due_time, preparation_days, status)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&req.subject)
    .bind(&req.description)
    .bind(req.due_date)
    .bind(due_time)
    .bind(preparation_days)
    .bind(HomeworkStatus::Pending)
    .execute(db)
    .await?;

    Ok(Homework {
        id: result.last_insert_rowid(),
        subject: req.subject,
        description: req.description,
        due_date: req.due_date,
        due_time,
        preparation_days,
        status: HomeworkStatus::Pending,
    })
}

pub async fn update_homework_status(
    db: &SqlitePool,
    id: i64,
    status: HomeworkStatus,
) -> Result<bool, AppError> {
    let result = sqlx::query("UPDATE homework SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_homework(db: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM homework WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

// --------------------------------------------------------------- subjects

pub async fn fetch_subjects(db: &SqlitePool) -> Result<Vec<LearningSubject>, AppError> {
    let subjects = sqlx::query_as::<_, LearningSubject>(
        "SELECT id, name, priority, total_hours, last_studied
         FROM learning_subjects
         ORDER BY priority DESC, last_studied ASC",
    )
    .fetch_all(db)
    .await?;
    Ok(subjects)
}

/// Subjects ranked for the study rotation: never-studied first, then the
/// longest untouched, then the fewest accumulated hours.
pub async fn fetch_least_studied(
    db: &SqlitePool,
    limit: i64,
) -> Result<Vec<LearningSubject>, AppError> {
    let subjects = sqlx::query_as::<_, LearningSubject>(
        "SELECT id, name, priority, total_hours, last_studied
         FROM learning_subjects
         ORDER BY last_studied IS NULL DESC, last_studied ASC, total_hours ASC
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(db)
    .await?;
    Ok(subjects)
}

pub async fn insert_subject(
    db: &SqlitePool,
    req: NewSubjectRequest,
) -> Result<LearningSubject, AppError> {
    let priority = req.priority.unwrap_or(1);
    let result = sqlx::query("INSERT INTO learning_subjects (name, priority) VALUES (?, ?)")
        .bind(&req.name)
        .bind(priority)
        .execute(db)
        .await?;

    Ok(LearningSubject {
        id: result.last_insert_rowid(),
        name: req.name,
        priority,
        total_hours: 0.0,
        last_studied: None,
    })
}

/// Adds scheduled study hours and stamps the subject as just studied.
pub async fn credit_study_time(db: &SqlitePool, name: &str, hours: f64) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE learning_subjects
         SET last_studied = ?, total_hours = total_hours + ?
         WHERE name = ?",
    )
    .bind(Utc::now())
    .bind(hours)
    .bind(name)
    .execute(db)
    .await?;
    Ok(())
}

/// First-start seeding: inserts the default subject list when the table
/// is empty, otherwise leaves it alone.
pub async fn seed_default_subjects(db: &SqlitePool) -> Result<usize, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM learning_subjects")
        .fetch_one(db)
        .await?;
    if count > 0 {
        return Ok(0);
    }

    for name in DEFAULT_SUBJECTS {
        sqlx::query("INSERT INTO learning_subjects (name, priority) VALUES (?, 1)")
            .bind(name)
            .execute(db)
            .await?;
    }
    Ok(DEFAULT_SUBJECTS.len())
}

// ------------------------------------------------------------------ slots

pub async fn fetch_slots_for_range(
    db: &SqlitePool,
    from: NaiveDate,
    to_exclusive: NaiveDate,
) -> Result<Vec<ScheduleSlot>, AppError> {
    let slots = sqlx::query_as::<_, ScheduleSlot>(
        "SELECT id, date, start_time, end_time, activity_type, subject, description, notified
         FROM schedule_slots
         WHERE date >= ? AND date < ?
         ORDER BY date, start_time",
    )
    .bind(from)
    .bind(to_exclusive)
    .fetch_all(db)
    .await?;
    Ok(slots)
}

pub async fn delete_slots_in_range(
    db: &SqlitePool,
    from: NaiveDate,
    to_exclusive: NaiveDate,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM schedule_slots WHERE date >= ? AND date < ?")
        .bind(from)
        .bind(to_exclusive)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Batch insert of a generated week, one transaction.
pub async fn insert_slots(db: &SqlitePool, slots: &[NewScheduleSlot]) -> Result<usize, AppError> {
    let mut tx = db.begin().await?;
    for slot in slots {
        sqlx::query(
            "INSERT INTO schedule_slots
                 (date, start_time, end_time, activity_type, subject, description, notified)
             VALUES (?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(slot.date)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(slot.activity_type)
        .bind(&slot.subject)
        .bind(&slot.description)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(slots.len())
}

/// Slots on `date` starting inside the reminder window that have not been
/// notified yet.
pub async fn fetch_due_reminders(
    db: &SqlitePool,
    date: NaiveDate,
    window_start: NaiveTime,
    window_end: NaiveTime,
) -> Result<Vec<ScheduleSlot>, AppError> {
    let slots = sqlx::query_as::<_, ScheduleSlot>(
        "SELECT id, date, start_time, end_time, activity_type, subject, description, notified
         FROM schedule_slots
         WHERE date = ? AND start_time >= ? AND start_time <= ? AND notified = 0
         ORDER BY start_time",
    )
    .bind(date)
    .bind(window_start)
    .bind(window_end)
    .fetch_all(db)
    .await?;
    Ok(slots)
}

pub async fn mark_slot_notified(db: &SqlitePool, id: i64) -> Result<(), AppError> {
    sqlx::query("UPDATE schedule_slots SET notified = 1 WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
