use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;

use learning_planner::clock;
use learning_planner::config::PlanningConfig;
use learning_planner::db::{SqliteStore, repository};
use learning_planner::error::AppError;
use learning_planner::models::{ActivityType, NewCourseRequest, NewHomeworkRequest, NewScheduleSlot, NewSubjectRequest};
use learning_planner::services::ScheduleService;
use learning_planner::services::scheduler::monday_of;

async fn setup_db() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

fn service(pool: &SqlitePool) -> ScheduleService {
    ScheduleService::new(
        Arc::new(SqliteStore::new(pool.clone())),
        PlanningConfig::default(),
    )
}

async fn add_course(pool: &SqlitePool, name: &str, date: NaiveDate, start: &str, end: &str) {
    repository::insert_course(
        pool,
        NewCourseRequest {
            name: name.to_string(),
            day_of_week: None,
            start_time: start.to_string(),
            end_time: end.to_string(),
            week_date: date,
        },
    )
    .await
    .expect("Failed to insert course");
}

async fn add_subject(pool: &SqlitePool, name: &str) {
    repository::insert_subject(
        pool,
        NewSubjectRequest {
            name: name.to_string(),
            priority: None,
        },
    )
    .await
    .expect("Failed to insert subject");
}

#[tokio::test]
async fn test_generate_week_full_flow() {
    let pool = setup_db().await;
    let today = Utc::now().date_naive();
    let week_start = monday_of(today);

    // One timetabled course midweek, one stale course from two weeks ago,
    // one urgent homework item, two study subjects.
    add_course(
        &pool,
        "Computer Architecture",
        week_start + Duration::days(2),
        "09:00",
        "11:00",
    )
    .await;
    add_course(
        &pool,
        "Old IP Networks Lecture",
        today - Duration::days(14),
        "09:00",
        "11:00",
    )
    .await;
    repository::insert_homework(
        &pool,
        NewHomeworkRequest {
            subject: "IP Networks".to_string(),
            description: "Lab report".to_string(),
            due_date: today + Duration::days(1),
            due_time: "18:00".to_string(),
            preparation_days: None,
        },
    )
    .await
    .expect("Failed to insert homework");
    add_subject(&pool, "Python").await;
    add_subject(&pool, "CSS").await;

    let count = service(&pool)
        .generate_week_as_of(week_start, today)
        .await
        .expect("Failed to generate week");
    assert!(count > 0);

    let slots = repository::fetch_slots_for_range(&pool, week_start, week_start + Duration::days(7))
        .await
        .expect("Failed to fetch slots");
    assert_eq!(slots.len(), count);

    // Course pass-through.
    let course_slots: Vec<_> = slots
        .iter()
        .filter(|s| s.activity_type == ActivityType::Course)
        .collect();
    assert_eq!(course_slots.len(), 1);
    assert_eq!(course_slots[0].subject, "Computer Architecture");
    assert_eq!(course_slots[0].date, week_start + Duration::days(2));
    assert_eq!(course_slots[0].start_time, clock::parse_clock("09:00").unwrap());

    // The urgent homework gets exactly one prep session in the week.
    let homework_slots: Vec<_> = slots
        .iter()
        .filter(|s| s.activity_type == ActivityType::Homework)
        .collect();
    assert_eq!(homework_slots.len(), 1);
    assert_eq!(homework_slots[0].subject, "IP Networks");

    // The stale course was revised early in the week and flagged.
    let revision_slots: Vec<_> = slots
        .iter()
        .filter(|s| s.activity_type == ActivityType::Revision)
        .collect();
    assert_eq!(revision_slots.len(), 1);
    for slot in &revision_slots {
        let offset = (slot.date - week_start).num_days();
        assert!((0..4).contains(&offset), "revision on offset {}", offset);
    }
    let revised: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE revised = 1")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(revised, 1);

    // Learning sessions fill the rest and study time was credited.
    assert!(slots.iter().any(|s| s.activity_type == ActivityType::Learning));
    let subjects = repository::fetch_subjects(&pool).await.unwrap();
    let credited: f64 = subjects.iter().map(|s| s.total_hours).sum();
    assert!(credited > 0.0);
}

#[tokio::test]
async fn test_sessions_never_overlap_and_have_fixed_length() {
    let pool = setup_db().await;
    let today = Utc::now().date_naive();
    let week_start = monday_of(today);

    add_course(&pool, "Algebra", week_start, "08:00", "10:00").await;
    add_course(&pool, "Analysis", week_start, "14:00", "16:00").await;
    add_subject(&pool, "Python").await;

    service(&pool)
        .generate_week_as_of(week_start, today)
        .await
        .expect("Failed to generate week");

    let slots = repository::fetch_slots_for_range(&pool, week_start, week_start + Duration::days(7))
        .await
        .unwrap();

    let mut by_day: HashMap<NaiveDate, Vec<(u32, u32)>> = HashMap::new();
    for slot in &slots {
        by_day.entry(slot.date).or_default().push((
            clock::to_minutes(slot.start_time),
            clock::to_minutes(slot.end_time),
        ));
        if slot.activity_type != ActivityType::Course {
            let len = clock::to_minutes(slot.end_time) - clock::to_minutes(slot.start_time);
            assert_eq!(len, 90);
        }
    }
    for spans in by_day.values_mut() {
        spans.sort_unstable();
        for pair in spans.windows(2) {
            assert!(pair[0].1 <= pair[1].0, "overlap: {:?} vs {:?}", pair[0], pair[1]);
        }
    }
}

#[tokio::test]
async fn test_regeneration_replaces_the_week() {
    let pool = setup_db().await;
    let today = Utc::now().date_naive();
    let week_start = monday_of(today);

    add_course(&pool, "Algebra", week_start + Duration::days(1), "10:00", "12:00").await;
    add_subject(&pool, "Python").await;

    let svc = service(&pool);
    let first = svc.generate_week_as_of(week_start, today).await.unwrap();
    let second = svc.generate_week_as_of(week_start, today).await.unwrap();

    // Replaced wholesale, not appended: the table holds exactly the
    // second run's output.
    let slots = repository::fetch_slots_for_range(&pool, week_start, week_start + Duration::days(7))
        .await
        .unwrap();
    assert_eq!(slots.len(), second);

    // Course-derived sessions are identical across runs.
    let course_slots: Vec<_> = slots
        .iter()
        .filter(|s| s.activity_type == ActivityType::Course)
        .collect();
    assert_eq!(course_slots.len(), 1);
    assert_eq!(course_slots[0].subject, "Algebra");
    assert!(first > 0 && second > 0);
}

#[tokio::test]
async fn test_week_start_is_normalized_to_monday() {
    let pool = setup_db().await;
    let today = Utc::now().date_naive();
    let week_start = monday_of(today);

    add_course(&pool, "Algebra", week_start, "10:00", "12:00").await;

    // Asking for a mid-week date plans the same Monday-anchored week.
    let count = service(&pool)
        .generate_week_as_of(week_start + Duration::days(3), today)
        .await
        .unwrap();
    assert!(count > 0);

    let slots = repository::fetch_slots_for_range(&pool, week_start, week_start + Duration::days(7))
        .await
        .unwrap();
    assert!(slots.iter().any(|s| s.subject == "Algebra"));
}

#[tokio::test]
async fn test_empty_backlog_still_plans_courses_only() {
    let pool = setup_db().await;
    let today = Utc::now().date_naive();
    let week_start = monday_of(today);

    add_course(&pool, "Algebra", week_start, "10:00", "12:00").await;

    let count = service(&pool)
        .generate_week_as_of(week_start, today)
        .await
        .unwrap();
    // No homework, nothing to revise, no subjects: just the course.
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_invalid_config_fails_before_deleting_anything() {
    let pool = setup_db().await;
    let today = Utc::now().date_naive();
    let week_start = monday_of(today);

    // A leftover slot from an earlier run.
    repository::insert_slots(
        &pool,
        &[NewScheduleSlot {
            date: week_start,
            start_time: clock::parse_clock("08:00").unwrap(),
            end_time: clock::parse_clock("09:30").unwrap(),
            activity_type: ActivityType::Learning,
            subject: "Python".to_string(),
            description: "Study: Python".to_string(),
        }],
    )
    .await
    .unwrap();

    let bad_config = PlanningConfig {
        session_duration: 0,
        ..PlanningConfig::default()
    };
    let svc = ScheduleService::new(Arc::new(SqliteStore::new(pool.clone())), bad_config);

    let result = svc.generate_week_as_of(week_start, today).await;
    assert!(matches!(result, Err(AppError::Config(_))));

    // Validation runs before the destructive delete.
    let slots = repository::fetch_slots_for_range(&pool, week_start, week_start + Duration::days(7))
        .await
        .unwrap();
    assert_eq!(slots.len(), 1);
}
