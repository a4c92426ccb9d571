use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::clock;
use crate::config::PlanningConfig;
use crate::db::ScheduleStore;
use crate::error::AppError;
use crate::models::{ActivityType, NewScheduleSlot, ScheduleSlot};
use crate::services::allocator::{self, Backlog};
use crate::services::slots;

/// At most this many stale courses are pulled into one week's plan.
pub const REVISION_BATCH_LIMIT: i64 = 10;
/// Size of the least-studied rotation pool.
pub const ROTATION_POOL_LIMIT: i64 = 8;

/// Weekly plan generator. Replaces the stored schedule for a week in one
/// delete-then-insert pass; holds no state between invocations.
pub struct ScheduleService {
    store: Arc<dyn ScheduleStore>,
    config: PlanningConfig,
}

impl ScheduleService {
    pub fn new(store: Arc<dyn ScheduleStore>, config: PlanningConfig) -> Self {
        Self { store, config }
    }

    /// Generates the plan for the week containing `week_start` and
    /// returns the number of slots persisted.
    ///
    /// The previous plan for that week is deleted up front; if a later
    /// persistence call fails the week is left empty, and the caller
    /// recovers by regenerating (the unconditional delete makes a rerun
    /// idempotent).
    pub async fn generate_week(&self, week_start: NaiveDate) -> Result<usize, AppError> {
        self.generate_week_as_of(week_start, Utc::now().date_naive())
            .await
    }

    /// `today` anchors the homework urgency and revision staleness
    /// windows; split out so tests can pin it.
    pub async fn generate_week_as_of(
        &self,
        week_start: NaiveDate,
        today: NaiveDate,
    ) -> Result<usize, AppError> {
        self.config.validate()?;

        let week_start = monday_of(week_start);
        let week_end = week_start + Duration::days(7);

        self.store.delete_slots(week_start, week_end).await?;

        let courses = self.store.courses_for_week(week_start).await?;
        let homework = self
            .store
            .urgent_homework(today, self.config.homework_preparation_days)
            .await?;
        let revision_cutoff = today - Duration::days(self.config.revision_threshold_days);
        let revision = self
            .store
            .courses_for_revision(revision_cutoff, REVISION_BATCH_LIMIT)
            .await?;
        let subjects = self
            .store
            .least_studied_subjects(ROTATION_POOL_LIMIT)
            .await?;

        info!(
            "planning week of {}: {} courses, {} urgent homework, {} to revise, {} study subjects",
            week_start,
            courses.len(),
            homework.len(),
            revision.len(),
            subjects.len()
        );

        let mut backlog = Backlog {
            homework,
            revision: revision.into(),
            subjects,
            cursor: 0,
        };
        let mut entries: Vec<NewScheduleSlot> = Vec::new();

        for day_offset in 0..7u32 {
            let date = week_start + Duration::days(i64::from(day_offset));

            // Courses pass straight through; only the gaps go to the
            // allocator.
            for course in courses.iter().filter(|c| c.week_date == date) {
                entries.push(NewScheduleSlot {
                    date,
                    start_time: course.start_time,
                    end_time: course.end_time,
                    activity_type: ActivityType::Course,
                    subject: course.name.clone(),
                    description: format!("Course: {}", course.name),
                });
            }

            let free = slots::free_intervals(date, &courses, &self.config);
            if free.is_empty() {
                info!("{} {}: no free time", clock::day_name(date), date);
                continue;
            }

            let plan =
                allocator::fill_free_time(date, day_offset, &free, &mut backlog, &self.config);

            for course_id in &plan.revised_courses {
                self.store.mark_course_revised(*course_id).await?;
            }
            for (subject, hours) in &plan.study_credits {
                self.store.credit_study_time(subject, *hours).await?;
            }

            entries.extend(plan.sessions);
        }

        let count = self.store.insert_slots(&entries).await?;
        info!("week of {} planned: {} slots", week_start, count);
        Ok(count)
    }
}

/// Monday of the week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct ActivityTotals {
    pub count: usize,
    pub hours: f64,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct WeeklySummary {
    pub course: ActivityTotals,
    pub homework: ActivityTotals,
    pub learning: ActivityTotals,
    pub revision: ActivityTotals,
}

/// Per-activity counts and hours over a set of slots, hours rounded to
/// one decimal place.
pub fn summarize(slots: &[ScheduleSlot]) -> WeeklySummary {
    let mut summary = WeeklySummary::default();
    for slot in slots {
        let totals = match slot.activity_type {
            ActivityType::Course => &mut summary.course,
            ActivityType::Homework => &mut summary.homework,
            ActivityType::Learning => &mut summary.learning,
            ActivityType::Revision => &mut summary.revision,
        };
        totals.count += 1;
        let minutes = clock::to_minutes(slot.end_time) - clock::to_minutes(slot.start_time);
        totals.hours += f64::from(minutes) / 60.0;
    }
    for totals in [
        &mut summary.course,
        &mut summary.homework,
        &mut summary.learning,
        &mut summary.revision,
    ] {
        totals.hours = (totals.hours * 10.0).round() / 10.0;
    }
    summary
}
