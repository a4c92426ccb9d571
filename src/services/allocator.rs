use std::collections::VecDeque;

use chrono::NaiveDate;

use crate::clock;
use crate::config::PlanningConfig;
use crate::models::{ActivityType, Course, Homework, LearningSubject, NewScheduleSlot};
use crate::services::slots::MinuteSpan;

/// Free intervals shorter than this are left unplanned.
pub const MIN_USABLE_SLOT_MINUTES: u32 = 60;

/// Revision sessions are only placed on the first four day offsets of
/// the week (Monday through Thursday).
const REVISION_LAST_DAY_OFFSET: u32 = 4;

/// Week-level backlog threaded through every day's allocation pass.
/// Consuming a homework item or popping a revision course here removes it
/// for the rest of the week; `cursor` keeps the study rotation fair
/// across days.
#[derive(Debug, Default)]
pub struct Backlog {
    pub homework: Vec<Homework>,
    pub revision: VecDeque<Course>,
    pub subjects: Vec<LearningSubject>,
    pub cursor: usize,
}

/// One day's allocation result: the sessions to persist plus the side
/// effects the generator applies through the store.
#[derive(Debug, Default)]
pub struct DayPlan {
    pub sessions: Vec<NewScheduleSlot>,
    pub revised_courses: Vec<i64>,
    /// (subject name, scheduled hours) per learning session.
    pub study_credits: Vec<(String, f64)>,
}

/// Fills a day's free intervals with fixed-length sessions, picking the
/// highest-priority pending activity for each: urgent homework first,
/// then revision (early week only), then the rotating study subjects.
/// The time pointer advances by session + break after every placement,
/// and also when every pool is empty, so exhausted backlogs leave gaps
/// rather than loop.
pub fn fill_free_time(
    date: NaiveDate,
    day_offset: u32,
    free: &[MinuteSpan],
    backlog: &mut Backlog,
    config: &PlanningConfig,
) -> DayPlan {
    let mut plan = DayPlan::default();

    for &(slot_start, slot_end) in free {
        if slot_end - slot_start < MIN_USABLE_SLOT_MINUTES {
            continue;
        }

        let mut current = slot_start;
        while current + config.session_duration <= slot_end {
            let session_start = clock::from_minutes(current);
            let session_end = clock::from_minutes(current + config.session_duration);

            if let Some(index) = next_urgent_homework(&backlog.homework, date, config) {
                let homework = backlog.homework.remove(index);
                plan.sessions.push(NewScheduleSlot {
                    date,
                    start_time: session_start,
                    end_time: session_end,
                    activity_type: ActivityType::Homework,
                    subject: homework.subject.clone(),
                    description: format!("Homework prep: {}", homework.subject),
                });
            } else {
                let revision_course = if day_offset < REVISION_LAST_DAY_OFFSET {
                    backlog.revision.pop_front()
                } else {
                    None
                };
                match revision_course {
                    Some(course) => {
                        plan.sessions.push(NewScheduleSlot {
                            date,
                            start_time: session_start,
                            end_time: session_end,
                            activity_type: ActivityType::Revision,
                            subject: course.name.clone(),
                            description: format!("Revision: {}", course.name),
                        });
                        plan.revised_courses.push(course.id);
                    }
                    None if !backlog.subjects.is_empty() => {
                        let subject = &backlog.subjects[backlog.cursor % backlog.subjects.len()];
                        plan.sessions.push(NewScheduleSlot {
                            date,
                            start_time: session_start,
                            end_time: session_end,
                            activity_type: ActivityType::Learning,
                            subject: subject.name.clone(),
                            description: format!("Study: {}", subject.name),
                        });
                        plan.study_credits.push((
                            subject.name.clone(),
                            f64::from(config.session_duration) / 60.0,
                        ));
                        backlog.cursor += 1;
                    }
                    // Every pool is empty: leave the gap and move on.
                    None => {}
                }
            }

            current += config.session_duration + config.break_duration;
        }
    }

    plan
}

/// First homework in current backlog order whose deadline falls inside
/// the preparation window of `date`. First match wins; there is no
/// secondary sort.
fn next_urgent_homework(
    homework: &[Homework],
    date: NaiveDate,
    config: &PlanningConfig,
) -> Option<usize> {
    homework.iter().position(|hw| {
        let days_until_due = (hw.due_date - date).num_days();
        days_until_due >= 0 && days_until_due <= config.homework_preparation_days
    })
}
