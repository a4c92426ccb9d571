use chrono::NaiveDate;

use crate::clock;
use crate::config::PlanningConfig;
use crate::models::Course;

/// Half-open `[start, end)` span in minutes since midnight.
pub type MinuteSpan = (u32, u32);

/// Computes the free spans of a day: the complement, within the
/// configured day window, of that day's courses plus the two fixed meal
/// breaks. The result is sorted, pairwise disjoint and possibly empty.
pub fn free_intervals(
    date: NaiveDate,
    courses: &[Course],
    config: &PlanningConfig,
) -> Vec<MinuteSpan> {
    let day_start = clock::to_minutes(config.day_start);
    let day_end = clock::to_minutes(config.day_end);

    let mut occupied: Vec<MinuteSpan> = courses
        .iter()
        .filter(|course| course.week_date == date)
        .map(|course| {
            (
                clock::to_minutes(course.start_time),
                clock::to_minutes(course.end_time),
            )
        })
        .collect();

    // Meal breaks block out the same spans every day.
    occupied.push((
        clock::to_minutes(config.lunch_break.0),
        clock::to_minutes(config.lunch_break.1),
    ));
    occupied.push((
        clock::to_minutes(config.dinner_break.0),
        clock::to_minutes(config.dinner_break.1),
    ));

    occupied.sort_unstable();

    let mut merged: Vec<MinuteSpan> = Vec::new();
    for (start, end) in occupied {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    let mut free = Vec::new();
    let mut current = day_start;
    for (start, end) in merged {
        if current < start {
            free.push((current, start));
        }
        current = current.max(end);
    }
    if current < day_end {
        free.push((current, day_end));
    }

    free
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    fn course(day: u32, start: &str, end: &str) -> Course {
        Course {
            id: 0,
            name: "Test".to_string(),
            day_of_week: clock::day_name(date(day)).to_string(),
            start_time: clock::parse_clock(start).unwrap(),
            end_time: clock::parse_clock(end).unwrap(),
            week_date: date(day),
            revised: false,
        }
    }

    #[test]
    fn empty_day_is_window_minus_meal_breaks() {
        let free = free_intervals(date(1), &[], &PlanningConfig::default());
        assert_eq!(free, vec![(360, 720), (780, 1140), (1200, 1380)]);
    }

    #[test]
    fn single_course_splits_the_morning() {
        let courses = vec![course(1, "09:00", "11:00")];
        let free = free_intervals(date(1), &courses, &PlanningConfig::default());
        assert_eq!(free, vec![(360, 540), (660, 720), (780, 1140), (1200, 1380)]);
    }

    #[test]
    fn courses_on_other_days_are_ignored() {
        let courses = vec![course(2, "09:00", "11:00")];
        let free = free_intervals(date(1), &courses, &PlanningConfig::default());
        assert_eq!(free, vec![(360, 720), (780, 1140), (1200, 1380)]);
    }

    #[test]
    fn overlapping_and_touching_courses_merge() {
        let courses = vec![
            course(1, "08:00", "10:00"),
            course(1, "09:30", "11:00"),
            course(1, "11:00", "12:00"),
        ];
        let free = free_intervals(date(1), &courses, &PlanningConfig::default());
        // 08:00-12:00 merges straight into lunch.
        assert_eq!(free, vec![(360, 480), (780, 1140), (1200, 1380)]);
    }

    #[test]
    fn course_spanning_a_meal_break_absorbs_it() {
        let courses = vec![course(1, "11:00", "14:00")];
        let free = free_intervals(date(1), &courses, &PlanningConfig::default());
        assert_eq!(free, vec![(360, 660), (840, 1140), (1200, 1380)]);
    }

    #[test]
    fn course_starting_before_the_window_trims_the_morning() {
        let courses = vec![course(1, "05:00", "07:00")];
        let free = free_intervals(date(1), &courses, &PlanningConfig::default());
        assert_eq!(free, vec![(420, 720), (780, 1140), (1200, 1380)]);
    }

    #[test]
    fn intervals_are_disjoint_and_sorted() {
        let courses = vec![
            course(1, "07:00", "09:00"),
            course(1, "10:00", "11:30"),
            course(1, "15:00", "17:00"),
        ];
        let free = free_intervals(date(1), &courses, &PlanningConfig::default());
        for window in free.windows(2) {
            assert!(window[0].1 < window[1].0);
        }
        for (start, end) in free {
            assert!(start < end);
        }
    }
}
