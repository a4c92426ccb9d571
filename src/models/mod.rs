pub mod course;
pub mod homework;
pub mod slot;
pub mod subject;

pub use course::{Course, NewCourseRequest, UpdateCourseRequest};
pub use homework::{Homework, HomeworkStatus, NewHomeworkRequest, UpdateHomeworkStatusRequest};
pub use slot::{ActivityType, NewScheduleSlot, ScheduleSlot};
pub use subject::{LearningSubject, NewSubjectRequest};
