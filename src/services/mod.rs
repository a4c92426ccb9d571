pub mod allocator;
pub mod reminder;
pub mod scheduler;
pub mod slots;

pub use reminder::{LogNotifier, Notifier, ReminderScheduler};
pub use scheduler::ScheduleService;
