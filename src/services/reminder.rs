use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::clock;
use crate::config::NotificationConfig;
use crate::db::repository;
use crate::error::AppError;
use crate::models::ScheduleSlot;

/// Delivery channel for reminders. The production impl just logs; tests
/// plug in a recorder.
pub trait Notifier: Send + Sync {
    fn notify(&self, slot: &ScheduleSlot, minutes_until: i64);
}

pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, slot: &ScheduleSlot, minutes_until: i64) {
        if minutes_until == 0 {
            info!(
                "reminder: {:?} '{}' starts now",
                slot.activity_type, slot.subject
            );
        } else {
            info!(
                "reminder: {:?} '{}' starts in {} min",
                slot.activity_type, slot.subject, minutes_until
            );
        }
    }
}

/// Background reminder poller. Wakes on a fixed cadence, looks for
/// today's slots starting within the advance window that have not fired
/// yet, notifies each once and flips its flag. Read-only apart from that
/// flag, so it never contends with the generator.
pub struct ReminderScheduler {
    db: SqlitePool,
    notifier: Arc<dyn Notifier>,
    config: NotificationConfig,
}

impl ReminderScheduler {
    pub fn new(db: SqlitePool, notifier: Arc<dyn Notifier>, config: NotificationConfig) -> Self {
        Self {
            db,
            notifier,
            config,
        }
    }

    /// Polls until the task is dropped. Errors are logged and the loop
    /// continues.
    pub async fn start(self) {
        if !self.config.enabled {
            info!("reminders disabled");
            return;
        }

        info!(
            "starting reminder scheduler (interval: {}s, advance: {} min)",
            self.config.poll_interval_secs, self.config.advance_minutes
        );

        loop {
            tokio::time::sleep(Duration::from_secs(self.config.poll_interval_secs)).await;

            match self.tick(Local::now().naive_local()).await {
                Ok(fired) if fired > 0 => info!("fired {} reminders", fired),
                Ok(_) => {}
                Err(e) => warn!("reminder check failed: {:?}", e),
            }
        }
    }

    /// One poll pass; `now` is injected so tests can pin the clock.
    /// Returns how many reminders fired.
    pub async fn tick(&self, now: NaiveDateTime) -> Result<usize, AppError> {
        let now_minutes = i64::from(clock::to_minutes(now.time()));
        let window_end =
            clock::from_minutes((now_minutes + self.config.advance_minutes + 1) as u32);

        let due =
            repository::fetch_due_reminders(&self.db, now.date(), now.time(), window_end).await?;

        let mut fired = 0;
        for slot in due {
            let minutes_until = i64::from(clock::to_minutes(slot.start_time)) - now_minutes;
            if (0..=self.config.advance_minutes).contains(&minutes_until) {
                self.notifier.notify(&slot, minutes_until);
                repository::mark_slot_notified(&self.db, slot.id).await?;
                fired += 1;
            }
        }

        Ok(fired)
    }
}
