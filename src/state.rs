use sqlx::SqlitePool;

use crate::config::PlanningConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub planning: PlanningConfig,
}
