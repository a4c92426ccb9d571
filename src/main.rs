use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use learning_planner::api::router;
use learning_planner::config::{NotificationConfig, PlanningConfig};
use learning_planner::db::repository;
use learning_planner::services::{LogNotifier, ReminderScheduler};
use learning_planner::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "learning_planner=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://planner.db?mode=rwc".to_string());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let seeded = repository::seed_default_subjects(&pool).await?;
    if seeded > 0 {
        info!("seeded {} default study subjects", seeded);
    }

    let planning = PlanningConfig::from_env()?;
    let notifications = NotificationConfig::from_env()?;

    let reminder = ReminderScheduler::new(pool.clone(), Arc::new(LogNotifier), notifications);
    tokio::spawn(reminder.start());

    let state = AppState {
        db: pool.clone(),
        planning,
    };

    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
