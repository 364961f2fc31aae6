use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::seed::{seed_catalog, seed_demo_data};
use crate::state::AppState;
use crate::infra::repositories::{
    memory_repo::{MemoryBookingRepo, MemoryResourceRepo, MemoryUserRepo},
    sqlite_booking_repo::SqliteBookingRepo,
    sqlite_resource_repo::SqliteResourceRepo,
    sqlite_user_repo::SqliteUserRepo,
};

pub const MEMORY_URL: &str = "memory://";

pub async fn bootstrap_state(config: &Config) -> AppState {
    let state = if config.database_url.starts_with(MEMORY_URL) {
        info!("Using in-memory storage; data is lost on restart");

        AppState::new(
            config.clone(),
            Arc::new(MemoryResourceRepo::default()),
            Arc::new(MemoryUserRepo::default()),
            Arc::new(MemoryBookingRepo::default()),
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let pool = connect_sqlite(&config.database_url).await;
        run_sqlite_migrations(&pool).await;

        AppState::new(
            config.clone(),
            Arc::new(SqliteResourceRepo::new(pool.clone())),
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteBookingRepo::new(pool.clone())),
        )
    };

    seed_catalog(state.resource_repo.as_ref())
        .await
        .expect("Failed to seed resource catalog");

    if config.seed_demo_data {
        seed_demo_data(config.timezone, state.user_repo.as_ref(), state.booking_repo.as_ref())
            .await
            .expect("Failed to seed demo data");
    }

    state
}

async fn connect_sqlite(database_url: &str) -> SqlitePool {
    let opts = SqliteConnectOptions::from_str(database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true)
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite")
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
