//! Pharmadesk audit retention worker runtime.

#![forbid(unsafe_code)]

mod schedule;

use std::env;
use std::sync::Arc;

use pharmadesk_application::{RetentionConfig, RetentionSweeper, SystemClock};
use pharmadesk_core::{AppError, AppResult};
use pharmadesk_infrastructure::PostgresAuditLogStore;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct WorkerConfig {
    database_url: String,
    retention: RetentionConfig,
    run_on_start: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let pool = connect_pool(config.database_url.as_str()).await?;
    let sweeper = build_retention_sweeper(pool, config.retention);

    info!(
        retention_years = %config.retention.retention_years,
        archive_grace_years = %config.retention.archive_grace_years,
        run_on_start = config.run_on_start,
        "pharmadesk-worker started"
    );

    if config.run_on_start {
        let outcome = sweeper.run_scheduled_archival().await;
        schedule::log_scheduled_outcome(&outcome);
    }

    schedule::run_monthly_archival(&sweeper).await
}

async fn connect_pool(database_url: &str) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

fn build_retention_sweeper(pool: PgPool, config: RetentionConfig) -> RetentionSweeper {
    let audit_log_store = Arc::new(PostgresAuditLogStore::new(pool));
    RetentionSweeper::new(audit_log_store, Arc::new(SystemClock), config)
}

impl WorkerConfig {
    fn load() -> AppResult<Self> {
        let database_url = required_env("DATABASE_URL")?;
        let retention = RetentionConfig::from_raw(
            env::var("AUDIT_RETENTION_YEARS").ok().as_deref(),
            env::var("AUDIT_ARCHIVE_GRACE_YEARS").ok().as_deref(),
        )?;
        let run_on_start = parse_env_bool("RETENTION_RUN_ON_START", false)?;

        Ok(Self {
            database_url,
            retention,
            run_on_start,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn parse_env_bool(name: &str, default: bool) -> AppResult<bool> {
    match env::var(name) {
        Ok(value) => value.trim().parse::<bool>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
