//! Pharmadesk API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use pharmadesk_application::{RetentionAdminService, RetentionSweeper, SystemClock};
use pharmadesk_core::AppError;
use pharmadesk_infrastructure::{PostgresAuditLogStore, PostgresAuditRepository};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;
    let pool = connect_and_migrate(config.database_url.as_str()).await?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let sweeper = RetentionSweeper::new(
        Arc::new(PostgresAuditLogStore::new(pool.clone())),
        Arc::new(SystemClock),
        config.retention,
    );
    let app_state = AppState {
        retention_admin_service: RetentionAdminService::new(
            sweeper,
            Arc::new(PostgresAuditRepository::new(pool)),
        ),
        admin_shared_secret: Arc::from(config.admin_shared_secret.as_str()),
        operations_tenant_id: config.operations_tenant_id,
    };

    let app = api_router::build_router(app_state);
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind API listener: {error}")))?;

    info!(%address, "pharmadesk-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("API server failed: {error}")))
}

async fn connect_and_migrate(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    Ok(pool)
}
