use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use pharmadesk_application::RetentionConfig;
use pharmadesk_core::{AppError, TenantId};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub admin_shared_secret: String,
    pub operations_tenant_id: TenantId,
    pub retention: RetentionConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = match env::var("API_PORT") {
            Ok(value) => value.trim().parse::<u16>().map_err(|error| {
                AppError::Validation(format!("invalid API_PORT value '{value}': {error}"))
            })?,
            Err(_) => 3001,
        };

        let admin_shared_secret = required_non_empty_env("ADMIN_SHARED_SECRET")?;
        if admin_shared_secret.len() < 32 {
            return Err(AppError::Validation(
                "ADMIN_SHARED_SECRET must be at least 32 characters".to_owned(),
            ));
        }

        let operations_tenant_id = required_non_empty_env("OPERATIONS_TENANT_ID")
            .and_then(|value| parse_tenant_id("OPERATIONS_TENANT_ID", value.as_str()))?;

        let retention = RetentionConfig::from_raw(
            env::var("AUDIT_RETENTION_YEARS").ok().as_deref(),
            env::var("AUDIT_ARCHIVE_GRACE_YEARS").ok().as_deref(),
        )?;

        Ok(Self {
            migrate_only,
            database_url,
            api_host,
            api_port,
            admin_shared_secret,
            operations_tenant_id,
            retention,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_tenant_id(name: &str, value: &str) -> Result<TenantId, AppError> {
    value
        .parse::<TenantId>()
        .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
