use thiserror::Error;

/// Result type used across Pharmadesk crates.
pub type AppResult<T> = Result<T, AppError>;

/// Error categories surfaced by retention services and their adapters.
#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected input or configuration value.
    #[error("validation error: {0}")]
    Validation(String),

    /// State transition that is not allowed for the current record state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing or invalid administrative credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Store, clock or runtime failure.
    #[error("internal error: {0}")]
    Internal(String),
}
