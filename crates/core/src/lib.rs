//! Shared primitives for the Pharmadesk crates.

#![forbid(unsafe_code)]

/// Operator identity attached to administrative requests.
pub mod auth;
mod error;
mod tenant;
mod text;

pub use auth::OperatorIdentity;
pub use error::{AppError, AppResult};
pub use tenant::TenantId;
pub use text::NonEmptyString;
