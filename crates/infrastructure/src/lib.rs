//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_audit_log_store;
mod postgres_audit_log_store;
mod postgres_audit_repository;

pub use in_memory_audit_log_store::InMemoryAuditLogStore;
pub use postgres_audit_log_store::PostgresAuditLogStore;
pub use postgres_audit_repository::PostgresAuditRepository;
