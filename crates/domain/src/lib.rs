//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod retention;

pub use audit::{ArchiveStatus, AuditAction, AuditLogRecord, AuditLogRecordInput};
pub use retention::{
    DEFAULT_ARCHIVE_GRACE_YEARS, DEFAULT_RETENTION_YEARS, MAX_RETENTION_YEARS, RetentionYears,
    resolve_local_datetime, subtract_calendar_years,
};
