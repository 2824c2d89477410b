//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_ports;
mod retention_admin_service;
mod retention_ports;
mod retention_service;

pub use audit_ports::{AuditEvent, AuditRepository};
pub use retention_admin_service::{AuditedRun, RetentionAdminService};
pub use retention_ports::{AuditLogPredicate, AuditLogStore, Clock, SystemClock};
pub use retention_service::{
    ArchivalReport, PurgeReport, RetentionConfig, RetentionStatistics, RetentionSweeper,
    ScheduledArchivalOutcome,
};
