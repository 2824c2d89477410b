//! Audit log retention sweeper.
//!
//! Archives records older than the retention window on a monthly schedule and
//! permanently purges records that stayed archived past the grace period when
//! an operator asks for it. Purging never runs from the schedule.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};

use pharmadesk_core::{AppError, AppResult};
use pharmadesk_domain::{RetentionYears, subtract_calendar_years};

use crate::retention_ports::{AuditLogPredicate, AuditLogStore, Clock};

mod archival;
mod config;
mod purge;
mod statistics;

#[cfg(test)]
mod tests;

pub use archival::{ArchivalReport, ScheduledArchivalOutcome};
pub use config::RetentionConfig;
pub use purge::PurgeReport;
pub use statistics::RetentionStatistics;

/// Application service applying audit log retention windows.
#[derive(Clone)]
pub struct RetentionSweeper {
    store: Arc<dyn AuditLogStore>,
    clock: Arc<dyn Clock>,
    config: RetentionConfig,
}

impl RetentionSweeper {
    /// Creates a sweeper from required dependencies.
    #[must_use]
    pub fn new(
        store: Arc<dyn AuditLogStore>,
        clock: Arc<dyn Clock>,
        config: RetentionConfig,
    ) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Returns the process-wide retention configuration.
    #[must_use]
    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    fn cutoff(now: &DateTime<Local>, years: RetentionYears) -> AppResult<DateTime<Utc>> {
        subtract_calendar_years(now, years).map(|cutoff| cutoff.with_timezone(&Utc))
    }
}
