use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};

use pharmadesk_core::AppResult;
use pharmadesk_domain::AuditLogRecord;

/// Record selection understood by audit log stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLogPredicate {
    /// Every stored record.
    All,
    /// `archived_at IS NULL`.
    Active,
    /// `archived_at IS NOT NULL`.
    Archived,
    /// `created_at < cutoff AND archived_at IS NULL`.
    ActiveCreatedBefore(DateTime<Utc>),
    /// `archived_at IS NOT NULL AND archived_at < cutoff`.
    ArchivedBefore(DateTime<Utc>),
}

impl AuditLogPredicate {
    /// Evaluates the predicate against one record.
    #[must_use]
    pub fn matches(&self, record: &AuditLogRecord) -> bool {
        match self {
            Self::All => true,
            Self::Active => record.archived_at().is_none(),
            Self::Archived => record.archived_at().is_some(),
            Self::ActiveCreatedBefore(cutoff) => record.is_archivable_before(*cutoff),
            Self::ArchivedBefore(cutoff) => record.is_purgeable_before(*cutoff),
        }
    }
}

/// Repository port for set-based audit log retention operations.
#[async_trait]
pub trait AuditLogStore: Send + Sync {
    /// Counts records matching the predicate.
    async fn count_where(&self, predicate: AuditLogPredicate) -> AppResult<u64>;

    /// Sets `archived_at` on matching records and returns the affected count.
    ///
    /// Records that already carry an archive timestamp are never touched.
    async fn archive_where(
        &self,
        predicate: AuditLogPredicate,
        archived_at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Permanently deletes matching records and returns the deleted count.
    async fn delete_where(&self, predicate: AuditLogPredicate) -> AppResult<u64>;
}

/// Source of the current server-local time.
pub trait Clock: Send + Sync {
    /// Returns the current instant in the server time zone.
    fn now(&self) -> DateTime<Local>;
}

/// Clock backed by the operating system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
