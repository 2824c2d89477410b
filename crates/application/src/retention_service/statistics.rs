use super::*;

/// Observability snapshot of the audit log archive state.
///
/// The counts are read independently and may disagree by a few records while
/// writers are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionStatistics {
    /// Records without an archive timestamp.
    pub active_count: u64,
    /// Records with an archive timestamp.
    pub archived_count: u64,
    /// All stored records.
    pub total_count: u64,
}

impl RetentionSweeper {
    /// Counts active, archived and total records.
    pub async fn statistics(&self) -> AppResult<RetentionStatistics> {
        let (active_count, archived_count, total_count) = tokio::try_join!(
            self.store.count_where(AuditLogPredicate::Active),
            self.store.count_where(AuditLogPredicate::Archived),
            self.store.count_where(AuditLogPredicate::All),
        )?;

        Ok(RetentionStatistics {
            active_count,
            archived_count,
            total_count,
        })
    }
}
