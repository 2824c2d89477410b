use super::*;

/// Result of one purge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeReport {
    /// Grace period applied by this run.
    pub grace_years: RetentionYears,
    /// Records archived before this instant were deleted.
    pub cutoff: DateTime<Utc>,
    /// Number of permanently deleted records.
    pub deleted_count: u64,
}

impl RetentionSweeper {
    /// Permanently deletes records archived longer than the grace period.
    ///
    /// `grace_years` defaults to the configured grace period. Deletion is
    /// irreversible and store failures propagate to the caller.
    pub async fn purge_archived_records(
        &self,
        grace_years: Option<RetentionYears>,
    ) -> AppResult<PurgeReport> {
        let grace_years = grace_years.unwrap_or(self.config.archive_grace_years);
        let now = self.clock.now();
        let cutoff = Self::cutoff(&now, grace_years)?;

        let deleted_count = self
            .store
            .delete_where(AuditLogPredicate::ArchivedBefore(cutoff))
            .await?;

        Ok(PurgeReport {
            grace_years,
            cutoff,
            deleted_count,
        })
    }
}
