use super::*;

/// Result of one archival sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchivalReport {
    /// Retention window applied by this run.
    pub retention_years: RetentionYears,
    /// Records created before this instant were eligible.
    pub cutoff: DateTime<Utc>,
    /// Archive timestamp written to every affected record.
    pub archived_at: DateTime<Utc>,
    /// Number of records moved from active to archived.
    pub archived_count: u64,
}

/// Outcome of the scheduled archival run.
///
/// The scheduled path never returns an error: failures are carried as values
/// for the scheduler to log.
#[derive(Debug)]
pub enum ScheduledArchivalOutcome {
    /// Archival succeeded. Statistics are gathered afterwards and may fail on their own.
    Completed {
        /// Archival result.
        report: ArchivalReport,
        /// Post-archival statistics, or the error raised while counting.
        statistics: Result<RetentionStatistics, AppError>,
    },
    /// Archival itself failed and nothing is known about affected records.
    Failed {
        /// Retention window the run attempted to apply.
        retention_years: RetentionYears,
        /// Cause reported by the store or cutoff computation.
        error: AppError,
    },
}

impl ScheduledArchivalOutcome {
    /// Returns the number of archived records, or zero when the run failed.
    #[must_use]
    pub fn archived_count(&self) -> u64 {
        match self {
            Self::Completed { report, .. } => report.archived_count,
            Self::Failed { .. } => 0,
        }
    }

    /// Returns whether the archival step failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl RetentionSweeper {
    /// Runs the monthly archival with the configured retention window.
    ///
    /// Store failures are captured in the returned outcome.
    pub async fn run_scheduled_archival(&self) -> ScheduledArchivalOutcome {
        let retention_years = self.config.retention_years;

        let report = match self.archive_older_than(retention_years).await {
            Ok(report) => report,
            Err(error) => {
                return ScheduledArchivalOutcome::Failed {
                    retention_years,
                    error,
                };
            }
        };

        ScheduledArchivalOutcome::Completed {
            report,
            statistics: self.statistics().await,
        }
    }

    /// Archives aged records on demand.
    ///
    /// `years_override` replaces the configured retention window for this call
    /// only. Store failures propagate to the caller.
    pub async fn run_manual_archival(
        &self,
        years_override: Option<RetentionYears>,
    ) -> AppResult<ArchivalReport> {
        let retention_years = years_override.unwrap_or(self.config.retention_years);
        self.archive_older_than(retention_years).await
    }

    async fn archive_older_than(
        &self,
        retention_years: RetentionYears,
    ) -> AppResult<ArchivalReport> {
        let now = self.clock.now();
        let cutoff = Self::cutoff(&now, retention_years)?;
        let archived_at = now.with_timezone(&Utc);

        let archived_count = self
            .store
            .archive_where(AuditLogPredicate::ActiveCreatedBefore(cutoff), archived_at)
            .await?;

        Ok(ArchivalReport {
            retention_years,
            cutoff,
            archived_at,
            archived_count,
        })
    }
}
