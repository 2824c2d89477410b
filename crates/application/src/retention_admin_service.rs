use std::sync::Arc;

use pharmadesk_core::{AppError, AppResult, OperatorIdentity};
use pharmadesk_domain::{AuditAction, RetentionYears};

use crate::{
    ArchivalReport, AuditEvent, AuditRepository, PurgeReport, RetentionConfig,
    RetentionStatistics, RetentionSweeper,
};

/// Completed operator run plus the outcome of recording it in the audit log.
///
/// The retention change is committed before the audit event is appended, so a
/// failed append never turns a finished run into an error.
#[derive(Debug)]
pub struct AuditedRun<T> {
    /// Result of the committed retention run.
    pub report: T,
    /// Error raised while appending the audit event, if any.
    pub audit_error: Option<AppError>,
}

impl<T> AuditedRun<T> {
    /// Returns whether the run was recorded in the audit log.
    #[must_use]
    pub fn audit_recorded(&self) -> bool {
        self.audit_error.is_none()
    }
}

/// Application service for operator-triggered retention runs.
///
/// Every successful manual run is recorded in the audit log under the
/// operator's tenant.
#[derive(Clone)]
pub struct RetentionAdminService {
    sweeper: RetentionSweeper,
    audit_repository: Arc<dyn AuditRepository>,
}

impl RetentionAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(sweeper: RetentionSweeper, audit_repository: Arc<dyn AuditRepository>) -> Self {
        Self {
            sweeper,
            audit_repository,
        }
    }

    /// Returns the configured retention windows.
    #[must_use]
    pub fn config(&self) -> RetentionConfig {
        *self.sweeper.config()
    }

    /// Returns current archive statistics.
    pub async fn statistics(&self) -> AppResult<RetentionStatistics> {
        self.sweeper.statistics().await
    }

    /// Archives aged records and emits an audit event.
    pub async fn archive_aged_records(
        &self,
        actor: &OperatorIdentity,
        years_override: Option<RetentionYears>,
    ) -> AppResult<AuditedRun<ArchivalReport>> {
        let report = self.sweeper.run_manual_archival(years_override).await?;

        let audit_error = self
            .audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::AuditRetentionArchived,
                resource_type: "audit_log_entries".to_owned(),
                resource_id: report.cutoff.to_rfc3339(),
                detail: Some(format!(
                    "archived {} audit entries created before {} ({} year(s))",
                    report.archived_count,
                    report.cutoff.to_rfc3339(),
                    report.retention_years
                )),
            })
            .await
            .err();

        Ok(AuditedRun {
            report,
            audit_error,
        })
    }

    /// Permanently purges archived records and emits an audit event.
    pub async fn purge_archived_records(
        &self,
        actor: &OperatorIdentity,
        grace_years: Option<RetentionYears>,
    ) -> AppResult<AuditedRun<PurgeReport>> {
        let report = self.sweeper.purge_archived_records(grace_years).await?;

        let audit_error = self
            .audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::AuditRetentionPurged,
                resource_type: "audit_log_entries".to_owned(),
                resource_id: report.cutoff.to_rfc3339(),
                detail: Some(format!(
                    "purged {} audit entries archived before {} ({} year(s))",
                    report.deleted_count,
                    report.cutoff.to_rfc3339(),
                    report.grace_years
                )),
            })
            .await
            .err();

        Ok(AuditedRun {
            report,
            audit_error,
        })
    }
}
