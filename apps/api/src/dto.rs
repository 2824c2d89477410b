use pharmadesk_application::{
    ArchivalReport, AuditedRun, PurgeReport, RetentionConfig, RetentionStatistics,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    pub message: String,
}

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Archive state counts plus the configured retention windows.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-retention-statistics-response.ts"
)]
pub struct AuditRetentionStatisticsResponse {
    pub active_count: u64,
    pub archived_count: u64,
    pub total_count: u64,
    pub retention_years: u16,
    pub archive_grace_years: u16,
}

impl AuditRetentionStatisticsResponse {
    pub fn new(statistics: RetentionStatistics, config: RetentionConfig) -> Self {
        Self {
            active_count: statistics.active_count,
            archived_count: statistics.archived_count,
            total_count: statistics.total_count,
            retention_years: config.retention_years.get(),
            archive_grace_years: config.archive_grace_years.get(),
        }
    }
}

/// Incoming payload for a manual archival run. The body may be omitted.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/archive-audit-log-request.ts"
)]
#[serde(default)]
pub struct ArchiveAuditLogRequest {
    pub retention_years: Option<u32>,
}

/// Result of a manual archival run.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/archive-audit-log-response.ts"
)]
pub struct ArchiveAuditLogResponse {
    pub retention_years: u16,
    pub cutoff: String,
    pub archived_at: String,
    pub archived_count: u64,
    pub audit_recorded: bool,
}

impl From<&AuditedRun<ArchivalReport>> for ArchiveAuditLogResponse {
    fn from(value: &AuditedRun<ArchivalReport>) -> Self {
        Self {
            retention_years: value.report.retention_years.get(),
            cutoff: value.report.cutoff.to_rfc3339(),
            archived_at: value.report.archived_at.to_rfc3339(),
            archived_count: value.report.archived_count,
            audit_recorded: value.audit_recorded(),
        }
    }
}

/// Incoming payload for a purge run. The body may be omitted.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/purge-audit-log-request.ts"
)]
#[serde(default)]
pub struct PurgeAuditLogRequest {
    pub grace_years: Option<u32>,
}

/// Result of a purge run.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/purge-audit-log-response.ts"
)]
pub struct PurgeAuditLogResponse {
    pub grace_years: u16,
    pub cutoff: String,
    pub deleted_count: u64,
    pub audit_recorded: bool,
}

impl From<&AuditedRun<PurgeReport>> for PurgeAuditLogResponse {
    fn from(value: &AuditedRun<PurgeReport>) -> Self {
        Self {
            grace_years: value.report.grace_years.get(),
            cutoff: value.report.cutoff.to_rfc3339(),
            deleted_count: value.report.deleted_count,
            audit_recorded: value.audit_recorded(),
        }
    }
}
