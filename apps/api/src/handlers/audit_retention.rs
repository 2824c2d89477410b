use axum::Json;
use axum::extract::{Extension, State};
use pharmadesk_core::{AppError, OperatorIdentity};
use pharmadesk_domain::RetentionYears;
use tracing::{info, warn};

use crate::dto::{
    ArchiveAuditLogRequest, ArchiveAuditLogResponse, AuditRetentionStatisticsResponse,
    PurgeAuditLogRequest, PurgeAuditLogResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;


pub async fn audit_retention_statistics_handler(
    State(state): State<AppState>,
    Extension(_operator): Extension<OperatorIdentity>,
) -> ApiResult<Json<AuditRetentionStatisticsResponse>> {
    let statistics = state.retention_admin_service.statistics().await?;

    Ok(Json(AuditRetentionStatisticsResponse::new(
        statistics,
        state.retention_admin_service.config(),
    )))
}

pub async fn archive_audit_log_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    payload: Option<Json<ArchiveAuditLogRequest>>,
) -> ApiResult<Json<ArchiveAuditLogResponse>> {
    let payload = payload.map(|Json(payload)| payload).unwrap_or_default();
    let years_override = parse_years("retention_years", payload.retention_years)?;

    let run = state
        .retention_admin_service
        .archive_aged_records(&operator, years_override)
        .await
        .inspect_err(|error| {
            warn!(operator = operator.subject(), error = %error, "manual audit archival failed");
        })?;

    info!(
        operator = operator.subject(),
        archived_count = run.report.archived_count,
        retention_years = %run.report.retention_years,
        "manual audit archival completed"
    );
    if let Some(error) = &run.audit_error {
        warn!(
            operator = operator.subject(),
            error = %error,
            "manual audit archival was not recorded"
        );
    }

    Ok(Json(ArchiveAuditLogResponse::from(&run)))
}

pub async fn purge_audit_log_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    payload: Option<Json<PurgeAuditLogRequest>>,
) -> ApiResult<Json<PurgeAuditLogResponse>> {
    let payload = payload.map(|Json(payload)| payload).unwrap_or_default();
    let grace_years = parse_years("grace_years", payload.grace_years)?;

    let run = state
        .retention_admin_service
        .purge_archived_records(&operator, grace_years)
        .await
        .inspect_err(|error| {
            warn!(operator = operator.subject(), error = %error, "audit purge failed");
        })?;

    info!(
        operator = operator.subject(),
        deleted_count = run.report.deleted_count,
        grace_years = %run.report.grace_years,
        "audit purge completed"
    );
    if let Some(error) = &run.audit_error {
        warn!(operator = operator.subject(), error = %error, "audit purge was not recorded");
    }

    Ok(Json(PurgeAuditLogResponse::from(&run)))
}

fn parse_years(field: &str, value: Option<u32>) -> Result<Option<RetentionYears>, AppError> {
    value
        .map(|years| {
            u16::try_from(years)
                .map_err(|_| AppError::Validation(format!("{field} is out of range: {years}")))
                .and_then(RetentionYears::new)
        })
        .transpose()
}
