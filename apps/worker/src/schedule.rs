use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use tracing::{error, info, warn};

use pharmadesk_application::{RetentionSweeper, ScheduledArchivalOutcome};
use pharmadesk_core::{AppError, AppResult};
use pharmadesk_domain::resolve_local_datetime;

/// Runs the scheduled archival at the first moment of every calendar month.
///
/// Only returns when the next trigger cannot be computed.
pub async fn run_monthly_archival(sweeper: &RetentionSweeper) -> AppResult<()> {
    loop {
        let next_run = next_monthly_trigger(&Local::now())?;
        info!(next_run = %next_run.to_rfc3339(), "next scheduled audit archival");

        let wait = (next_run.with_timezone(&Utc) - Utc::now())
            .to_std()
            .unwrap_or_default();
        tokio::time::sleep(wait).await;

        let outcome = sweeper.run_scheduled_archival().await;
        log_scheduled_outcome(&outcome);
    }
}

/// Returns local midnight on the first day of the month after `now`.
pub fn next_monthly_trigger<Tz: TimeZone>(now: &DateTime<Tz>) -> AppResult<DateTime<Tz>> {
    let local = now.naive_local();
    let (year, month) = if local.month() == 12 {
        (local.year() + 1, 1)
    } else {
        (local.year(), local.month() + 1)
    };

    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            AppError::Internal(format!(
                "cannot compute first day of month {year}-{month:02}"
            ))
        })?;

    resolve_local_datetime(&now.timezone(), first_of_month)
}

/// Logs a scheduled archival outcome. Failures never propagate past this point.
pub fn log_scheduled_outcome(outcome: &ScheduledArchivalOutcome) {
    match outcome {
        ScheduledArchivalOutcome::Completed { report, statistics } => {
            info!(
                archived_count = report.archived_count,
                retention_years = %report.retention_years,
                cutoff = %report.cutoff.to_rfc3339(),
                "scheduled audit archival completed"
            );

            match statistics {
                Ok(statistics) => info!(
                    active_count = statistics.active_count,
                    archived_count = statistics.archived_count,
                    total_count = statistics.total_count,
                    "audit log retention statistics"
                ),
                Err(error) => warn!(
                    error = %error,
                    "failed to gather audit log retention statistics"
                ),
            }
        }
        ScheduledArchivalOutcome::Failed {
            retention_years,
            error,
        } => error!(
            retention_years = %retention_years,
            error = %error,
            detail = ?error,
            "scheduled audit archival failed"
        ),
    }
}
