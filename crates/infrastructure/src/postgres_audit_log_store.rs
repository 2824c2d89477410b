use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use pharmadesk_application::{AuditLogPredicate, AuditLogStore};
use pharmadesk_core::{AppError, AppResult};


/// PostgreSQL-backed store for set-based audit log retention operations.
#[derive(Clone)]
pub struct PostgresAuditLogStore {
    pool: PgPool,
}

impl PostgresAuditLogStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Bind values for the shared predicate clause.
///
/// Every query uses the same `WHERE` shape with nullable parameters so the
/// predicate never leaks into SQL text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PredicateBinds {
    archived: Option<bool>,
    created_before: Option<DateTime<Utc>>,
    archived_before: Option<DateTime<Utc>>,
}

impl From<AuditLogPredicate> for PredicateBinds {
    fn from(predicate: AuditLogPredicate) -> Self {
        match predicate {
            AuditLogPredicate::All => Self::default(),
            AuditLogPredicate::Active => Self {
                archived: Some(false),
                ..Self::default()
            },
            AuditLogPredicate::Archived => Self {
                archived: Some(true),
                ..Self::default()
            },
            AuditLogPredicate::ActiveCreatedBefore(cutoff) => Self {
                archived: Some(false),
                created_before: Some(cutoff),
                ..Self::default()
            },
            AuditLogPredicate::ArchivedBefore(cutoff) => Self {
                archived: Some(true),
                archived_before: Some(cutoff),
                ..Self::default()
            },
        }
    }
}

fn count_from_row(value: i64) -> AppResult<u64> {
    u64::try_from(value)
        .map_err(|_| AppError::Internal(format!("invalid audit log count '{value}'")))
}

#[async_trait]
impl AuditLogStore for PostgresAuditLogStore {
    async fn count_where(&self, predicate: AuditLogPredicate) -> AppResult<u64> {
        let binds = PredicateBinds::from(predicate);
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM audit_log_entries
            WHERE ($1::BOOLEAN IS NULL OR (archived_at IS NOT NULL) = $1)
                AND ($2::TIMESTAMPTZ IS NULL OR created_at < $2)
                AND ($3::TIMESTAMPTZ IS NULL OR archived_at < $3)
            "#,
        )
        .bind(binds.archived)
        .bind(binds.created_before)
        .bind(binds.archived_before)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to count audit log entries: {error}"))
        })?;

        count_from_row(count)
    }

    async fn archive_where(
        &self,
        predicate: AuditLogPredicate,
        archived_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let binds = PredicateBinds::from(predicate);
        let result = sqlx::query(
            r#"
            UPDATE audit_log_entries
            SET archived_at = $4
            WHERE archived_at IS NULL
                AND ($1::BOOLEAN IS NULL OR (archived_at IS NOT NULL) = $1)
                AND ($2::TIMESTAMPTZ IS NULL OR created_at < $2)
                AND ($3::TIMESTAMPTZ IS NULL OR archived_at < $3)
            "#,
        )
        .bind(binds.archived)
        .bind(binds.created_before)
        .bind(binds.archived_before)
        .bind(archived_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to archive audit log entries: {error}"))
        })?;

        debug!(
            rows_affected = result.rows_affected(),
            ?predicate,
            "archived audit log entries"
        );

        Ok(result.rows_affected())
    }

    async fn delete_where(&self, predicate: AuditLogPredicate) -> AppResult<u64> {
        let binds = PredicateBinds::from(predicate);
        let result = sqlx::query(
            r#"
            DELETE FROM audit_log_entries
            WHERE ($1::BOOLEAN IS NULL OR (archived_at IS NOT NULL) = $1)
                AND ($2::TIMESTAMPTZ IS NULL OR created_at < $2)
                AND ($3::TIMESTAMPTZ IS NULL OR archived_at < $3)
            "#,
        )
        .bind(binds.archived)
        .bind(binds.created_before)
        .bind(binds.archived_before)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete audit log entries: {error}"))
        })?;

        debug!(
            rows_affected = result.rows_affected(),
            ?predicate,
            "deleted audit log entries"
        );

        Ok(result.rows_affected())
    }
}
