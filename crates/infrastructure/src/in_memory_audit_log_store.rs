use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use pharmadesk_application::{AuditEvent, AuditLogPredicate, AuditLogStore, AuditRepository};
use pharmadesk_core::AppResult;
use pharmadesk_domain::{AuditLogRecord, AuditLogRecordInput};

/// In-memory audit log store implementation.
#[derive(Debug, Default)]
pub struct InMemoryAuditLogStore {
    records: RwLock<Vec<AuditLogRecord>>,
}

impl InMemoryAuditLogStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Stores a record as-is, including any archive timestamp it carries.
    pub async fn insert(&self, record: AuditLogRecord) {
        self.records.write().await.push(record);
    }

    /// Returns a snapshot of all stored records in insertion order.
    pub async fn records(&self) -> Vec<AuditLogRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl AuditLogStore for InMemoryAuditLogStore {
    async fn count_where(&self, predicate: AuditLogPredicate) -> AppResult<u64> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| predicate.matches(record))
            .count() as u64)
    }

    async fn archive_where(
        &self,
        predicate: AuditLogPredicate,
        archived_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let mut archived_count = 0;

        for record in records
            .iter_mut()
            .filter(|record| record.archived_at().is_none() && predicate.matches(record))
        {
            record.archive(archived_at)?;
            archived_count += 1;
        }

        Ok(archived_count)
    }

    async fn delete_where(&self, predicate: AuditLogPredicate) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| !predicate.matches(record));

        Ok((before - records.len()) as u64)
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditLogStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let record = AuditLogRecord::new(AuditLogRecordInput {
            tenant_id: event.tenant_id,
            subject: event.subject,
            action: event.action.as_str().to_owned(),
            resource_type: event.resource_type,
            resource_id: event.resource_id,
            detail: event.detail,
            created_at: Utc::now(),
        })?;

        self.insert(record).await;
        Ok(())
    }
}
