use std::str::FromStr;

use chrono::{DateTime, Utc};
use pharmadesk_core::{AppError, AppResult, NonEmptyString, TenantId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// Emitted when an operator archives aged audit records on demand.
    AuditRetentionArchived,
    /// Emitted when an operator permanently purges archived audit records.
    AuditRetentionPurged,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuditRetentionArchived => "audit.retention.archived",
            Self::AuditRetentionPurged => "audit.retention.purged",
        }
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "audit.retention.archived" => Ok(Self::AuditRetentionArchived),
            "audit.retention.purged" => Ok(Self::AuditRetentionPurged),
            _ => Err(AppError::Validation(format!(
                "unknown audit action value '{value}'"
            ))),
        }
    }
}

/// Archive state of one audit record.
///
/// Purged records are not represented: they no longer exist in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveStatus {
    /// Record is visible in normal audit views.
    Active,
    /// Record is retained but hidden from active views.
    Archived {
        /// Moment the archival sweep marked the record.
        archived_at: DateTime<Utc>,
    },
}

/// Input payload for creating an audit log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogRecordInput {
    /// Tenant scope for the record.
    pub tenant_id: TenantId,
    /// Subject that performed the action.
    pub subject: String,
    /// Stable action identifier.
    pub action: String,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional event detail.
    pub detail: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// One immutable audit event with its archive timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogRecord {
    event_id: Uuid,
    tenant_id: TenantId,
    subject: NonEmptyString,
    action: NonEmptyString,
    resource_type: NonEmptyString,
    resource_id: String,
    detail: Option<String>,
    created_at: DateTime<Utc>,
    archived_at: Option<DateTime<Utc>>,
}

impl AuditLogRecord {
    /// Creates a new active record with a random identifier.
    pub fn new(input: AuditLogRecordInput) -> AppResult<Self> {
        Self::with_id(Uuid::new_v4(), input)
    }

    /// Creates an active record with a known identifier.
    pub fn with_id(event_id: Uuid, input: AuditLogRecordInput) -> AppResult<Self> {
        Ok(Self {
            event_id,
            tenant_id: input.tenant_id,
            subject: NonEmptyString::new("subject", input.subject)?,
            action: NonEmptyString::new("action", input.action)?,
            resource_type: NonEmptyString::new("resource_type", input.resource_type)?,
            resource_id: input.resource_id,
            detail: input.detail,
            created_at: input.created_at,
            archived_at: None,
        })
    }

    /// Returns the stable event identifier.
    #[must_use]
    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    /// Returns the tenant scope.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the acting subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the stable action identifier.
    #[must_use]
    pub fn action(&self) -> &str {
        self.action.as_str()
    }

    /// Returns the resource type label.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        self.resource_type.as_str()
    }

    /// Returns the resource identifier.
    #[must_use]
    pub fn resource_id(&self) -> &str {
        self.resource_id.as_str()
    }

    /// Returns the optional detail payload.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the archive timestamp, if the record was archived.
    #[must_use]
    pub fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
    }

    /// Returns the derived archive status.
    #[must_use]
    pub fn status(&self) -> ArchiveStatus {
        match self.archived_at {
            Some(archived_at) => ArchiveStatus::Archived { archived_at },
            None => ArchiveStatus::Active,
        }
    }

    /// Marks the record archived.
    ///
    /// Archival is one-directional: an archived record cannot be archived again.
    pub fn archive(&mut self, archived_at: DateTime<Utc>) -> AppResult<()> {
        if let Some(existing) = self.archived_at {
            return Err(AppError::Conflict(format!(
                "audit record '{}' was already archived at {}",
                self.event_id,
                existing.to_rfc3339()
            )));
        }

        self.archived_at = Some(archived_at);
        Ok(())
    }

    /// Returns whether the record is active and created strictly before `cutoff`.
    #[must_use]
    pub fn is_archivable_before(&self, cutoff: DateTime<Utc>) -> bool {
        self.archived_at.is_none() && self.created_at < cutoff
    }

    /// Returns whether the record was archived strictly before `cutoff`.
    #[must_use]
    pub fn is_purgeable_before(&self, cutoff: DateTime<Utc>) -> bool {
        self.archived_at
            .is_some_and(|archived_at| archived_at < cutoff)
    }
}
