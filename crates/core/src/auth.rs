use crate::{AppResult, NonEmptyString, TenantId};

/// Operator running a manual retention action, scoped to the tenant whose
/// audit trail records it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorIdentity {
    subject: NonEmptyString,
    tenant_id: TenantId,
}

impl OperatorIdentity {
    /// Creates an operator identity from a non-blank subject.
    pub fn new(subject: impl Into<String>, tenant_id: TenantId) -> AppResult<Self> {
        Ok(Self {
            subject: NonEmptyString::new("operator subject", subject)?,
            tenant_id,
        })
    }

    /// Returns the operator subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the tenant that records this operator's audit events.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}
