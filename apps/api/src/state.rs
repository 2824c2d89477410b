use std::sync::Arc;

use pharmadesk_application::RetentionAdminService;
use pharmadesk_core::TenantId;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub retention_admin_service: RetentionAdminService,
    pub admin_shared_secret: Arc<str>,
    pub operations_tenant_id: TenantId,
}
