use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState) -> Router {
    let admin_routes = Router::new()
        .route(
            "/api/admin/audit-retention/statistics",
            get(handlers::audit_retention::audit_retention_statistics_handler),
        )
        .route(
            "/api/admin/audit-retention/archive",
            post(handlers::audit_retention::archive_audit_log_handler),
        )
        .route(
            "/api/admin/audit-retention/purge",
            post(handlers::audit_retention::purge_audit_log_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_admin_auth,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
