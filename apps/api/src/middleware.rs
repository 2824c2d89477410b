use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use pharmadesk_core::{AppError, OperatorIdentity};
use subtle::ConstantTimeEq;

use crate::error::ApiResult;
use crate::state::AppState;

/// Header naming the operator on whose behalf an admin request runs.
pub const OPERATOR_HEADER: &str = "x-pharmadesk-operator";

pub async fn require_admin_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let operator = authenticate_operator(request.headers(), &state)?;

    request.extensions_mut().insert(operator);
    Ok(next.run(request).await)
}

pub(crate) fn authenticate_operator(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<OperatorIdentity, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(|| AppError::Unauthorized("admin bearer token is required".to_owned()))?;

    let secret_matches: bool = token
        .as_bytes()
        .ct_eq(state.admin_shared_secret.as_bytes())
        .into();
    if !secret_matches {
        return Err(AppError::Unauthorized("invalid admin bearer token".to_owned()));
    }

    let subject = headers
        .get(OPERATOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Unauthorized(format!("{OPERATOR_HEADER} header is required")))?;

    OperatorIdentity::new(subject, state.operations_tenant_id)
}
