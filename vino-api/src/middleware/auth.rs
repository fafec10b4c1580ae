use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, state::AppState};

pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

// ============================================================================
// Admin Token Middleware
// ============================================================================

pub async fn admin_token_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 1. Refuse everything when the server has no token configured
    let expected = state.admin.token.as_deref().ok_or_else(|| {
        AppError::AuthorizationError("Admin token is not configured".to_string())
    })?;

    // 2. Compare against the request header
    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok());

    if provided != Some(expected) {
        tracing::warn!(path = %req.uri().path(), "Rejected admin request with invalid token");
        return Err(AppError::AuthenticationError("Invalid admin token".to_string()));
    }

    Ok(next.run(req).await)
}
