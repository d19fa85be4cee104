use crate::state::AppState;
use crate::web::api::error::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use stash_common::models::auth::Identity;
use std::sync::Arc;

/// Gate for protected routes.
///
/// Reads `Bearer <token>` from the configured header, verifies the token and
/// inserts the resulting [`Identity`] into request extensions. Handlers behind
/// the gate take `Extension<Identity>`.
pub async fn require_identity(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = request
        .headers()
        .get(state.token_header())
        .and_then(|h| h.to_str().ok())
        .ok_or_else(ApiError::unauthenticated)?;

    let token = parse_bearer(header_value).ok_or_else(ApiError::unauthenticated)?;
    let user_id = state.auth.tokens().verify(token)?;

    request.extensions_mut().insert(Identity { user_id });
    Ok(next.run(request).await)
}

/// Exactly two space-separated parts, the first `Bearer`, the second non-empty
fn parse_bearer(value: &str) -> Option<&str> {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}
