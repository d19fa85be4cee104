pub mod auth;
pub mod error;
pub mod files;
pub mod middleware;

use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::response::IntoResponse;
use axum::{middleware as axum_middleware, routing::get, routing::post, Json, Router};
use serde_json::json;
use std::sync::Arc;

/// GET /health
async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

pub fn build_api_routes(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/files", get(files::list_files))
        // The upload handler enforces its own size limit
        .route(
            "/upload",
            post(files::upload).layer(DefaultBodyLimit::disable()),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_identity,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-in", post(auth::sign_in))
        .merge(protected)
        .with_state(state)
}
