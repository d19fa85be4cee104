pub mod api;

use crate::state::AppState;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = api::build_api_routes(state.clone());

    if let Some(dir) = &state.local_objects_dir {
        router = router.nest_service("/objects", ServeDir::new(dir));
    }

    router.layer(cors).layer(TraceLayer::new_for_http())
}
