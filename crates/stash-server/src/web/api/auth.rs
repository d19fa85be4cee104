use crate::state::AppState;
use crate::web::api::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use stash_common::models::auth::Credentials;
use std::sync::Arc;

fn credentials(payload: Result<Json<Credentials>, JsonRejection>) -> Result<Credentials, ApiError> {
    payload
        .map(|Json(creds)| creds)
        .map_err(|_| ApiError::bad_request("email and password are required"))
}

/// POST /sign-up
#[tracing::instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let creds = credentials(payload)?;
    state.auth.sign_up(&creds).await?;
    Ok(Json(json!({"message": "success"})))
}

/// POST /sign-in
///
/// The token is returned in the body and in the configured token header.
#[tracing::instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, ApiError> {
    let creds = credentials(payload)?;
    let token = state.auth.sign_in(&creds).await?;

    let bearer = format!("Bearer {}", token);
    let mut response = Json(json!({"token": token})).into_response();
    match (
        HeaderName::from_bytes(state.token_header().as_bytes()),
        HeaderValue::from_str(&bearer),
    ) {
        (Ok(name), Ok(value)) => {
            response.headers_mut().insert(name, value);
        }
        _ => tracing::warn!(
            "Configured token header {:?} is not a valid header name",
            state.token_header()
        ),
    }
    Ok(response)
}
