use crate::state::AppState;
use crate::web::api::error::ApiError;
use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use stash_common::models::auth::Identity;
use stash_common::models::file::{FileRecord, UploadRequest};
use stash_common::validation::ValidationError;
use std::sync::Arc;

/// Optional client-supplied name, kept for logging only
const FILENAME_HEADER: &str = "x-filename";
const MAX_PAGE_SIZE: i64 = 1000;

#[derive(Debug, Deserialize)]
pub struct ListFilesQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

/// GET /files
#[tracing::instrument(skip(state, identity, query), fields(user_id = %identity.user_id))]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    query: Result<Query<ListFilesQuery>, QueryRejection>,
) -> Result<Json<Vec<FileRecord>>, ApiError> {
    let Query(query) = query.map_err(|_| ApiError::bad_request("invalid paging parameters"))?;
    if query.limit <= 0 || query.offset < 0 {
        return Err(ApiError::bad_request("invalid paging parameters"));
    }

    let files = state
        .uploads
        .list(query.limit.min(MAX_PAGE_SIZE), query.offset)
        .await?;
    Ok(Json(files))
}

/// POST /upload
///
/// The raw body is the file. Admission runs on the headers before the body
/// is read, and the body is never read past the configured size limit.
#[tracing::instrument(skip(state, identity, headers, body), fields(user_id = %identity.user_id))]
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    headers: HeaderMap,
    body: Body,
) -> Result<impl IntoResponse, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let content_length = declared_length(&headers)?;

    // Content type always, size too when it is declared
    match content_length {
        Some(len) => state.uploads.admit(&content_type, len)?,
        None => state.uploads.admit_content_type(&content_type)?,
    };

    let limit = usize::try_from(state.uploads.policy().max_size_bytes).unwrap_or(usize::MAX);
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|_| ApiError::bad_request("File too large or unreadable"))?;

    let declared_size = match content_length {
        Some(len) if len != bytes.len() as i64 => {
            return Err(ValidationError::new("body length does not match content length").into())
        }
        Some(len) => len,
        None => bytes.len() as i64,
    };

    let filename = headers
        .get(FILENAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if let Some(name) = &filename {
        tracing::debug!("Client filename: {}", name);
    }

    state
        .uploads
        .upload(UploadRequest {
            owner_user_id: identity.user_id,
            filename,
            declared_size,
            content_type,
            bytes: bytes.to_vec(),
        })
        .await?;

    Ok(Json(json!({"message": "upload success"})))
}

fn declared_length(headers: &HeaderMap) -> Result<Option<i64>, ValidationError> {
    match headers.get(header::CONTENT_LENGTH) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|len| *len >= 0)
            .map(Some)
            .ok_or_else(|| ValidationError::new("invalid content length")),
    }
}
