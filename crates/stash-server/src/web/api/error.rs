use crate::error::{AuthError, TokenError, UploadError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use stash_common::validation::ValidationError;

/// Sign-in and sign-up failures that must not reveal which check failed
pub const CREDENTIALS_REJECTED: &str = "Invalid email or password";
const INTERNAL: &str = "Internal server error";

/// Error response with a fixed client-facing message. Collaborator detail is
/// logged where the error is converted and never put in the body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthenticated() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Missing or invalid token")
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({"error": self.message}))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::bad_request(e.0)
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Signing(source) => {
                tracing::error!("Failed to sign token: {}", source);
                Self::internal()
            }
            other => {
                tracing::debug!("Token rejected: {}", other);
                Self::unauthenticated()
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(v) => v.into(),
            AuthError::AlreadyExists => Self::bad_request("User already exists"),
            AuthError::NotFound | AuthError::WrongCredentials => {
                Self::bad_request(CREDENTIALS_REJECTED)
            }
            AuthError::Token(TokenError::Signing(source)) => {
                tracing::error!("Failed to sign token: {}", source);
                Self::internal()
            }
            AuthError::Token(other) => other.into(),
            AuthError::Hashing(source) => {
                tracing::error!("Password hashing failed: {:#}", source);
                Self::internal()
            }
            AuthError::Persistence(source) => {
                tracing::error!("User directory error: {:#}", source);
                Self::internal()
            }
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Validation(v) => v.into(),
            UploadError::UnsupportedContentType(_) => {
                Self::bad_request("Only image/jpeg and image/png uploads are accepted")
            }
            UploadError::TooLarge { .. } => Self::bad_request("File too large"),
            UploadError::StorageWriteFailed(source) => {
                tracing::error!("Object store write failed: {:#}", source);
                Self::internal()
            }
            UploadError::MetadataWriteFailed { key, url, source } => {
                tracing::error!(
                    key = %key,
                    url = %url,
                    "Object stored but file record not written: {:#}",
                    source
                );
                Self::internal()
            }
            UploadError::Persistence(source) => {
                tracing::error!("File catalog error: {:#}", source);
                Self::internal()
            }
        }
    }
}
