//! Error kinds surfaced by the core services.
//!
//! Collaborator failures are carried as `anyhow::Error` with context for
//! logging. The HTTP layer maps each kind to a fixed status and message
//! and never echoes the inner error.

use stash_common::validation::ValidationError;

/// Token issuance and verification failures
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Signature or algorithm mismatch
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    /// Undecodable token or missing required claims
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("user already exists")]
    AlreadyExists,
    #[error("user not found")]
    NotFound,
    #[error("wrong credentials")]
    WrongCredentials,
    #[error("password hashing failed")]
    Hashing(#[source] anyhow::Error),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("user directory failure")]
    Persistence(#[source] anyhow::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("file too large: {size} bytes (limit {limit})")]
    TooLarge { size: i64, limit: i64 },
    /// Object-store write failed or timed out; nothing was recorded
    #[error("object store write failed")]
    StorageWriteFailed(#[source] anyhow::Error),
    /// Bytes are stored but the catalog append failed
    #[error("file metadata write failed for {key}")]
    MetadataWriteFailed {
        key: String,
        url: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("file catalog failure")]
    Persistence(#[source] anyhow::Error),
}
