use crate::models::auth::Credentials;
use crate::models::file::ImageType;

/// Rejected input shape. The message is safe to show to callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Validates sign-up/sign-in credentials.
///
/// Email must be `local@domain` with both parts non-empty and no whitespace;
/// the password must be non-empty. Email case is preserved as given.
pub fn validate_credentials(creds: &Credentials) -> Result<(), ValidationError> {
    if creds.email.is_empty() || creds.password.is_empty() {
        return Err(ValidationError::new("email and password are required"));
    }
    if creds.email.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("invalid email"));
    }
    match creds.email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ValidationError::new("invalid email")),
    }
}

/// Parses a `Content-Type` value into an accepted image type.
///
/// Only the media type essence is compared (case-insensitive); parameters
/// such as `; charset=...` are ignored. Returns `None` for anything outside
/// the allow-list.
pub fn parse_image_type(content_type: &str) -> Option<ImageType> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/jpeg" => Some(ImageType::Jpeg),
        "image/png" => Some(ImageType::Png),
        _ => None,
    }
}
