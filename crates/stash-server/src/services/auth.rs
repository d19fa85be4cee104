use crate::auth::{PasswordHasher, TokenIssuer};
use crate::error::AuthError;
use stash_common::models::auth::{Credentials, User};
use stash_common::validation::validate_credentials;
use stash_db::{DirectoryError, UserDirectory};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Sign-up and sign-in orchestration
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserDirectory>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<dyn TokenIssuer> {
        &self.tokens
    }

    /// Register a new user.
    ///
    /// The existence pre-check and the insert are not atomic; the directory's
    /// own uniqueness guarantee settles concurrent sign-ups for one email.
    pub async fn sign_up(&self, creds: &Credentials) -> Result<User, AuthError> {
        validate_credentials(creds)?;

        let existing = self
            .users
            .get_by_email(&creds.email)
            .await
            .map_err(AuthError::Persistence)?;
        if existing.is_some() {
            return Err(AuthError::AlreadyExists);
        }

        let digest = self.hash(&creds.password).await?;
        let row = self
            .users
            .create(Uuid::new_v4(), &creds.email, &digest)
            .await
            .map_err(|e| match e {
                DirectoryError::AlreadyExists => AuthError::AlreadyExists,
                DirectoryError::Backend(e) => AuthError::Persistence(e),
            })?;

        tracing::info!("Created user {}", row.user_id);
        Ok(row.into())
    }

    /// Check credentials and issue a token for the user.
    ///
    /// The password is hashed before the lookup result is inspected, so an
    /// unknown email costs the same hash as a wrong password.
    pub async fn sign_in(&self, creds: &Credentials) -> Result<String, AuthError> {
        validate_credentials(creds)?;

        let user = self
            .users
            .get_by_email(&creds.email)
            .await
            .map_err(AuthError::Persistence)?;
        let digest = self.hash(&creds.password).await?;
        let user = user.ok_or(AuthError::NotFound)?;

        let matches: bool = digest
            .as_bytes()
            .ct_eq(user.password_digest.as_bytes())
            .into();
        if !matches {
            return Err(AuthError::WrongCredentials);
        }

        let token = self.tokens.issue(&user.user_id.to_string())?;
        Ok(token)
    }

    /// Argon2 is CPU-bound, so hashing runs on the blocking pool
    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.into()))?
            .map_err(AuthError::Hashing)
    }
}
