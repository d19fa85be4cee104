/// Failure creating a user record
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// A user with the same email is already stored
    #[error("user already exists")]
    AlreadyExists,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}
