use crate::error::DirectoryError;
use crate::repos::file::FileRepo;
use crate::repos::user::{UserRepo, UserRow};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use stash_common::models::file::FileRecord;
use uuid::Uuid;

/// Persistence boundary for user records
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Insert a new user. Implementations must reject a duplicate email with
    /// `DirectoryError::AlreadyExists`.
    async fn create(
        &self,
        user_id: Uuid,
        email: &str,
        password_digest: &str,
    ) -> Result<UserRow, DirectoryError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<UserRow>>;
}

/// Persistence boundary for uploaded-file metadata
#[async_trait]
pub trait FileCatalog: Send + Sync {
    /// Records ordered by upload time, oldest first
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<FileRecord>>;

    async fn append(&self, record: &FileRecord) -> Result<()>;
}

/// PostgreSQL-backed user directory
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn create(
        &self,
        user_id: Uuid,
        email: &str,
        password_digest: &str,
    ) -> Result<UserRow, DirectoryError> {
        UserRepo::create(&self.pool, user_id, email, password_digest).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        UserRepo::get_by_email(&self.pool, email).await
    }
}

/// PostgreSQL-backed file catalog
#[derive(Clone)]
pub struct PgFileCatalog {
    pool: PgPool,
}

impl PgFileCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileCatalog for PgFileCatalog {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<FileRecord>> {
        let rows = FileRepo::list(&self.pool, limit, offset).await?;
        Ok(rows.into_iter().map(FileRecord::from).collect())
    }

    async fn append(&self, record: &FileRecord) -> Result<()> {
        let file_id = FileRepo::append(&self.pool, record).await?;
        tracing::debug!("Appended file record {} ({})", file_id, record.filename);
        Ok(())
    }
}
