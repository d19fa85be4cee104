//! In-memory implementations of the persistence traits.
//!
//! Used by tests and by local development runs without PostgreSQL. They
//! honor the same contracts as the PostgreSQL repos, including email
//! uniqueness.

use crate::error::DirectoryError;
use crate::repos::user::UserRow;
use crate::traits::{FileCatalog, UserDirectory};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use stash_common::models::file::FileRecord;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryUserDirectory {
    users: RwLock<HashMap<String, UserRow>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn create(
        &self,
        user_id: Uuid,
        email: &str,
        password_digest: &str,
    ) -> Result<UserRow, DirectoryError> {
        let mut users = self.users.write().await;
        if users.contains_key(email) {
            return Err(DirectoryError::AlreadyExists);
        }
        let row = UserRow {
            user_id,
            email: email.to_string(),
            password_digest: password_digest.to_string(),
            created_at: Utc::now(),
        };
        users.insert(email.to_string(), row.clone());
        Ok(row)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        Ok(self.users.read().await.get(email).cloned())
    }
}

#[derive(Default)]
pub struct MemoryFileCatalog {
    records: RwLock<Vec<FileRecord>>,
}

impl MemoryFileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl FileCatalog for MemoryFileCatalog {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<FileRecord>> {
        let records = self.records.read().await;
        let mut sorted: Vec<FileRecord> = records.clone();
        // Stable sort keeps append order within the same second
        sorted.sort_by_key(|r| r.upload_date);
        Ok(sorted
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn append(&self, record: &FileRecord) -> Result<()> {
        self.records.write().await.push(record.clone());
        Ok(())
    }
}
