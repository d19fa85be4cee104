use crate::error::DirectoryError;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use stash_common::models::auth::User;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub email: String,
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            user_id: row.user_id,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

pub struct UserRepo;

impl UserRepo {
    /// Insert a user. A duplicate email surfaces as `DirectoryError::AlreadyExists`
    /// via the unique index on `email`.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        email: &str,
        password_digest: &str,
    ) -> Result<UserRow, DirectoryError> {
        let result = sqlx::query_as::<_, UserRow>(
            r#"INSERT INTO "user" (user_id, email, password_digest) VALUES ($1, $2, $3) RETURNING user_id, email, password_digest, created_at"#,
        )
        .bind(user_id)
        .bind(email)
        .bind(password_digest)
        .fetch_one(pool)
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DirectoryError::AlreadyExists)
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context("Failed to create user")
                .into()),
        }
    }

    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"SELECT user_id, email, password_digest, created_at FROM "user" WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by email")?;
        Ok(row)
    }
}
