use anyhow::{Context, Result};
use sqlx::PgPool;
use stash_common::models::file::FileRecord;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileRow {
    pub file_id: i64,
    pub filename: String,
    pub size: i64,
    pub upload_date: i64,
    pub user_id: String,
    pub url: String,
}

impl From<FileRow> for FileRecord {
    fn from(row: FileRow) -> Self {
        FileRecord {
            filename: row.filename,
            size: row.size,
            upload_date: row.upload_date,
            user_id: row.user_id,
            url: row.url,
        }
    }
}

pub struct FileRepo;

impl FileRepo {
    /// Append an upload record, returning its generated id
    pub async fn append(pool: &PgPool, record: &FileRecord) -> Result<i64> {
        let file_id: i64 = sqlx::query_scalar(
            "INSERT INTO file_record (filename, size, upload_date, user_id, url) VALUES ($1, $2, $3, $4, $5) RETURNING file_id",
        )
        .bind(&record.filename)
        .bind(record.size)
        .bind(record.upload_date)
        .bind(&record.user_id)
        .bind(&record.url)
        .fetch_one(pool)
        .await
        .context("Failed to append file record")?;
        Ok(file_id)
    }

    /// List records oldest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<FileRow>> {
        let rows = sqlx::query_as::<_, FileRow>(
            "SELECT file_id, filename, size, upload_date, user_id, url FROM file_record ORDER BY upload_date ASC, file_id ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list file records")?;
        Ok(rows)
    }
}
