use super::ObjectStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Filesystem-backed object store. Objects are served back by the HTTP
/// server under `public_url`.
#[derive(Clone)]
pub struct LocalObjectStore {
    base_dir: PathBuf,
    public_url: String,
}

impl LocalObjectStore {
    pub fn new(base_dir: impl AsRef<Path>, public_url: &str) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains('/') || key.contains('\\') || key.starts_with('.') {
            anyhow::bail!("Invalid object key: {:?}", key);
        }
        Ok(self.base_dir.join(key))
    }

    /// Ensure the object directory exists
    async fn ensure_dir(&self) -> Result<()> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir)
                .await
                .context("Failed to create object directory")?;
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, _content_type: &str) -> Result<String> {
        let path = self.object_path(key)?;
        self.ensure_dir().await?;

        // Write under a temporary name first so readers never see a partial object
        let tmp_path = self.base_dir.join(format!(".{}.partial", key));
        let written = match fs::write(&tmp_path, &bytes).await {
            Ok(()) => fs::rename(&tmp_path, &path)
                .await
                .with_context(|| format!("Failed to move object into place: {:?}", path)),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("Failed to write object: {:?}", tmp_path))),
        };
        if written.is_err() {
            let _ = fs::remove_file(&tmp_path).await;
        }
        written?;

        Ok(format!("{}/{}", self.public_url, key))
    }
}
