use crate::error::UploadError;
use crate::object_store::ObjectStore;
use stash_common::models::file::{FileRecord, ImageType, UploadRequest};
use stash_common::validation::parse_image_type;
use stash_db::FileCatalog;
use std::sync::Arc;
use std::time::Duration;

/// Admission limits for uploads
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// Exclusive upper bound: `size < max_size_bytes` passes
    pub max_size_bytes: i64,
    /// Bound on a single object-store write
    pub store_timeout: Duration,
}

/// Upload admission, object-store write and catalog append
#[derive(Clone)]
pub struct UploadService {
    store: Arc<dyn ObjectStore>,
    catalog: Arc<dyn FileCatalog>,
    policy: UploadPolicy,
}

impl UploadService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        catalog: Arc<dyn FileCatalog>,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            store,
            catalog,
            policy,
        }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Content-type half of admission, usable before the size is known
    pub fn admit_content_type(&self, content_type: &str) -> Result<ImageType, UploadError> {
        parse_image_type(content_type)
            .ok_or_else(|| UploadError::UnsupportedContentType(content_type.to_string()))
    }

    /// Admission checks, content type first, then size.
    pub fn admit(&self, content_type: &str, declared_size: i64) -> Result<ImageType, UploadError> {
        let image_type = self.admit_content_type(content_type)?;
        if declared_size < 0 || declared_size >= self.policy.max_size_bytes {
            return Err(UploadError::TooLarge {
                size: declared_size,
                limit: self.policy.max_size_bytes,
            });
        }
        Ok(image_type)
    }

    /// Store an upload and record its metadata.
    ///
    /// Nothing is recorded when the store write fails. When the write succeeds
    /// and the catalog append fails, the object stays stored and the call
    /// reports `MetadataWriteFailed`; there is no retry and no rollback.
    pub async fn upload(&self, request: UploadRequest) -> Result<FileRecord, UploadError> {
        let image_type = self.admit(&request.content_type, request.declared_size)?;

        let now = chrono::Utc::now().timestamp();
        let key = object_key(&request.owner_user_id, now, image_type);

        let put = self
            .store
            .put(&key, request.bytes, image_type.mime());
        let url = match tokio::time::timeout(self.policy.store_timeout, put).await {
            Ok(Ok(url)) => url,
            Ok(Err(e)) => return Err(UploadError::StorageWriteFailed(e)),
            Err(_) => {
                return Err(UploadError::StorageWriteFailed(anyhow::anyhow!(
                    "Object store write timed out after {:?}",
                    self.policy.store_timeout
                )))
            }
        };

        let record = FileRecord {
            filename: key.clone(),
            size: request.declared_size,
            upload_date: now,
            user_id: request.owner_user_id,
            url: url.clone(),
        };

        if let Err(e) = self.catalog.append(&record).await {
            return Err(UploadError::MetadataWriteFailed {
                key,
                url,
                source: e,
            });
        }

        tracing::info!(
            "Stored upload {} ({} bytes) for user {}",
            record.filename,
            record.size,
            record.user_id
        );
        Ok(record)
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<FileRecord>, UploadError> {
        self.catalog
            .list(limit, offset)
            .await
            .map_err(UploadError::Persistence)
    }
}

/// `{owner}-{unix_ts}-{suffix}.{ext}`. The random suffix keeps two uploads
/// by one user within the same second from overwriting each other.
fn object_key(owner_user_id: &str, now: i64, image_type: ImageType) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}.{}",
        owner_user_id,
        now,
        &suffix[..8],
        image_type.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_store::MemoryObjectStore;
    use anyhow::Result;
    use async_trait::async_trait;
    use stash_db::MemoryFileCatalog;

    const LIMIT: i64 = 1000;

    fn policy() -> UploadPolicy {
        UploadPolicy {
            max_size_bytes: LIMIT,
            store_timeout: Duration::from_secs(5),
        }
    }

    fn request(content_type: &str, size: i64) -> UploadRequest {
        UploadRequest {
            owner_user_id: "user-1".to_string(),
            filename: None,
            declared_size: size,
            content_type: content_type.to_string(),
            bytes: vec![7; size.max(0) as usize],
        }
    }

    struct FailingStore;

    #[async_trait]
    impl ObjectStore for FailingStore {
        async fn put(&self, _key: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<String> {
            anyhow::bail!("bucket unavailable")
        }
    }

    struct SlowStore;

    #[async_trait]
    impl ObjectStore for SlowStore {
        async fn put(&self, key: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(format!("slow://{}", key))
        }
    }

    struct FailingCatalog;

    #[async_trait]
    impl FileCatalog for FailingCatalog {
        async fn list(&self, _limit: i64, _offset: i64) -> Result<Vec<FileRecord>> {
            anyhow::bail!("catalog unavailable")
        }

        async fn append(&self, _record: &FileRecord) -> Result<()> {
            anyhow::bail!("catalog unavailable")
        }
    }

    fn service() -> (UploadService, Arc<MemoryObjectStore>, Arc<MemoryFileCatalog>) {
        let store = Arc::new(MemoryObjectStore::new());
        let catalog = Arc::new(MemoryFileCatalog::new());
        let svc = UploadService::new(store.clone(), catalog.clone(), policy());
        (svc, store, catalog)
    }

    #[tokio::test]
    async fn test_upload_success_records_metadata() {
        let (svc, store, catalog) = service();
        let record = svc.upload(request("image/png", 10)).await.unwrap();

        assert_eq!(record.size, 10);
        assert_eq!(record.user_id, "user-1");
        assert!(record.filename.starts_with("user-1-"));
        assert!(record.filename.ends_with(".png"));
        assert_eq!(record.url, format!("memory://{}", record.filename));

        let stored = store.get(&record.filename).await.unwrap();
        assert_eq!(stored.bytes.len(), 10);
        assert_eq!(stored.content_type, "image/png");

        let listed = catalog.list(100, 0).await.unwrap();
        assert_eq!(listed, vec![record]);
    }

    #[tokio::test]
    async fn test_jpeg_gets_jpg_extension() {
        let (svc, _store, _catalog) = service();
        let record = svc.upload(request("image/jpeg", 5)).await.unwrap();
        assert!(record.filename.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_size_boundary() {
        let (svc, store, catalog) = service();

        let err = svc.upload(request("image/png", LIMIT)).await.unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { size: LIMIT, limit: LIMIT }));
        assert_eq!(store.put_count(), 0);

        svc.upload(request("image/png", LIMIT - 1)).await.unwrap();
        assert_eq!(store.put_count(), 1);
        assert_eq!(catalog.len().await, 1);
    }

    #[tokio::test]
    async fn test_unsupported_content_type_never_touches_store() {
        let (svc, store, catalog) = service();
        let err = svc.upload(request("text/csv", 10)).await.unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedContentType(ref ct) if ct == "text/csv"));
        assert_eq!(store.put_count(), 0);
        assert!(catalog.is_empty().await);
    }

    #[tokio::test]
    async fn test_content_type_checked_before_size() {
        let (svc, _store, _catalog) = service();
        let err = svc.upload(request("text/csv", LIMIT * 2)).await.unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedContentType(_)));
    }

    #[tokio::test]
    async fn test_store_failure_records_nothing() {
        let catalog = Arc::new(MemoryFileCatalog::new());
        let svc = UploadService::new(Arc::new(FailingStore), catalog.clone(), policy());

        let err = svc.upload(request("image/png", 10)).await.unwrap_err();
        assert!(matches!(err, UploadError::StorageWriteFailed(_)));
        assert!(catalog.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_timeout_records_nothing() {
        let catalog = Arc::new(MemoryFileCatalog::new());
        let svc = UploadService::new(Arc::new(SlowStore), catalog.clone(), policy());

        let err = svc.upload(request("image/png", 10)).await.unwrap_err();
        assert!(matches!(err, UploadError::StorageWriteFailed(_)));
        assert!(err.to_string().contains("object store write failed"));
        assert!(catalog.is_empty().await);
    }

    #[tokio::test]
    async fn test_catalog_failure_leaves_bytes_stored() {
        let store = Arc::new(MemoryObjectStore::new());
        let svc = UploadService::new(store.clone(), Arc::new(FailingCatalog), policy());

        let err = svc.upload(request("image/png", 10)).await.unwrap_err();
        match err {
            UploadError::MetadataWriteFailed { key, url, .. } => {
                let stored = store.get(&key).await.expect("bytes should remain stored");
                assert_eq!(stored.bytes.len(), 10);
                assert_eq!(url, format!("memory://{}", key));
            }
            other => panic!("Expected MetadataWriteFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_same_second_uploads_get_distinct_keys() {
        let (svc, store, _catalog) = service();
        let a = svc.upload(request("image/png", 1)).await.unwrap();
        let b = svc.upload(request("image/png", 1)).await.unwrap();
        assert_ne!(a.filename, b.filename);
        assert_eq!(store.keys().await.len(), 2);
    }

    #[tokio::test]
    async fn test_list_failure_is_persistence_error() {
        let svc = UploadService::new(
            Arc::new(MemoryObjectStore::new()),
            Arc::new(FailingCatalog),
            policy(),
        );
        assert!(matches!(
            svc.list(10, 0).await,
            Err(UploadError::Persistence(_))
        ));
    }

    #[test]
    fn test_object_key_shape() {
        let key = object_key("user-1", 1_700_000_000, ImageType::Png);
        let rest = key.strip_prefix("user-1-1700000000-").unwrap();
        let (suffix, ext) = rest.split_once('.').unwrap();
        assert_eq!(suffix.len(), 8);
        assert_eq!(ext, "png");
    }
}
