use super::ObjectStore;
use crate::config::S3Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::types::{ObjectCannedAcl, ServerSideEncryption};

/// S3-compatible object store
#[derive(Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
    endpoint: Option<String>,
    public_read: bool,
    server_side_encryption: bool,
}

impl S3ObjectStore {
    /// Build a client from configuration and check that the bucket is
    /// reachable. Static credentials are used when both keys are set,
    /// otherwise the default AWS provider chain.
    pub async fn connect(s3_config: &S3Config) -> Result<Self> {
        let mut aws_config_builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(s3_config.region.clone()));

        if let Some(ref endpoint) = s3_config.endpoint {
            aws_config_builder = aws_config_builder.endpoint_url(endpoint);
        }

        if let (Some(access_key), Some(secret_key)) =
            (&s3_config.access_key, &s3_config.secret_key)
        {
            let creds = aws_sdk_s3::config::Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "stash-config",
            );
            aws_config_builder = aws_config_builder.credentials_provider(creds);
        }

        let aws_config = aws_config_builder.load().await;
        let s3_sdk_config = aws_sdk_s3::config::Builder::from(&aws_config)
            .force_path_style(s3_config.endpoint.is_some())
            .build();
        let client = aws_sdk_s3::Client::from_conf(s3_sdk_config);

        let store = Self::with_client(
            client,
            s3_config.bucket.clone(),
            s3_config.region.clone(),
            s3_config.endpoint.clone(),
        )
        .with_public_read(s3_config.public_read)
        .with_server_side_encryption(s3_config.server_side_encryption);
        store.check_bucket().await?;

        tracing::info!(
            "S3 object storage enabled: bucket={}, region={}, public_read={}",
            s3_config.bucket,
            s3_config.region,
            s3_config.public_read
        );
        Ok(store)
    }

    /// Use a pre-built client (for testing)
    pub fn with_client(
        client: aws_sdk_s3::Client,
        bucket: String,
        region: String,
        endpoint: Option<String>,
    ) -> Self {
        Self {
            client,
            bucket,
            region,
            endpoint,
            public_read: false,
            server_side_encryption: false,
        }
    }

    pub fn with_public_read(mut self, public_read: bool) -> Self {
        self.public_read = public_read;
        self
    }

    pub fn with_server_side_encryption(mut self, enabled: bool) -> Self {
        self.server_side_encryption = enabled;
        self
    }

    /// Fails when the bucket is missing or the credentials cannot reach it
    pub async fn check_bucket(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .with_context(|| format!("S3 bucket {} is not reachable", self.bucket))?;
        Ok(())
    }

    /// Public URL of an object
    fn object_url(&self, key: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let size = bytes.len() as i64;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .content_length(size)
            .content_disposition("attachment")
            .set_acl(self.public_read.then_some(ObjectCannedAcl::PublicRead))
            .set_server_side_encryption(
                self.server_side_encryption
                    .then_some(ServerSideEncryption::Aes256),
            )
            .body(bytes.into())
            .send()
            .await
            .with_context(|| format!("Failed to upload object to S3: {}", key))?;

        tracing::info!("Uploaded object to S3: s3://{}/{}", self.bucket, key);
        Ok(self.object_url(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(endpoint: Option<&str>) -> S3ObjectStore {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new("eu-central-1"))
            .build();
        S3ObjectStore::with_client(
            aws_sdk_s3::Client::from_conf(config),
            "stash-files".to_string(),
            "eu-central-1".to_string(),
            endpoint.map(str::to_string),
        )
    }

    #[test]
    fn test_object_url_aws() {
        assert_eq!(
            store(None).object_url("u1-1.png"),
            "https://stash-files.s3.eu-central-1.amazonaws.com/u1-1.png"
        );
    }

    #[test]
    fn test_object_url_custom_endpoint() {
        assert_eq!(
            store(Some("http://127.0.0.1:9000/")).object_url("u1-1.png"),
            "http://127.0.0.1:9000/stash-files/u1-1.png"
        );
    }
}
