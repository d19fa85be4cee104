use serde::{Deserialize, Serialize};

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// S3 configuration for object storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint (MinIO, R2, ...). Enables path-style addressing.
    pub endpoint: Option<String>,
    /// Static credentials; the default AWS provider chain is used when absent
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Upload with the `public-read` canned ACL so returned URLs resolve anonymously
    #[serde(default = "default_true")]
    pub public_read: bool,
    /// Request SSE-S3 (AES256) encryption at rest
    #[serde(default = "default_true")]
    pub server_side_encryption: bool,
}

fn default_true() -> bool {
    true
}

/// Object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Upper bound on a single object-store write, in seconds
    #[serde(default = "default_storage_timeout")]
    pub timeout_secs: u64,
    /// Directory for the local backend (used when `s3` is absent)
    #[serde(default = "default_local_dir")]
    pub local_dir: String,
    /// Base URL under which locally stored objects are reachable
    #[serde(default = "default_public_url")]
    pub public_url: String,
    pub s3: Option<S3Config>,
}

fn default_storage_timeout() -> u64 {
    30
}

fn default_local_dir() -> String {
    "./objects".to_string()
}

fn default_public_url() -> String {
    "http://localhost:8080/objects".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_storage_timeout(),
            local_dir: default_local_dir(),
            public_url: default_public_url(),
            s3: None,
        }
    }
}

/// Auth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default: 3600)
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,
    /// Request header carrying `Bearer <token>`
    #[serde(default = "default_token_header")]
    pub token_header: String,
    /// Process-wide password salt
    pub password_salt: String,
}

fn default_token_ttl() -> i64 {
    3600
}

fn default_token_header() -> String {
    "Authorization".to_string()
}

/// Upload admission configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Exclusive upper bound on upload size in bytes
    #[serde(default = "default_max_size")]
    pub max_size_bytes: i64,
}

fn default_max_size() -> i64 {
    10 * 1024 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: default_max_size(),
        }
    }
}

/// Server configuration - loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen: String, // "0.0.0.0:8080"
    pub db: DbConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Load server config from a YAML file with STASH__ env var overrides.
pub fn load_config(path: &str) -> anyhow::Result<ServerConfig> {
    use anyhow::Context;
    let config: ServerConfig = config::Config::builder()
        .add_source(config::File::new(path, config::FileFormat::Yaml))
        .add_source(
            config::Environment::with_prefix("STASH")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("Failed to build config from: {}", path))?
        .try_deserialize()
        .with_context(|| format!("Failed to deserialize config from: {}", path))?;
    Ok(config)
}
