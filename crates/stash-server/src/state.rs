use crate::config::ServerConfig;
use crate::services::{AuthService, UploadService};
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub auth: AuthService,
    pub uploads: UploadService,
    /// Directory served under `/objects` when the local object store is active
    pub local_objects_dir: Option<PathBuf>,
}

impl AppState {
    /// Create a new app state
    pub fn new(config: ServerConfig, auth: AuthService, uploads: UploadService) -> Self {
        Self {
            config: Arc::new(config),
            auth,
            uploads,
            local_objects_dir: None,
        }
    }

    pub fn with_local_objects(mut self, dir: impl Into<PathBuf>) -> Self {
        self.local_objects_dir = Some(dir.into());
        self
    }

    /// Name of the request header carrying the bearer token
    pub fn token_header(&self) -> &str {
        &self.config.auth.token_header
    }
}
