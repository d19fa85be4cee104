use anyhow::{Context, Result};
use stash_db::{create_pool, run_migrations, PgFileCatalog, PgUserDirectory};
use stash_server::auth::{JwtIssuer, SaltedArgon2Hasher};
use stash_server::config::{load_config, S3Config, ServerConfig};
use stash_server::object_store::{LocalObjectStore, ObjectStore};
use stash_server::services::{AuthService, UploadPolicy, UploadService};
use stash_server::state::AppState;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting stash server");

    // Load configuration
    let config_path =
        std::env::var("STASH_CONFIG").unwrap_or_else(|_| "server-config.yaml".to_string());

    tracing::info!("Loading config from: {}", config_path);
    let config = load_config(&config_path)?;
    tracing::info!("Config loaded successfully");

    // Create database pool
    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.db.url, config.db.max_connections)
        .await
        .context("Failed to create database pool")?;

    // Run migrations
    tracing::info!("Running database migrations...");
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let hasher = SaltedArgon2Hasher::new(&config.auth.password_salt)
        .context("Failed to initialize password hasher")?;
    let tokens = JwtIssuer::new(&config.auth.jwt_secret, config.auth.token_ttl_secs);
    let auth = AuthService::new(
        Arc::new(PgUserDirectory::new(pool.clone())),
        Arc::new(hasher),
        Arc::new(tokens),
    );

    let (store, local_dir) = build_object_store(&config).await?;
    let uploads = UploadService::new(
        store,
        Arc::new(PgFileCatalog::new(pool)),
        UploadPolicy {
            max_size_bytes: config.upload.max_size_bytes,
            store_timeout: Duration::from_secs(config.storage.timeout_secs),
        },
    );

    // Build application state
    let mut state = AppState::new(config.clone(), auth, uploads);
    if let Some(dir) = local_dir {
        state = state.with_local_objects(dir);
    }

    // Build router
    let app = stash_server::web::build_router(state);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.listen))?;

    tracing::info!("Server listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

/// S3 when configured, otherwise the local directory, which the router also
/// serves under `/objects`
async fn build_object_store(
    config: &ServerConfig,
) -> Result<(Arc<dyn ObjectStore>, Option<String>)> {
    if let Some(ref s3_config) = config.storage.s3 {
        let store = connect_s3(s3_config).await?;
        return Ok((store, None));
    }

    tracing::info!(
        "Local object storage enabled: dir={}",
        config.storage.local_dir
    );
    let store = LocalObjectStore::new(&config.storage.local_dir, &config.storage.public_url);
    Ok((Arc::new(store), Some(config.storage.local_dir.clone())))
}

#[cfg(feature = "s3")]
async fn connect_s3(s3_config: &S3Config) -> Result<Arc<dyn ObjectStore>> {
    let store = stash_server::object_store::S3ObjectStore::connect(s3_config)
        .await
        .context("Failed to initialize S3 object store")?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "s3"))]
async fn connect_s3(_s3_config: &S3Config) -> Result<Arc<dyn ObjectStore>> {
    anyhow::bail!("storage.s3 is configured but the server was built without the s3 feature")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping...");
}
