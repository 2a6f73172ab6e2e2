mod auth;
mod config;
mod errors;
mod export;
mod layout;
mod models;
mod routes;
mod state;
mod storage;
mod store;
mod templates;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::InMemoryAuthProvider;
use crate::config::{Config, StorageBackend};
use crate::export::{ExportStatus, RenderSurface, WkhtmlRasterizer};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{KeyValueStore, MemoryStore, PersistenceGateway, RedisStore};
use crate::store::AppStore;
use crate::templates::TemplateRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting FastCV API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize session storage
    let kv: Arc<dyn KeyValueStore> = match &config.storage {
        StorageBackend::Memory => {
            info!("Using in-memory session storage");
            Arc::new(MemoryStore::default())
        }
        StorageBackend::Redis { url } => Arc::new(RedisStore::connect(url).await?),
    };

    // Restore the persisted session (account directory is in-memory by default)
    let auth = Arc::new(InMemoryAuthProvider::new(config.auth_latency));
    let store = AppStore::load(
        PersistenceGateway::new(kv),
        auth,
        config.public_base_url.clone(),
    )
    .await
    .context("Failed to load persisted session")?;

    let renderer = TemplateRenderer::new().context("Failed to compile résumé templates")?;
    info!("Templates compiled; rasterizer: {}", config.rasterizer_bin);

    let state = AppState {
        config: config.clone(),
        store: Arc::new(Mutex::new(store)),
        renderer: Arc::new(renderer),
        surface: Arc::new(RenderSurface::default()),
        rasterizer: Arc::new(WkhtmlRasterizer::new(config.rasterizer_bin.clone())),
        exports: ExportStatus::default(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
