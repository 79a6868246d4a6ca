pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::loader::{load_bank, LoadedBank};
use crate::services::storage::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub bank: Arc<LoadedBank>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Load the question bank and open the session store.
    pub async fn init(config: Config) -> anyhow::Result<Self> {
        tracing::info!("Loading packs from {}...", config.packs_manifest.display());
        let bank = load_bank(&config.packs_manifest)
            .await
            .context("failed to load question packs")?;

        tracing::info!("Opening session store at {}...", config.session_dir.display());
        let sessions = SessionStore::open(&config.session_dir)
            .await
            .context("failed to open session store")?;

        Ok(Self {
            bank: Arc::new(bank),
            sessions: Arc::new(sessions),
            config: Arc::new(config),
        })
    }
}

/// Build the router with all routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/bank", get(routes::bank::summary))
        .route("/api/sessions", post(routes::sessions::start))
        .route("/api/sessions/{id}", get(routes::sessions::get))
        .route("/api/sessions/{id}/advance", post(routes::sessions::advance))
        .route("/api/sessions/{id}/end", post(routes::sessions::end))
        .route("/api/sessions/{id}/review", get(routes::sessions::review))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr = config.bind_addr();
    let state = AppState::init(config).await?;
    let app = router(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
