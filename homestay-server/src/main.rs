//! Homestay mock booking API
//!
//! Serves the full `/api/*` surface backed by a seeded record store:
//! in-memory by default, a JSON blob on disk when `HOMESTAY_DB` is set.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use homestay_server::{routes, store, AppState, Config, JsonFileStore, MemoryStore, RecordStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "homestay_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!(?config, "Loaded configuration");

    let app = match &config.db_path {
        Some(path) => build_app(JsonFileStore::new(path.clone()), config.clone())?,
        None => build_app(MemoryStore::new(), config.clone())?,
    };

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Homestay API listening on http://{}", addr);
    tracing::info!("Public base URL: {}", config.base_url);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_app<S: RecordStore + 'static>(store: S, config: Config) -> Result<Router> {
    if store::seed(&store)? {
        tracing::info!("Seeded record store with demo data");
    }
    let state = Arc::new(AppState::new(store, config));
    Ok(routes::create_router(state))
}
