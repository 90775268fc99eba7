//! Common test utilities for client integration tests

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use homestay_client::{ApiClient, AuthSession};
use homestay_server::{routes, store, AppState, Config, MemoryStore};

pub const DEMO_EMAIL: &str = "demo@cosdensolutions.io";
pub const DEMO_PASSWORD: &str = "cosdensolutions";

/// Build the mock API router over a freshly seeded in-memory store.
pub fn test_router(config: Config) -> Router {
    let store = MemoryStore::new();
    store::seed(&store).expect("seed record store");
    routes::create_router(Arc::new(AppState::new(store, config)))
}

/// A session over a default-config router.
pub fn test_session() -> Arc<AuthSession> {
    let client = ApiClient::new(test_router(Config::default()));
    Arc::new(AuthSession::new(Arc::new(client)))
}

/// A session whose client delays every request, for supersede tests.
#[allow(dead_code)]
pub fn test_session_with_latency(latency: Duration) -> Arc<AuthSession> {
    let client = ApiClient::with_latency(test_router(Config::default()), latency);
    Arc::new(AuthSession::new(Arc::new(client)))
}

/// Sign in with the demo credentials.
pub async fn sign_in(session: &AuthSession) {
    session
        .sign_in(DEMO_EMAIL, DEMO_PASSWORD)
        .await
        .expect("demo sign-in failed");
}
