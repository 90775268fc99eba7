//! Common test utilities for API integration tests

use std::sync::Arc;

use axum_test::{TestServer, TestServerConfig};
use http::HeaderValue;
use serde_json::{json, Value};

use homestay_server::{routes, store, AppState, Config, MemoryStore};

pub const DEMO_EMAIL: &str = "demo@cosdensolutions.io";
pub const DEMO_PASSWORD: &str = "cosdensolutions";

/// Create a test server over a freshly seeded in-memory store.
pub fn create_test_server() -> TestServer {
    create_test_server_with(Config::default())
}

pub fn create_test_server_with(config: Config) -> TestServer {
    let store = MemoryStore::new();
    store::seed(&store).expect("seed record store");
    create_test_server_on(store, config)
}

/// Create a test server over a store prepared by the caller.
#[allow(dead_code)]
pub fn create_test_server_on<S>(store: S, config: Config) -> TestServer
where
    S: store::RecordStore + 'static,
{
    let state = Arc::new(AppState::new(store, config));
    let app = routes::create_router(state);

    let server_config = TestServerConfig {
        save_cookies: true,
        ..TestServerConfig::default()
    };
    TestServer::new_with_config(app, server_config).expect("Failed to create test server")
}

/// Sign in with the demo credentials and return the access token.
pub async fn sign_in(server: &TestServer) -> String {
    let response = server
        .post("/api/signin")
        .json(&json!({
            "email": DEMO_EMAIL,
            "password": DEMO_PASSWORD,
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    body["accessToken"]
        .as_str()
        .expect("No access token in sign-in response")
        .to_string()
}

/// Build a bearer Authorization header value.
pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header value")
}

/// Extract listing ids from a listings response body.
pub fn listing_ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .expect("listings array")
        .iter()
        .map(|l| l["id"].as_i64().expect("listing id"))
        .collect()
}
