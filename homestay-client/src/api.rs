//! In-process HTTP client
//!
//! Requests are HTTP-shaped but never leave the process: the router is
//! driven directly through `tower::ServiceExt::oneshot`. The client owns
//! the cookie jar (carrying the refresh token between calls) and counts
//! the requests it sends, which staleness tests rely on.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::Router;
use http::{header, Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower::ServiceExt;

use crate::error::ClientError;

/// An HTTP-shaped request against the mock API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            params: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            params: Vec::new(),
            body,
            bearer: None,
        }
    }

    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

/// A decoded successful response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_value(self.body.clone())?)
    }
}

/// Client driving the API router without a network.
pub struct ApiClient {
    router: Router,
    cookies: RwLock<HashMap<String, String>>,
    requests_sent: AtomicU64,
    latency: Option<Duration>,
}

impl ApiClient {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            cookies: RwLock::new(HashMap::new()),
            requests_sent: AtomicU64::new(0),
            latency: None,
        }
    }

    /// Client that delays every request, simulating network latency.
    pub fn with_latency(router: Router, latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::new(router)
        }
    }

    /// Number of requests actually dispatched to the router.
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent.load(Ordering::SeqCst)
    }

    /// Drop every stored cookie, including the refresh token.
    pub fn clear_cookies(&self) {
        self.cookies.write().unwrap().clear();
    }

    /// Dispatch a request; non-2xx statuses become [`ClientError::Api`].
    pub async fn send(&self, req: ApiRequest) -> Result<ApiResponse, ClientError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let request = self.build_request(&req)?;
        self.requests_sent.fetch_add(1, Ordering::SeqCst);

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});

        for value in response.headers().get_all(header::SET_COOKIE) {
            if let Ok(raw) = value.to_str() {
                self.apply_set_cookie(raw);
            }
        }

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;
        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        if status.is_success() {
            Ok(ApiResponse { status, body })
        } else {
            Err(ClientError::api(status, &body))
        }
    }

    fn build_request(&self, req: &ApiRequest) -> Result<Request<Body>, ClientError> {
        let mut uri = req.path.clone();
        if !req.params.is_empty() {
            let query = serde_urlencoded::to_string(&req.params)
                .map_err(|e| ClientError::Request(e.to_string()))?;
            uri.push('?');
            uri.push_str(&query);
        }

        let mut builder = Request::builder().method(req.method.clone()).uri(&uri);
        if let Some(token) = &req.bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let cookie_header = self.cookie_header();
        if !cookie_header.is_empty() {
            builder = builder.header(header::COOKIE, cookie_header);
        }

        let request = match &req.body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(body)?)),
            None => builder.body(Body::empty()),
        };
        request.map_err(|e| ClientError::Request(e.to_string()))
    }

    fn cookie_header(&self) -> String {
        self.cookies
            .read()
            .unwrap()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn apply_set_cookie(&self, raw: &str) {
        let mut parts = raw.split(';');
        let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
            return;
        };
        let name = name.trim().to_string();
        let value = value.trim().to_string();
        let expired = parts.any(|attr| attr.trim().eq_ignore_ascii_case("Max-Age=0"));

        let mut jar = self.cookies.write().unwrap();
        if expired || value.is_empty() {
            jar.remove(&name);
        } else {
            jar.insert(name, value);
        }
    }
}
