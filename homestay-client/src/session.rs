//! Auth session management
//!
//! Holds the access token in memory only; it is lost on restart and
//! recovered through `/api/me`. Every outgoing request gets the current
//! token attached, and an unauthorized response triggers at most one
//! refresh followed by a single retry of the original request.

use std::sync::{Arc, RwLock};

use serde_json::{json, Value};
use tokio::sync::Mutex;

use homestay_core::models::{AuthPayload, PublicUser};

use crate::api::{ApiClient, ApiRequest};
use crate::error::ClientError;

/// The session's view of the access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    /// Not yet resolved; `initialize` has not completed.
    Unknown,
    /// Resolved: no signed-in user.
    SignedOut,
    /// Resolved: signed in with this access token.
    Active(String),
}

pub struct AuthSession {
    client: Arc<ApiClient>,
    token: RwLock<TokenState>,
    /// Serializes refresh attempts: concurrent failures reuse the token
    /// the first waiter obtained instead of refreshing again.
    refresh_lock: Mutex<()>,
}

impl AuthSession {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            token: RwLock::new(TokenState::Unknown),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn token(&self) -> TokenState {
        self.token.read().unwrap().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        match &*self.token.read().unwrap() {
            TokenState::Active(token) => Some(token.clone()),
            _ => None,
        }
    }

    /// Replace the stored token. Exposed so callers can restore a session
    /// they obtained elsewhere.
    pub fn set_token(&self, state: TokenState) {
        *self.token.write().unwrap() = state;
    }

    /// Resolve the session on startup via `/api/me`; any failure resolves
    /// to signed-out.
    pub async fn initialize(&self) -> TokenState {
        let state = match self.get("/api/me", &[]).await {
            Ok(body) => match token_from_body(&body) {
                Some(token) => TokenState::Active(token),
                None => TokenState::SignedOut,
            },
            Err(_) => TokenState::SignedOut,
        };
        self.set_token(state.clone());
        state
    }

    /// Sign in; the refresh token lands in the client's cookie jar, the
    /// access token in this session. Returns the signed-in user, absent
    /// when auth enforcement is disabled server-side.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<PublicUser>, ClientError> {
        let response = self
            .client
            .send(ApiRequest::post(
                "/api/signin",
                Some(json!({ "email": email, "password": password })),
            ))
            .await?;

        let payload: AuthPayload = response.json()?;
        match &payload.access_token {
            Some(token) => self.set_token(TokenState::Active(token.clone())),
            None => self.set_token(TokenState::SignedOut),
        }
        Ok(payload.user)
    }

    /// Sign out locally and server-side (clearing the refresh cookie).
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let result = self.post("/api/signout", None).await;
        self.set_token(TokenState::SignedOut);
        result.map(|_| ())
    }

    pub async fn get(&self, path: &str, params: &[(String, String)]) -> Result<Value, ClientError> {
        self.request(ApiRequest::get(path).with_params(params.to_vec()))
            .await
    }

    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, ClientError> {
        self.request(ApiRequest::post(path, body)).await
    }

    /// Send a request with the current token attached; on an unauthorized
    /// response, refresh once and retry once.
    pub async fn request(&self, req: ApiRequest) -> Result<Value, ClientError> {
        let token = self.access_token();
        match self.send_with(req.clone(), token.clone()).await {
            Err(err) if err.is_unauthorized() => self.refresh_and_retry(req, token, err).await,
            other => other,
        }
    }

    async fn send_with(
        &self,
        req: ApiRequest,
        token: Option<String>,
    ) -> Result<Value, ClientError> {
        let response = self.client.send(req.with_bearer(token)).await?;
        Ok(response.body)
    }

    async fn refresh_and_retry(
        &self,
        req: ApiRequest,
        failed_token: Option<String>,
        original: ClientError,
    ) -> Result<Value, ClientError> {
        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited on the lock
        let current = self.access_token();
        let fresh = if current.is_some() && current != failed_token {
            current
        } else {
            match self.client.send(ApiRequest::get("/api/refreshToken")).await {
                Ok(response) => match token_from_body(&response.body) {
                    Some(token) => {
                        self.set_token(TokenState::Active(token.clone()));
                        Some(token)
                    }
                    None => {
                        self.set_token(TokenState::SignedOut);
                        return Err(original);
                    }
                },
                Err(refresh_err) => {
                    tracing::debug!("Token refresh failed: {}", refresh_err);
                    self.set_token(TokenState::SignedOut);
                    return Err(original);
                }
            }
        };

        // Exactly one retry, carrying the refreshed token
        self.send_with(req, fresh).await
    }
}

fn token_from_body(body: &Value) -> Option<String> {
    body.get("accessToken")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
