//! HTTP routes for the mock API

mod auth;
mod listings;
mod reviews;

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use axum::routing::{get, post};
use axum::Router;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::RecordStore;

/// Create the router with all routes
pub fn create_router<S>(state: Arc<AppState<S>>) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route(
            "/api/listings",
            get(listings::get_listings).post(listings::create_listing),
        )
        .route("/api/listings/:id", get(listings::get_listing))
        .route("/api/reviews", get(reviews::get_reviews))
        .route("/api/me", get(auth::me))
        .route("/api/signin", post(auth::sign_in))
        .route("/api/refreshToken", get(auth::refresh_token))
        .route("/api/signout", post(auth::sign_out))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Extract the bearer token from the request headers.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Auth gate shared by every protected handler: when enforcement is on
/// and the bearer token fails verification, short-circuit with 401.
pub(crate) fn require_auth<S: RecordStore>(
    state: &AppState<S>,
    headers: &HeaderMap,
) -> Result<(), ApiError> {
    let verified = bearer_token(headers)
        .map(|token| state.tokens.verify(token).is_ok())
        .unwrap_or(false);

    if state.config.use_auth && !verified {
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}
