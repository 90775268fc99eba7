//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use homestay_core::TokenError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Listing not found")]
    ListingNotFound,

    #[error("Location not found")]
    LocationNotFound,

    /// Auth gate rejection: missing or unverifiable bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Token chain rejection on `/api/me`.
    #[error("Unauthorized")]
    InvalidToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Store error: {0}")]
    Store(String),
}

impl ApiError {
    /// Machine-readable discriminant carried in the response body.
    /// Clients branch on this, never on message text.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::ListingNotFound | ApiError::LocationNotFound => "not_found",
            ApiError::Unauthorized | ApiError::InvalidToken => "unauthorized",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::InvalidRefreshToken => "invalid_refresh_token",
            ApiError::Token(_) | ApiError::Store(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::ListingNotFound => (StatusCode::NOT_FOUND, "Listing not found"),
            ApiError::LocationNotFound => (StatusCode::NOT_FOUND, "Location not found"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::InvalidToken => (StatusCode::FORBIDDEN, "Unauthorized"),
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            ApiError::InvalidRefreshToken => (StatusCode::FORBIDDEN, "Invalid refresh token"),
            ApiError::Token(e) => {
                tracing::error!("Token issuance failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            ApiError::Store(msg) => {
                tracing::error!("Store error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = json!({ "error": self.code(), "message": message });
        (status, axum::Json(body)).into_response()
    }
}
