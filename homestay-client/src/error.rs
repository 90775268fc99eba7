//! Client error types

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Machine-readable discriminant mirrored from API error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Unauthorized,
    InvalidCredentials,
    NotFound,
    InvalidRefreshToken,
    Unknown,
}

impl ErrorCode {
    fn from_code(code: &str) -> Self {
        match code {
            "unauthorized" => ErrorCode::Unauthorized,
            "invalid_credentials" => ErrorCode::InvalidCredentials,
            "not_found" => ErrorCode::NotFound,
            "invalid_refresh_token" => ErrorCode::InvalidRefreshToken,
            _ => ErrorCode::Unknown,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with a non-success status.
    #[error("{message}")]
    Api {
        status: u16,
        code: ErrorCode,
        message: String,
    },

    /// The request was superseded before it completed. Never surfaced to
    /// the user as a failure.
    #[error("request cancelled")]
    Cancelled,

    #[error("request failed: {0}")]
    Request(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    pub(crate) fn api(status: StatusCode, body: &Value) -> Self {
        let code = body
            .get("error")
            .and_then(|v| v.as_str())
            .map(ErrorCode::from_code)
            .unwrap_or(ErrorCode::Unknown);
        let message = body
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("request failed")
            .to_string();
        ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        }
    }

    /// The discriminant for API failures, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether this failure should trigger a token refresh.
    pub(crate) fn is_unauthorized(&self) -> bool {
        self.code() == Some(ErrorCode::Unauthorized)
    }
}
