//! Error types for Homestay core

use thiserror::Error;

/// Token verification and issuance failures.
///
/// Callers branch on the variant, never on message text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}
