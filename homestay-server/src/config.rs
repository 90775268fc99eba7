//! Server configuration

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Public base URL the API is served at
    pub base_url: String,

    /// Whether the auth gate is enforced and tokens/users are returned
    pub use_auth: bool,

    /// Path of the record store blob; in-memory when unset
    pub db_path: Option<PathBuf>,

    /// Secret used to sign access and refresh tokens
    pub token_secret: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            use_auth: true,
            db_path: None,
            token_secret: "cosdensolutions".to_string(),
        }
    }
}

impl Config {
    /// Build a configuration from `HOMESTAY_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("HOMESTAY_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            base_url: std::env::var("HOMESTAY_BASE_URL").unwrap_or(defaults.base_url),
            use_auth: std::env::var("HOMESTAY_USE_AUTH")
                .ok()
                .map(|v| !matches!(v.as_str(), "0" | "false" | "off"))
                .unwrap_or(defaults.use_auth),
            db_path: std::env::var("HOMESTAY_DB").ok().map(PathBuf::from),
            token_secret: std::env::var("HOMESTAY_TOKEN_SECRET").unwrap_or(defaults.token_secret),
        }
    }
}
