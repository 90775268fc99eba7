//! Application state

use homestay_core::TokenService;

use crate::config::Config;
use crate::error::ApiError;
use crate::store::{Database, RecordStore};

/// Shared state threaded through every handler.
pub struct AppState<S> {
    pub store: S,
    pub tokens: TokenService,
    pub config: Config,
}

impl<S: RecordStore> AppState<S> {
    pub fn new(store: S, config: Config) -> Self {
        let tokens = TokenService::new(&config.token_secret);
        Self {
            store,
            tokens,
            config,
        }
    }

    /// Load the full record-store blob; the store must have been seeded.
    pub fn db(&self) -> Result<Database, ApiError> {
        self.store
            .load()?
            .ok_or_else(|| ApiError::Store("record store is not seeded".to_string()))
    }
}
