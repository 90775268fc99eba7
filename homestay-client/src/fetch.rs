//! Fetch-with-cache primitive
//!
//! Successful responses are cached per `(url, params)` key and served
//! without a network call while younger than the stale window. Each
//! fetcher instance allows at most one in-flight request: starting a new
//! fetch cancels the previous one, and a superseded response never
//! commits its result.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;
use crate::session::AuthSession;

/// How long a cache entry is trusted without revalidation.
pub const STALE_TIME_MINUTES: i64 = 5;

/// Error text surfaced for any non-cancellation fetch failure.
pub const FETCH_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    data: Value,
}

/// Time-boxed response cache, optionally persisted as one JSON blob.
///
/// Entries are never evicted; staleness is checked at read time only.
pub struct FetchCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    path: Option<PathBuf>,
    stale_after: Duration,
}

impl FetchCache {
    pub fn in_memory() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            path: None,
            stale_after: Duration::minutes(STALE_TIME_MINUTES),
        }
    }

    /// Cache persisted at `path`, loading whatever a previous session
    /// stored there.
    pub fn persistent(path: PathBuf) -> Self {
        let entries = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            entries: RwLock::new(entries),
            path: Some(path),
            stale_after: Duration::minutes(STALE_TIME_MINUTES),
        }
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    /// Stable cache key: the url plus a canonical (sorted) rendering of
    /// the params, or just the url when there are none.
    pub fn key(url: &str, params: &[(String, String)]) -> String {
        if params.is_empty() {
            return url.to_string();
        }
        let canonical: BTreeMap<&str, &str> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let serialized = serde_json::to_string(&canonical).unwrap_or_default();
        format!("{url}?{serialized}")
    }

    /// Entries older than the stale window are treated as absent.
    pub fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().unwrap();
        let entry = entries.get(key)?;
        if Utc::now() - entry.fetched_at >= self.stale_after {
            return None;
        }
        Some(entry.data.clone())
    }

    pub fn insert(&self, key: &str, data: Value) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            key.to_string(),
            CacheEntry {
                fetched_at: Utc::now(),
                data,
            },
        );
        if let Some(path) = &self.path {
            if let Err(e) = persist(path, &entries) {
                tracing::warn!("Failed to persist fetch cache: {}", e);
            }
        }
    }
}

fn persist(path: &PathBuf, entries: &HashMap<String, CacheEntry>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string(entries)?;
    std::fs::write(path, raw)
}

/// Observable state of a fetcher instance.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Idle,
    Loading,
    Succeeded(Value),
    Failed(String),
}

/// A single fetch slot: loading/error state, cache lookups, and
/// supersede-on-refetch cancellation.
pub struct Fetcher {
    session: Arc<AuthSession>,
    cache: Arc<FetchCache>,
    current: Mutex<CancellationToken>,
    state: RwLock<FetchState>,
}

impl Fetcher {
    pub fn new(session: Arc<AuthSession>, cache: Arc<FetchCache>) -> Self {
        Self {
            session,
            cache,
            current: Mutex::new(CancellationToken::new()),
            state: RwLock::new(FetchState::Idle),
        }
    }

    pub fn state(&self) -> FetchState {
        self.state.read().unwrap().clone()
    }

    /// Cancel whatever is in flight without starting a new request.
    pub fn cancel(&self) {
        self.current.lock().unwrap().cancel();
    }

    /// Fetch `url` with `params`, serving a fresh cache entry when one
    /// exists. A call superseded by a newer one returns
    /// [`ClientError::Cancelled`] and leaves both state and cache alone.
    pub async fn fetch(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<Value, ClientError> {
        let token = {
            let mut current = self.current.lock().unwrap();
            // Supersede any in-flight request before starting a new one
            current.cancel();
            *current = CancellationToken::new();
            current.clone()
        };

        let key = FetchCache::key(url, params);
        if let Some(data) = self.cache.get(&key) {
            let _current = self.current.lock().unwrap();
            if token.is_cancelled() {
                return Err(ClientError::Cancelled);
            }
            *self.state.write().unwrap() = FetchState::Succeeded(data.clone());
            return Ok(data);
        }

        {
            let _current = self.current.lock().unwrap();
            if token.is_cancelled() {
                return Err(ClientError::Cancelled);
            }
            *self.state.write().unwrap() = FetchState::Loading;
        }

        let result = tokio::select! {
            _ = token.cancelled() => return Err(ClientError::Cancelled),
            result = self.session.get(url, params) => result,
        };

        // Commit while holding the supersede lock: a newer fetch cancels
        // under the same lock, so a response that lost the race can never
        // overwrite the winner's state or cache entry
        let _current = self.current.lock().unwrap();
        if token.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        match result {
            Ok(data) => {
                self.cache.insert(&key, data.clone());
                *self.state.write().unwrap() = FetchState::Succeeded(data.clone());
                Ok(data)
            }
            Err(err) => {
                *self.state.write().unwrap() = FetchState::Failed(FETCH_ERROR_MESSAGE.to_string());
                Err(err)
            }
        }
    }
}
