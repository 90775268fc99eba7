//! Tests for the fetch-with-cache primitive

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{sign_in, test_session, test_session_with_latency};
use serde_json::Value;

use homestay_client::{ClientError, FetchCache, FetchState, Fetcher};

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn ids(data: &Value) -> Vec<i64> {
    data.as_array()
        .expect("listings array")
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect()
}

/// Test: a second fetch inside the stale window is served from cache
/// without a network call
#[tokio::test]
async fn test_cache_round_trip() {
    let session = test_session();
    sign_in(&session).await;

    let fetcher = Fetcher::new(session.clone(), Arc::new(FetchCache::in_memory()));
    let query = params(&[("guests", "2")]);

    let first = fetcher.fetch("/api/listings", &query).await.unwrap();
    let sent = session.client().requests_sent();

    let second = fetcher.fetch("/api/listings", &query).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(session.client().requests_sent(), sent);
    assert_eq!(fetcher.state(), FetchState::Succeeded(second));
}

/// Test: once the stale window elapses, the network is hit again
#[tokio::test]
async fn test_stale_entry_triggers_refetch() {
    let session = test_session();
    sign_in(&session).await;

    let cache = FetchCache::in_memory().with_stale_after(chrono::Duration::zero());
    let fetcher = Fetcher::new(session.clone(), Arc::new(cache));
    let query = params(&[("guests", "2")]);

    fetcher.fetch("/api/listings", &query).await.unwrap();
    let sent = session.client().requests_sent();

    fetcher.fetch("/api/listings", &query).await.unwrap();
    assert_eq!(session.client().requests_sent(), sent + 1);
}

/// Test: different params are different cache keys
#[tokio::test]
async fn test_params_identity_changes_key() {
    let session = test_session();
    sign_in(&session).await;

    let fetcher = Fetcher::new(session.clone(), Arc::new(FetchCache::in_memory()));

    fetcher
        .fetch("/api/listings", &params(&[("search", "cabin")]))
        .await
        .unwrap();
    let sent = session.client().requests_sent();

    fetcher
        .fetch("/api/listings", &params(&[("search", "villa")]))
        .await
        .unwrap();
    assert_eq!(session.client().requests_sent(), sent + 1);
}

/// Test: starting fetch B while A is in flight cancels A; only B's data
/// commits, regardless of resolution order
#[tokio::test]
async fn test_superseded_fetch_never_commits() {
    let session = test_session_with_latency(Duration::from_millis(40));
    sign_in(&session).await;

    let fetcher = Arc::new(Fetcher::new(
        session.clone(),
        Arc::new(FetchCache::in_memory()),
    ));

    let first = {
        let fetcher = Arc::clone(&fetcher);
        tokio::spawn(async move {
            fetcher
                .fetch("/api/listings", &params(&[("search", "cabin")]))
                .await
        })
    };

    // Let A reach its network call, then supersede it
    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = fetcher
        .fetch("/api/listings", &params(&[("guests", "7")]))
        .await
        .unwrap();

    let first_result = first.await.expect("join fetch task");
    assert!(matches!(first_result, Err(ClientError::Cancelled)));

    // Only B's result is observable
    assert_eq!(ids(&second), vec![5]);
    assert_eq!(fetcher.state(), FetchState::Succeeded(second));
}

/// Test: a response that resolves after its superseder has already
/// committed must not overwrite the winner's state or cache entry
#[tokio::test]
async fn test_late_loser_cannot_overwrite_winner() {
    let session = test_session_with_latency(Duration::from_millis(40));
    sign_in(&session).await;

    // Pre-warm B's entry through a separate fetcher so B resolves
    // instantly while A is still on the wire
    let cache = Arc::new(FetchCache::in_memory());
    let b_params = params(&[("guests", "7")]);
    let warm = Fetcher::new(session.clone(), Arc::clone(&cache));
    let b_data = warm.fetch("/api/listings", &b_params).await.unwrap();

    let fetcher = Arc::new(Fetcher::new(session.clone(), Arc::clone(&cache)));
    let first = {
        let fetcher = Arc::clone(&fetcher);
        tokio::spawn(
            async move { fetcher.fetch("/api/listings", &params(&[("search", "cabin")])).await },
        )
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = fetcher.fetch("/api/listings", &b_params).await.unwrap();
    assert_eq!(second, b_data);

    // A's response arrives well after B committed
    let first_result = first.await.expect("join fetch task");
    assert!(matches!(first_result, Err(ClientError::Cancelled)));
    assert_eq!(fetcher.state(), FetchState::Succeeded(second));
    assert!(cache
        .get(&FetchCache::key("/api/listings", &params(&[("search", "cabin")])))
        .is_none());
}

/// Test: a failed fetch surfaces the generic error message, not the
/// transport detail
#[tokio::test]
async fn test_failure_sets_generic_error() {
    let session = test_session();
    sign_in(&session).await;

    let fetcher = Fetcher::new(session.clone(), Arc::new(FetchCache::in_memory()));

    let result = fetcher.fetch("/api/nonexistent", &[]).await;
    assert!(result.is_err());
    assert_eq!(
        fetcher.state(),
        FetchState::Failed("Something went wrong. Please try again later.".to_string())
    );
}
