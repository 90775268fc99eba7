//! Tests for listing retrieval and filtering

mod common;

use common::{bearer, create_test_server, create_test_server_on, listing_ids, sign_in};
use http::header::AUTHORIZATION;
use serde_json::Value;

use homestay_server::{store, Config, MemoryStore, RecordStore};

/// Test: a listing is returned with its location embedded
#[tokio::test]
async fn test_get_listing_by_id() {
    let server = create_test_server();
    let token = sign_in(&server).await;

    let response = server
        .get("/api/listings/1")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Beachfront Villa");
    assert_eq!(body["location"]["name"], "Malibu");
}

/// Test: unknown listing id yields 404 with a not-found message
#[tokio::test]
async fn test_get_unknown_listing_not_found() {
    let server = create_test_server();
    let token = sign_in(&server).await;

    let response = server
        .get("/api/listings/999999")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Listing not found");
}

/// Test: protected endpoints reject requests without a bearer token
#[tokio::test]
async fn test_listings_require_auth() {
    let server = create_test_server();

    let response = server.get("/api/listings").await;

    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["message"], "Unauthorized");
}

/// Test: guest capacity filter keeps listings with enough room
#[tokio::test]
async fn test_filter_by_guests() {
    let server = create_test_server();
    let token = sign_in(&server).await;

    let response = server
        .get("/api/listings")
        .add_query_param("guests", 7)
        .add_header(AUTHORIZATION, bearer(&token))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(listing_ids(&response.json()), vec![5]);
}

/// Test: name search is a case-insensitive substring match
#[tokio::test]
async fn test_filter_by_search_case_insensitive() {
    let server = create_test_server();
    let token = sign_in(&server).await;

    let response = server
        .get("/api/listings")
        .add_query_param("search", "CABIN")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(listing_ids(&response.json()), vec![2]);
}

/// Test: date filter removes listings whose unavailable ranges overlap
#[tokio::test]
async fn test_filter_by_dates() {
    let server = create_test_server();
    let token = sign_in(&server).await;

    // Listing 1 is blocked 2024-12-20..27, listing 4 is blocked over New Year
    let response = server
        .get("/api/listings")
        .add_query_param("from", "2024-12-22")
        .add_query_param("to", "2024-12-24")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(listing_ids(&response.json()), vec![2, 3, 5, 6]);
}

/// Test: filters are AND-combined and commutative
#[tokio::test]
async fn test_filters_are_commutative() {
    let server = create_test_server();
    let token = sign_in(&server).await;

    let one_order = server
        .get("/api/listings")
        .add_query_param("search", "a")
        .add_query_param("guests", 4)
        .add_query_param("from", "2024-11-05")
        .add_query_param("to", "2024-11-10")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;

    let other_order = server
        .get("/api/listings")
        .add_query_param("from", "2024-11-05")
        .add_query_param("to", "2024-11-10")
        .add_query_param("guests", 4)
        .add_query_param("search", "a")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;

    assert_eq!(one_order.status_code(), 200);
    assert_eq!(other_order.status_code(), 200);

    let combined = listing_ids(&one_order.json());
    assert_eq!(combined, listing_ids(&other_order.json()));

    // The combination equals the intersection of the individual filters
    let by_guests = server
        .get("/api/listings")
        .add_query_param("guests", 4)
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    let by_search = server
        .get("/api/listings")
        .add_query_param("search", "a")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    let by_dates = server
        .get("/api/listings")
        .add_query_param("from", "2024-11-05")
        .add_query_param("to", "2024-11-10")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;

    let guests_ids = listing_ids(&by_guests.json());
    let search_ids = listing_ids(&by_search.json());
    let dates_ids = listing_ids(&by_dates.json());

    let intersection: Vec<i64> = guests_ids
        .iter()
        .filter(|id| search_ids.contains(id) && dates_ids.contains(id))
        .copied()
        .collect();
    assert_eq!(combined, intersection);
}

/// Test: a listing pointing at a missing location is skipped by the list
/// endpoint while the by-id read surfaces 404 for the same record
#[tokio::test]
async fn test_listing_with_unknown_location() {
    let store = MemoryStore::new();
    store::seed(&store).unwrap();
    store
        .update(&mut |db| db.listings[0].location_id = 999)
        .unwrap();
    let server = create_test_server_on(store, Config::default());
    let token = sign_in(&server).await;

    let list = server
        .get("/api/listings")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(list.status_code(), 200);
    assert_eq!(listing_ids(&list.json()), vec![2, 3, 4, 5, 6]);

    let by_id = server
        .get("/api/listings/1")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(by_id.status_code(), 404);
    let body: Value = by_id.json();
    assert_eq!(body["message"], "Location not found");
}

/// Test: absent filter params are a no-op, returning every listing
#[tokio::test]
async fn test_no_filters_returns_all_listings() {
    let server = create_test_server();
    let token = sign_in(&server).await;

    let response = server
        .get("/api/listings")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(listing_ids(&response.json()), vec![1, 2, 3, 4, 5, 6]);
}
