//! Review endpoints

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use homestay_core::models::Review;

use super::require_auth;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::RecordStore;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuery {
    pub listing_id: i64,
}

/// GET /api/reviews?listingId=..
pub async fn get_reviews<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<Vec<Review>>, ApiError>
where
    S: RecordStore,
{
    require_auth(&state, &headers)?;

    let db = state.db()?;
    Ok(Json(db.reviews_for_listing(query.listing_id)))
}
