//! Typed listing operations

use std::sync::Arc;

use serde_json::Value;

use homestay_core::models::{DateRange, Listing, ListingWithLocation, NewListing, Review};

use crate::error::ClientError;
use crate::session::AuthSession;

/// Optional listing filters, AND-combined server-side.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub dates: Option<DateRange>,
    pub guests: Option<u32>,
    pub search: Option<String>,
}

impl ListingFilter {
    /// Render the filter as query params; absent fields produce none.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(dates) = &self.dates {
            params.push(("from".to_string(), dates.from.to_string()));
            params.push(("to".to_string(), dates.to.to_string()));
        }
        if let Some(guests) = self.guests {
            params.push(("guests".to_string(), guests.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        params
    }
}

/// Typed wrapper over the listing and review endpoints.
pub struct ListingsClient {
    session: Arc<AuthSession>,
}

impl ListingsClient {
    pub fn new(session: Arc<AuthSession>) -> Self {
        Self { session }
    }

    pub async fn list(
        &self,
        filter: &ListingFilter,
    ) -> Result<Vec<ListingWithLocation>, ClientError> {
        let body = self
            .session
            .get("/api/listings", &filter.to_params())
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn get(&self, id: i64) -> Result<ListingWithLocation, ClientError> {
        let body = self
            .session
            .get(&format!("/api/listings/{id}"), &[])
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn reviews(&self, listing_id: i64) -> Result<Vec<Review>, ClientError> {
        let params = vec![("listingId".to_string(), listing_id.to_string())];
        let body = self.session.get("/api/reviews", &params).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn create(&self, new: &NewListing) -> Result<Listing, ClientError> {
        let body: Value = serde_json::to_value(new)?;
        let created = self.session.post("/api/listings", Some(body)).await?;
        Ok(serde_json::from_value(created)?)
    }
}
