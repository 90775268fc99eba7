//! Wire models for the Homestay API
//!
//! Field naming matches the JSON surface of the API (camelCase).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Whether two ranges share at least one day.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.from <= other.to && other.from <= self.to
    }
}

/// A place listings belong to, joined into responses at the read boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub country: String,
}

/// A bookable listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: i64,
    pub name: String,
    pub price: u32,
    pub max_guests: u32,
    pub location_id: i64,
    pub images: Vec<String>,
    pub description: String,
    /// Date ranges during which the listing cannot be booked.
    #[serde(default)]
    pub unavailable_ranges: Vec<DateRange>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub user_id: i64,
}

impl Listing {
    /// A listing is available iff the requested range overlaps none of
    /// its unavailable ranges.
    pub fn is_available(&self, requested: &DateRange) -> bool {
        !self
            .unavailable_ranges
            .iter()
            .any(|range| range.overlaps(requested))
    }
}

/// A listing with its location embedded, as returned by read endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingWithLocation {
    #[serde(flatten)]
    pub listing: Listing,
    pub location: Location,
}

/// Payload for creating a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub name: String,
    pub price: u32,
    pub max_guests: u32,
    pub location_id: i64,
    #[serde(default)]
    pub images: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub unavailable_ranges: Vec<DateRange>,
}

/// A review left on a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub listing_id: i64,
    pub user_id: i64,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A user as exposed over the API: never carries a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response of the sign-in, me and refresh endpoints.
///
/// Both fields are null when auth enforcement is disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: Option<String>,
    pub user: Option<PublicUser>,
}
