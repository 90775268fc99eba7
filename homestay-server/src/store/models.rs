//! Storage models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use homestay_core::models::{Listing, Location, PublicUser, Review};

/// A stored user account. The password hash never crosses the API
/// boundary; responses carry [`PublicUser`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Strip the credential before the value crosses the API boundary.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            avatar_url: self.avatar_url.clone(),
            created_at: self.created_at,
        }
    }
}

/// The full record-store blob: every table, serialized as one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Database {
    pub listings: Vec<Listing>,
    pub locations: Vec<Location>,
    pub users: Vec<User>,
    pub reviews: Vec<Review>,
}

impl Database {
    pub fn listing(&self, id: i64) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    pub fn location(&self, id: i64) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn user_by_id(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn reviews_for_listing(&self, listing_id: i64) -> Vec<Review> {
        self.reviews
            .iter()
            .filter(|r| r.listing_id == listing_id)
            .cloned()
            .collect()
    }

    /// Next listing id: one past the current maximum, so ids stay unique
    /// even after deletions.
    pub fn next_listing_id(&self) -> i64 {
        self.listings.iter().map(|l| l.id).max().unwrap_or(0) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed::initial_database;

    #[test]
    fn test_next_listing_id_survives_deletion() {
        let mut db = initial_database().unwrap();
        let max = db.listings.iter().map(|l| l.id).max().unwrap();

        // Removing a low id must not make the next id collide
        db.listings.retain(|l| l.id != 1);
        assert_eq!(db.next_listing_id(), max + 1);
    }

    #[test]
    fn test_user_lookup_is_case_insensitive() {
        let db = initial_database().unwrap();
        assert!(db.user_by_email("DEMO@cosdensolutions.io").is_some());
        assert!(db.user_by_email("nobody@example.com").is_none());
    }

    #[test]
    fn test_public_user_has_no_credential() {
        let db = initial_database().unwrap();
        let user = db.user_by_id(1).unwrap();
        let json = serde_json::to_value(user.to_public()).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "demo@cosdensolutions.io");
    }
}
