//! Demo seed data
//!
//! Seeding writes the initial blob only when the store is empty, so an
//! existing database is never overwritten.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use homestay_core::models::{DateRange, Listing, Location, Review};

use super::{Database, RecordStore, StoreResult, User};
use crate::error::ApiError;

/// bcrypt cost factor for seeded passwords
const BCRYPT_COST: u32 = 12;

/// Seed the store if it holds no blob yet. Returns whether seeding
/// actually happened; calling it again is a no-op.
pub fn seed<S: RecordStore + ?Sized>(store: &S) -> StoreResult<bool> {
    if store.load()?.is_some() {
        return Ok(false);
    }
    store.save(&initial_database()?)?;
    Ok(true)
}

pub(crate) fn initial_database() -> StoreResult<Database> {
    Ok(Database {
        listings: initial_listings(),
        locations: initial_locations(),
        users: initial_users()?,
        reviews: initial_reviews(),
    })
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid seed date")
}

fn timestamp(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn initial_users() -> StoreResult<Vec<User>> {
    let hash = |password: &str| {
        bcrypt::hash(password, BCRYPT_COST).map_err(|e| ApiError::Store(e.to_string()))
    };
    Ok(vec![
        User {
            id: 1,
            email: "demo@cosdensolutions.io".to_string(),
            password_hash: hash("cosdensolutions")?,
            first_name: "Demo".to_string(),
            last_name: "User".to_string(),
            avatar_url: Some("/avatars/demo.png".to_string()),
            created_at: timestamp(2023, 11, 2),
        },
        User {
            id: 2,
            email: "host@homestay.dev".to_string(),
            password_hash: hash("hostpassword")?,
            first_name: "Harriet".to_string(),
            last_name: "Host".to_string(),
            avatar_url: None,
            created_at: timestamp(2023, 11, 14),
        },
    ])
}

fn initial_locations() -> Vec<Location> {
    vec![
        Location {
            id: 1,
            name: "Malibu".to_string(),
            country: "United States".to_string(),
        },
        Location {
            id: 2,
            name: "Aspen".to_string(),
            country: "United States".to_string(),
        },
        Location {
            id: 3,
            name: "Lisbon".to_string(),
            country: "Portugal".to_string(),
        },
    ]
}

fn initial_listings() -> Vec<Listing> {
    let listing = |id: i64,
                   name: &str,
                   price: u32,
                   max_guests: u32,
                   location_id: i64,
                   description: &str,
                   unavailable_ranges: Vec<DateRange>| Listing {
        id,
        name: name.to_string(),
        price,
        max_guests,
        location_id,
        images: vec![
            format!("/images/listing-{id}-1.jpg"),
            format!("/images/listing-{id}-2.jpg"),
        ],
        description: description.to_string(),
        unavailable_ranges,
        created_at: timestamp(2023, 12, 1),
        modified_at: timestamp(2023, 12, 1),
        user_id: 2,
    };

    vec![
        listing(
            1,
            "Beachfront Villa",
            250,
            6,
            1,
            "A spacious villa right on the sand with ocean views.",
            vec![DateRange::new(date(2024, 12, 20), date(2024, 12, 27))],
        ),
        listing(
            2,
            "Mountain Cabin",
            150,
            4,
            2,
            "A cozy cabin in the mountains, minutes from the slopes.",
            vec![DateRange::new(date(2024, 11, 1), date(2024, 11, 15))],
        ),
        listing(
            3,
            "Downtown Loft",
            120,
            2,
            3,
            "A bright loft in the old town, close to everything.",
            vec![],
        ),
        listing(
            4,
            "Seaside Cottage",
            180,
            5,
            1,
            "A quiet cottage a short walk from the beach.",
            vec![DateRange::new(date(2024, 12, 24), date(2025, 1, 2))],
        ),
        listing(
            5,
            "Alpine Chalet",
            320,
            8,
            2,
            "A large chalet with a sauna and panoramic views.",
            vec![],
        ),
        listing(
            6,
            "Riverside Apartment",
            95,
            3,
            3,
            "A modern apartment overlooking the river.",
            vec![DateRange::new(date(2024, 10, 5), date(2024, 10, 12))],
        ),
    ]
}

fn initial_reviews() -> Vec<Review> {
    let review = |id: i64, listing_id: i64, rating: u8, comment: &str| Review {
        id,
        listing_id,
        user_id: 1,
        rating,
        comment: comment.to_string(),
        created_at: timestamp(2024, 1, 20),
    };

    vec![
        review(1, 1, 5, "Waking up to the ocean every day was unreal."),
        review(2, 1, 4, "Great villa, a little hard to find at night."),
        review(3, 2, 5, "Perfect base for a ski week."),
        review(4, 3, 4, "Ideal spot to explore the city on foot."),
        review(5, 5, 5, "The sauna after a day on the slopes is unbeatable."),
    ]
}
