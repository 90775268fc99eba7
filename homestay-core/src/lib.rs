//! Homestay core primitives
//!
//! Signed access/refresh tokens and the wire models shared between the
//! mock booking API and its clients.

pub mod error;
pub mod models;
pub mod tokens;

pub use error::TokenError;
pub use models::{
    AuthPayload, DateRange, Listing, ListingWithLocation, Location, NewListing, PublicUser, Review,
};
pub use tokens::{TokenClaims, TokenService};
