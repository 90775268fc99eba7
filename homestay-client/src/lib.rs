//! Homestay client data-access layer
//!
//! Drives the mock API router in-process: an HTTP-shaped client with a
//! cookie jar, an auth session with transparent single-flight token
//! refresh, a stale-while-revalidate fetch cache with cancellation, and
//! an in-memory favorites container.

pub mod api;
pub mod error;
pub mod favorites;
pub mod fetch;
pub mod listings;
pub mod session;

pub use api::{ApiClient, ApiRequest, ApiResponse};
pub use error::{ClientError, ErrorCode};
pub use favorites::FavoriteSet;
pub use fetch::{FetchCache, FetchState, Fetcher};
pub use listings::{ListingFilter, ListingsClient};
pub use session::{AuthSession, TokenState};
