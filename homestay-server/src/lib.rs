//! Homestay mock booking API
//!
//! A fully self-contained backend for the Homestay demo application:
//! a whole-blob record store seeded with demo data, signed-token
//! authentication with refresh, and the listing/review endpoints.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::ApiError;
pub use state::AppState;
pub use store::{seed, Database, JsonFileStore, MemoryStore, RecordStore, User};
