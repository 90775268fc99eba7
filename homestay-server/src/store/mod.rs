//! Record store for the mock API
//!
//! The whole database is one serialized blob of tables; stores read and
//! write it whole. Interior locking in each implementation serializes the
//! read-modify-write sequences performed by handlers.

mod file;
mod memory;
pub mod models;
mod seed;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use models::{Database, User};
pub use seed::seed;

use crate::error::ApiError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, ApiError>;

/// Whole-blob persistence for the record tables.
pub trait RecordStore: Send + Sync {
    /// Read the full blob; `None` when nothing has been seeded yet.
    fn load(&self) -> StoreResult<Option<Database>>;

    /// Replace the full blob.
    fn save(&self, db: &Database) -> StoreResult<()>;

    /// Read, mutate and write back the blob as one atomic step. The
    /// store holds its lock across the whole sequence, so two updates
    /// can never interleave. Fails when the store has not been seeded.
    fn update(&self, f: &mut dyn FnMut(&mut Database)) -> StoreResult<()>;
}
