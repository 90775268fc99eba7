//! In-memory record store

use std::sync::RwLock;

use super::{Database, RecordStore, StoreResult};
use crate::error::ApiError;

/// Record store holding the blob behind a lock; used by tests and by the
/// server when no database path is configured.
pub struct MemoryStore {
    blob: RwLock<Option<Database>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            blob: RwLock::new(None),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> StoreResult<Option<Database>> {
        Ok(self.blob.read().unwrap().clone())
    }

    fn save(&self, db: &Database) -> StoreResult<()> {
        *self.blob.write().unwrap() = Some(db.clone());
        Ok(())
    }

    fn update(&self, f: &mut dyn FnMut(&mut Database)) -> StoreResult<()> {
        let mut blob = self.blob.write().unwrap();
        let db = blob
            .as_mut()
            .ok_or_else(|| ApiError::Store("record store is not seeded".to_string()))?;
        f(db);
        Ok(())
    }
}
