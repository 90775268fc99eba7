//! File-backed record store

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use super::{Database, RecordStore, StoreResult};
use crate::error::ApiError;

/// Record store persisting the blob as a single JSON document on disk,
/// read and written whole.
pub struct JsonFileStore {
    path: PathBuf,
    /// Held across the load-mutate-save sequence in [`RecordStore::update`].
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> StoreResult<Option<Database>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ApiError::Store(e.to_string())),
        };
        let db = serde_json::from_str(&raw).map_err(|e| ApiError::Store(e.to_string()))?;
        Ok(Some(db))
    }

    fn save(&self, db: &Database) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ApiError::Store(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(db).map_err(|e| ApiError::Store(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| ApiError::Store(e.to_string()))
    }

    fn update(&self, f: &mut dyn FnMut(&mut Database)) -> StoreResult<()> {
        let _guard = self.write_lock.lock().unwrap();
        let mut db = self
            .load()?
            .ok_or_else(|| ApiError::Store("record store is not seeded".to_string()))?;
        f(&mut db);
        self.save(&db)
    }
}
