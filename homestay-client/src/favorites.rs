//! In-memory favorites
//!
//! Held only for the lifetime of the process and mutated exclusively
//! through these methods; nothing is persisted.

use std::collections::HashSet;
use std::sync::RwLock;

/// The set of favorited listing ids.
pub struct FavoriteSet {
    ids: RwLock<HashSet<i64>>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self {
            ids: RwLock::new(HashSet::new()),
        }
    }

    pub fn add(&self, listing_id: i64) {
        self.ids.write().unwrap().insert(listing_id);
    }

    pub fn remove(&self, listing_id: i64) {
        self.ids.write().unwrap().remove(&listing_id);
    }

    /// Returns whether the listing is a favorite after the toggle.
    pub fn toggle(&self, listing_id: i64) -> bool {
        let mut ids = self.ids.write().unwrap();
        if ids.remove(&listing_id) {
            false
        } else {
            ids.insert(listing_id);
            true
        }
    }

    pub fn contains(&self, listing_id: i64) -> bool {
        self.ids.read().unwrap().contains(&listing_id)
    }

    /// All favorited ids, sorted for stable iteration.
    pub fn all(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.ids.read().unwrap().iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.ids.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.read().unwrap().is_empty()
    }
}

impl Default for FavoriteSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let favorites = FavoriteSet::new();

        favorites.add(3);
        favorites.add(1);
        assert!(favorites.contains(3));
        assert_eq!(favorites.all(), vec![1, 3]);

        favorites.remove(3);
        assert!(!favorites.contains(3));
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let favorites = FavoriteSet::new();

        assert!(favorites.toggle(5));
        assert!(favorites.contains(5));
        assert!(!favorites.toggle(5));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let favorites = FavoriteSet::new();

        favorites.add(2);
        favorites.add(2);
        assert_eq!(favorites.len(), 1);
    }
}
