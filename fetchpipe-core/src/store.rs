//! Passport storage.
//!
//! The passport is an identity token persisted by the embedding
//! application. The client only ever reads it, by a fixed key, through
//! the [`PassportStore`] trait.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Key under which the passport is persisted.
pub const PASSPORT_KEY: &str = "__PASSPORT";

/// A read-only view of an external key-value store.
pub trait PassportStore: Send + Sync {
    /// Look up the value stored at `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// The passport stored at [`PASSPORT_KEY`], if any.
    fn passport(&self) -> Option<String> {
        self.get(PASSPORT_KEY)
    }
}

impl<S: PassportStore + ?Sized> PassportStore for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// The empty store: never holds a passport.
impl PassportStore for () {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}

/// In-process key-value store.
///
/// Useful for tests and for applications that load the passport once at
/// startup and keep it in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `passport` under [`PASSPORT_KEY`].
    pub fn with_passport(passport: impl Into<String>) -> Self {
        let store = Self::new();
        store.insert(PASSPORT_KEY, passport);
        store
    }

    /// Insert or replace a value.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().insert(key.into(), value.into());
    }

    /// Remove a value, returning it if it was present.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.write().remove(key)
    }
}

impl PassportStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_passport() {
        let store = MemoryStore::with_passport("tok");
        assert_eq!(store.passport().as_deref(), Some("tok"));
        assert_eq!(store.get(PASSPORT_KEY).as_deref(), Some("tok"));
    }

    #[test]
    fn test_memory_store_remove() {
        let store = MemoryStore::new();
        store.insert("a", "1");
        assert_eq!(store.remove("a").as_deref(), Some("1"));
        assert!(store.get("a").is_none());
        assert!(store.passport().is_none());
    }

    #[test]
    fn test_unit_store_is_empty() {
        assert!(().passport().is_none());
    }

    #[test]
    fn test_arc_store_delegates() {
        let store: Arc<dyn PassportStore> = Arc::new(MemoryStore::with_passport("shared"));
        assert_eq!(store.passport().as_deref(), Some("shared"));
    }
}
