//! Storage layer for traveldiary.
//!
//! The whole entry collection lives as one JSON document under a single key
//! of a [`KeyValueStore`]. Every save replaces the document wholesale.

pub mod memory;
pub mod schema;
pub mod sqlite;

use tracing::{debug, warn};

use crate::entry::{EntryCollection, TravelEntry};
use crate::error::{Error, Result};

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

/// Key under which the entry collection is stored by default.
pub const DEFAULT_ENTRIES_KEY: &str = "travelEntries";

/// A string-to-string store provided by the host device.
///
/// Implementations only need whole-value reads and writes; no partial
/// updates or transactions are expected.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Reads and writes the entry collection as a single document.
#[derive(Debug)]
pub struct EntryStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> EntryStore<S> {
    /// Create a store using [`DEFAULT_ENTRIES_KEY`].
    #[must_use]
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, DEFAULT_ENTRIES_KEY)
    }

    /// Create a store that keeps the collection under a custom key.
    #[must_use]
    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// The key holding the collection.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the full collection.
    ///
    /// A missing or unparseable document yields an empty collection; parse
    /// failures are logged rather than returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageFailure`] if the backend cannot be read.
    pub fn load(&self) -> Result<EntryCollection> {
        let raw = self
            .backend
            .get(&self.key)
            .map_err(|e| Error::storage(format!("failed to load entries: {e}")))?;

        let Some(raw) = raw else {
            debug!("No entries stored under {}", self.key);
            return Ok(Vec::new());
        };

        match serde_json::from_str::<EntryCollection>(&raw) {
            Ok(entries) => {
                debug!("Loaded {} entries", entries.len());
                Ok(entries)
            }
            Err(e) => {
                warn!("Discarding unparseable entries document: {e}");
                Ok(Vec::new())
            }
        }
    }

    /// Load the collection ahead of rewriting it.
    ///
    /// Unlike [`EntryStore::load`], an unparseable document is an error so
    /// that a following save cannot overwrite entries it failed to read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageFailure`] if the backend cannot be read or
    /// the stored document is not a valid entry collection.
    pub fn load_for_update(&self) -> Result<EntryCollection> {
        let raw = self
            .backend
            .get(&self.key)
            .map_err(|e| Error::storage(format!("failed to load entries: {e}")))?;

        match raw {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| Error::storage(format!("stored entries are unreadable: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the stored collection with `entries`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageFailure`] if the document cannot be written.
    pub fn save(&self, entries: &[TravelEntry]) -> Result<()> {
        let document = serde_json::to_string(entries)?;
        self.backend
            .set(&self.key, &document)
            .map_err(|e| Error::storage(format!("failed to save entries: {e}")))?;
        debug!("Saved {} entries", entries.len());
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FlakyStore;
    use super::*;

    fn entry(title: &str) -> TravelEntry {
        TravelEntry::new(title, "file:///x.jpg", "Paris, France", "desc")
    }

    #[test]
    fn test_load_empty_when_nothing_stored() {
        let store = EntryStore::new(MemoryKeyValueStore::new());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = EntryStore::new(MemoryKeyValueStore::new());
        let entries = vec![entry("B"), entry("A")];

        store.save(&entries).unwrap();
        assert_eq!(store.load().unwrap(), entries);
    }

    #[test]
    fn test_repeated_save_is_idempotent() {
        let store = EntryStore::new(SqliteKeyValueStore::open_in_memory().unwrap());
        store.save(&[entry("A")]).unwrap();

        let loaded = store.load().unwrap();
        store.save(&loaded).unwrap();
        store.save(&loaded).unwrap();

        assert_eq!(store.load().unwrap(), loaded);
    }

    #[test]
    fn test_unparseable_document_loads_empty() {
        let backend = MemoryKeyValueStore::new();
        backend.set(DEFAULT_ENTRIES_KEY, "{not json").unwrap();

        let store = EntryStore::new(&backend);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_for_update_rejects_unparseable_document() {
        let backend = MemoryKeyValueStore::new();
        backend.set(DEFAULT_ENTRIES_KEY, "[{\"title\":\"Old").unwrap();

        let err = EntryStore::new(&backend).load_for_update().unwrap_err();
        assert!(matches!(err, Error::StorageFailure { .. }));
    }

    #[test]
    fn test_load_for_update_empty_when_nothing_stored() {
        let store = EntryStore::new(MemoryKeyValueStore::new());
        assert!(store.load_for_update().unwrap().is_empty());
    }

    #[test]
    fn test_document_uses_fixed_key() {
        let backend = MemoryKeyValueStore::new();
        let store = EntryStore::new(&backend);
        store.save(&[entry("A")]).unwrap();

        let raw = backend.get("travelEntries").unwrap().unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"imageUri\""));
    }

    #[test]
    fn test_custom_key() {
        let backend = MemoryKeyValueStore::new();
        let store = EntryStore::with_key(&backend, "other");
        store.save(&[entry("A")]).unwrap();

        assert_eq!(store.key(), "other");
        assert!(backend.get(DEFAULT_ENTRIES_KEY).unwrap().is_none());
        assert!(backend.get("other").unwrap().is_some());
    }

    #[test]
    fn test_backend_read_failure_is_storage_error() {
        let backend = FlakyStore::default();
        backend.fail_reads.set(true);

        let err = EntryStore::new(&backend).load().unwrap_err();
        assert!(matches!(err, Error::StorageFailure { .. }));
    }

    #[test]
    fn test_backend_write_failure_is_storage_error() {
        let backend = FlakyStore::default();
        backend.fail_writes.set(true);

        let err = EntryStore::new(&backend).save(&[entry("A")]).unwrap_err();
        assert!(matches!(err, Error::StorageFailure { .. }));
        assert!(err.to_string().contains("disk full"));
    }
}
