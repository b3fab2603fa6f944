//! In-memory mirror of the stored entry collection.

use tracing::debug;

use crate::entry::{EntryCollection, TravelEntry};
use crate::error::Result;
use crate::storage::{EntryStore, KeyValueStore};

/// The last-loaded entry collection and its size.
///
/// The mirror is never patched. [`EntryCache::refresh`] re-reads the store
/// and replaces everything at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryCache {
    entries: EntryCollection,
    count: usize,
}

impl EntryCache {
    /// Create an empty mirror.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mirror and immediately fill it from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn loaded<S: KeyValueStore>(store: &EntryStore<S>) -> Result<Self> {
        let mut cache = Self::new();
        cache.refresh(store)?;
        Ok(cache)
    }

    /// Re-read the store and replace the mirror wholesale.
    ///
    /// On error the mirror is left as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn refresh<S: KeyValueStore>(&mut self, store: &EntryStore<S>) -> Result<()> {
        let entries = store.load()?;
        self.count = entries.len();
        self.entries = entries;
        debug!("Mirror refreshed with {} entries", self.count);
        Ok(())
    }

    /// The mirrored entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[TravelEntry] {
        &self.entries
    }

    /// Number of mirrored entries.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Check whether the mirror holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Look up a mirrored entry by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TravelEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::FlakyStore;
    use crate::storage::MemoryKeyValueStore;

    fn entry(title: &str) -> TravelEntry {
        TravelEntry::new(title, "file:///x.jpg", "Lima, Peru", "desc")
    }

    #[test]
    fn test_starts_empty() {
        let cache = EntryCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.count(), 0);
        assert!(cache.entries().is_empty());
    }

    #[test]
    fn test_refresh_replaces_mirror() {
        let store = EntryStore::new(MemoryKeyValueStore::new());
        let mut cache = EntryCache::new();

        store.save(&[entry("A"), entry("B")]).unwrap();
        cache.refresh(&store).unwrap();
        assert_eq!(cache.count(), 2);

        let only = vec![entry("C")];
        store.save(&only).unwrap();
        cache.refresh(&store).unwrap();
        assert_eq!(cache.count(), 1);
        assert_eq!(cache.entries(), only.as_slice());
    }

    #[test]
    fn test_loaded() {
        let store = EntryStore::new(MemoryKeyValueStore::new());
        store.save(&[entry("A")]).unwrap();

        let cache = EntryCache::loaded(&store).unwrap();
        assert_eq!(cache.count(), 1);
    }

    #[test]
    fn test_get_by_id() {
        let store = EntryStore::new(MemoryKeyValueStore::new());
        let saved = entry("A");
        store.save(std::slice::from_ref(&saved)).unwrap();

        let cache = EntryCache::loaded(&store).unwrap();
        assert_eq!(cache.get(&saved.id), Some(&saved));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_failed_refresh_keeps_mirror() {
        let backend = FlakyStore::default();
        let store = EntryStore::new(&backend);
        store.save(&[entry("A")]).unwrap();

        let mut cache = EntryCache::loaded(&store).unwrap();
        backend.fail_reads.set(true);

        assert!(cache.refresh(&store).is_err());
        assert_eq!(cache.count(), 1);
        assert_eq!(cache.entries()[0].title, "A");
    }
}
