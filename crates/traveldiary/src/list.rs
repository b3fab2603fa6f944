//! Browsing, editing and removing entries.
//!
//! Edits and removals start from the mirror, write the whole mutated
//! collection back, then refresh the mirror.

use tracing::{debug, info, warn};

use crate::cache::EntryCache;
use crate::entry::{EntryCollection, TravelEntry};
use crate::error::{Error, Result};
use crate::storage::{EntryStore, KeyValueStore};
use crate::validation::{self, TextLimits};

/// Entries whose title contains `query`, ignoring case, in original order.
#[must_use]
pub fn filter(entries: &[TravelEntry], query: &str) -> EntryCollection {
    if query.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|entry| entry.title_matches(query))
        .cloned()
        .collect()
}

/// Gate in front of destructive actions.
pub trait Confirm {
    /// Ask whether `entry` may be removed.
    fn confirm_removal(&self, entry: &TravelEntry) -> bool;
}

impl<F: Fn(&TravelEntry) -> bool> Confirm for F {
    fn confirm_removal(&self, entry: &TravelEntry) -> bool {
        self(entry)
    }
}

/// What a removal request ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The entry was removed.
    Removed(TravelEntry),
    /// The user declined; nothing changed.
    Cancelled,
    /// No entry had that id; nothing changed.
    NotFound,
}

/// Edits and removes entries in the mirrored collection.
#[derive(Debug, Clone, Copy)]
pub struct EntryListManager {
    limits: TextLimits,
}

impl Default for EntryListManager {
    fn default() -> Self {
        Self {
            limits: TextLimits::EDIT,
        }
    }
}

impl EntryListManager {
    /// Create a manager with the default edit limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the length limits applied to edits.
    #[must_use]
    pub fn with_limits(mut self, limits: TextLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Search the mirror by title.
    #[must_use]
    pub fn search(&self, cache: &EntryCache, query: &str) -> EntryCollection {
        filter(cache.entries(), query)
    }

    /// Replace the title and description of entry `id`.
    ///
    /// Id, timestamp, image and address are kept as they were.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationFailed`] or [`Error::NotFound`] before
    /// anything is written, or [`Error::StorageFailure`] if the write fails.
    pub fn edit<S: KeyValueStore>(
        &self,
        store: &EntryStore<S>,
        cache: &mut EntryCache,
        id: &str,
        title: &str,
        description: &str,
    ) -> Result<TravelEntry> {
        validation::validate(title, description, self.limits)?;

        let mut entries = cache.entries().to_vec();
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| Error::not_found(id))?;
        entry.title = title.trim().to_string();
        entry.description = description.trim().to_string();
        let edited = entry.clone();

        store.save(&entries)?;
        info!("Edited entry {id}");
        refresh_after_write(store, cache);
        Ok(edited)
    }

    /// Remove entry `id` once `confirm` agrees.
    ///
    /// An unknown id is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageFailure`] if the write fails.
    pub fn remove<S: KeyValueStore>(
        &self,
        store: &EntryStore<S>,
        cache: &mut EntryCache,
        id: &str,
        confirm: &dyn Confirm,
    ) -> Result<RemoveOutcome> {
        let Some(target) = cache.get(id).cloned() else {
            debug!("Remove requested for unknown entry {id}");
            return Ok(RemoveOutcome::NotFound);
        };

        if !confirm.confirm_removal(&target) {
            debug!("Removal of {id} cancelled");
            return Ok(RemoveOutcome::Cancelled);
        }

        let remaining: EntryCollection = cache
            .entries()
            .iter()
            .filter(|entry| entry.id != id)
            .cloned()
            .collect();

        store.save(&remaining)?;
        info!("Removed entry {id} ({} left)", remaining.len());
        refresh_after_write(store, cache);
        Ok(RemoveOutcome::Removed(target))
    }
}

fn refresh_after_write<S: KeyValueStore>(store: &EntryStore<S>, cache: &mut EntryCache) {
    if let Err(e) = cache.refresh(store) {
        warn!("Write succeeded but mirror refresh failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Field;
    use crate::storage::testing::FlakyStore;
    use crate::storage::MemoryKeyValueStore;

    fn entry(title: &str) -> TravelEntry {
        TravelEntry::new(title, format!("file:///{title}.jpg"), "Paris, France", "desc")
    }

    fn seeded(titles: &[&str]) -> (EntryStore<MemoryKeyValueStore>, EntryCache) {
        let store = EntryStore::new(MemoryKeyValueStore::new());
        let entries: EntryCollection = titles.iter().map(|t| entry(t)).collect();
        store.save(&entries).unwrap();
        let cache = EntryCache::loaded(&store).unwrap();
        (store, cache)
    }

    fn yes(_: &TravelEntry) -> bool {
        true
    }

    fn no(_: &TravelEntry) -> bool {
        false
    }

    #[test]
    fn test_filter_empty_query_is_identity() {
        let entries = vec![entry("Paris"), entry("Rome"), entry("Lima")];
        assert_eq!(filter(&entries, ""), entries);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let entries = vec![entry("Paris Walk"), entry("Rome"), entry("paris night")];
        let upper = filter(&entries, "PARIS");
        let lower = filter(&entries, "paris");

        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 2);
        assert_eq!(upper[0].title, "Paris Walk");
        assert_eq!(upper[1].title, "paris night");
    }

    #[test]
    fn test_filter_matches_title_only() {
        let entries = vec![entry("Rome")];
        assert!(filter(&entries, "France").is_empty());
    }

    #[test]
    fn test_search_uses_mirror() {
        let (_store, cache) = seeded(&["Beach", "Mountain"]);
        let found = EntryListManager::new().search(&cache, "beach");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_edit_changes_only_text() {
        let (store, mut cache) = seeded(&["Old", "Other"]);
        let original = cache.entries()[0].clone();

        let edited = EntryListManager::new()
            .edit(&store, &mut cache, &original.id, " New ", " Better ")
            .unwrap();

        assert_eq!(edited.title, "New");
        assert_eq!(edited.description, "Better");
        assert_eq!(edited.id, original.id);
        assert_eq!(edited.timestamp, original.timestamp);
        assert_eq!(edited.image_uri, original.image_uri);
        assert_eq!(edited.address, original.address);

        assert_eq!(cache.entries()[0], edited);
        assert_eq!(store.load().unwrap()[0], edited);
        assert_eq!(cache.entries()[1].title, "Other");
    }

    #[test]
    fn test_edit_allows_longer_description() {
        let (store, mut cache) = seeded(&["A"]);
        let id = cache.entries()[0].id.clone();

        let long = "d".repeat(250);
        let edited = EntryListManager::new()
            .edit(&store, &mut cache, &id, "A", &long)
            .unwrap();
        assert_eq!(edited.description.len(), 250);

        let err = EntryListManager::new()
            .edit(&store, &mut cache, &id, "A", &"d".repeat(251))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ValidationFailed {
                field: Field::Description,
                ..
            }
        ));
    }

    #[test]
    fn test_edit_rejects_invalid_title_without_writing() {
        let (store, mut cache) = seeded(&["A"]);
        let before = store.load().unwrap();
        let id = before[0].id.clone();

        let err = EntryListManager::new()
            .edit(&store, &mut cache, &id, "  ", "desc")
            .unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn test_edit_unknown_id() {
        let (store, mut cache) = seeded(&["A"]);
        let err = EntryListManager::new()
            .edit(&store, &mut cache, "missing", "T", "D")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_remove_confirmed() {
        let (store, mut cache) = seeded(&["A", "B", "C"]);
        let target = cache.entries()[1].clone();

        let outcome = EntryListManager::new()
            .remove(&store, &mut cache, &target.id, &yes)
            .unwrap();

        assert_eq!(outcome, RemoveOutcome::Removed(target));
        assert_eq!(cache.count(), 2);
        let titles: Vec<_> = cache.entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["A", "C"]);
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn test_remove_declined() {
        let (store, mut cache) = seeded(&["A"]);
        let id = cache.entries()[0].id.clone();

        let outcome = EntryListManager::new()
            .remove(&store, &mut cache, &id, &no)
            .unwrap();

        assert_eq!(outcome, RemoveOutcome::Cancelled);
        assert_eq!(store.load().unwrap().len(), 1);
        assert_eq!(cache.count(), 1);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let (store, mut cache) = seeded(&["A", "B"]);
        let before = cache.clone();

        let outcome = EntryListManager::new()
            .remove(&store, &mut cache, "missing", &yes)
            .unwrap();

        assert_eq!(outcome, RemoveOutcome::NotFound);
        assert_eq!(cache, before);
        assert_eq!(store.load().unwrap(), before.entries());
    }

    #[test]
    fn test_remove_write_failure_keeps_mirror() {
        let backend = FlakyStore::default();
        let store = EntryStore::new(&backend);
        store.save(&[entry("A")]).unwrap();
        let mut cache = EntryCache::loaded(&store).unwrap();
        let id = cache.entries()[0].id.clone();

        backend.fail_writes.set(true);
        let err = EntryListManager::new()
            .remove(&store, &mut cache, &id, &yes)
            .unwrap_err();

        assert!(err.is_storage_error());
        assert_eq!(cache.count(), 1);
    }
}
