//! In-process key-value store.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Error, Result};

use super::KeyValueStore;

/// Key-value store held entirely in memory. Contents vanish on drop.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_values<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> Result<T> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| Error::storage("in-memory store lock poisoned"))?;
        Ok(f(&mut values))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_values(|values| values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_values(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }
}
