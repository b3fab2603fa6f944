//! Core entry types for traveldiary.
//!
//! This module defines the travel entry record and the ordered collection
//! that is persisted as a single document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The full ordered set of entries, newest first.
pub type EntryCollection = Vec<TravelEntry>;

/// One recorded travel memory.
///
/// The entry only references its image; the pixel data stays with the
/// device media layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelEntry {
    /// Unique identifier, assigned once at creation.
    pub id: String,

    /// Short user-supplied title.
    pub title: String,

    /// Reference to the captured or selected image.
    pub image_uri: String,

    /// Formatted address where the entry was recorded.
    pub address: String,

    /// Free-form user-supplied description.
    pub description: String,

    /// When the entry was created. Never changes afterwards.
    pub timestamp: DateTime<Utc>,
}

impl TravelEntry {
    /// Create a new entry with a fresh id and the current time.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        image_uri: impl Into<String>,
        address: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Self::generate_id(),
            title: title.into(),
            image_uri: image_uri.into(),
            address: address.into(),
            description: description.into(),
            timestamp: Utc::now(),
        }
    }

    /// Generate a collision-resistant entry id.
    #[must_use]
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Check whether the title contains `query`, ignoring case.
    #[must_use]
    pub fn title_matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(&query.to_lowercase())
    }
}
