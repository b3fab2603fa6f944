//! Creating new entries.

use std::time::Duration;

use tracing::{info, warn};

use crate::cache::EntryCache;
use crate::capture::{CaptureState, ImageRef};
use crate::entry::TravelEntry;
use crate::error::{Error, Result};
use crate::notify::{self, Notification, Notifier};
use crate::storage::{EntryStore, KeyValueStore};
use crate::validation::{self, TextLimits};

/// Default pause before the caller clears its form after a save.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(1500);

/// User input collected for a new entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    /// Captured image, if any.
    pub image: Option<ImageRef>,
    /// Formatted address, if resolved.
    pub address: Option<String>,
    /// Entered title.
    pub title: String,
    /// Entered description.
    pub description: String,
}

impl Draft {
    /// Build a draft from the current capture state and form text.
    #[must_use]
    pub fn from_capture(
        state: &CaptureState,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            image: state.image().cloned(),
            address: state.address().map(str::to_string),
            title: title.into(),
            description: description.into(),
        }
    }

    /// Check whether both image and a non-empty address are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.image.is_some() && self.address.as_deref().is_some_and(|a| !a.is_empty())
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// The entry that was stored.
    pub entry: TravelEntry,
    /// How long to show the confirmation before resetting the form.
    pub reset_after: Duration,
}

/// Validates drafts and turns them into stored entries.
#[derive(Debug, Clone)]
pub struct EntryComposer {
    limits: TextLimits,
    notification: Option<Notification>,
    reset_delay: Duration,
}

impl Default for EntryComposer {
    fn default() -> Self {
        Self {
            limits: TextLimits::CREATE,
            notification: Some(Notification::new(
                "Travel Entry Added!",
                "Your travel memory has been saved successfully.",
            )),
            reset_delay: DEFAULT_RESET_DELAY,
        }
    }
}

impl EntryComposer {
    /// Create a composer with default limits and notification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the length limits.
    #[must_use]
    pub fn with_limits(mut self, limits: TextLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the success notification, or `None` to post nothing.
    #[must_use]
    pub fn with_notification(mut self, notification: Option<Notification>) -> Self {
        self.notification = notification;
        self
    }

    /// Override the confirmation delay.
    #[must_use]
    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    /// The limits applied on creation.
    #[must_use]
    pub fn limits(&self) -> TextLimits {
        self.limits
    }

    /// Validate a title/description pair against the creation limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationFailed`] for the first offending field.
    pub fn validate(&self, title: &str, description: &str) -> Result<()> {
        validation::validate(title, description, self.limits)
    }

    /// Store `draft` as a new entry at the front of the collection.
    ///
    /// Nothing is written unless the draft is complete and valid. After the
    /// write the success notification is attempted and the mirror is
    /// refreshed; neither step can undo the save.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteCapture`], [`Error::ValidationFailed`],
    /// or [`Error::StorageFailure`] if the collection cannot be read,
    /// parsed or written. On a storage failure neither the stored document
    /// nor the mirror is changed.
    pub async fn submit<S: KeyValueStore>(
        &self,
        store: &EntryStore<S>,
        cache: &mut EntryCache,
        notifier: &dyn Notifier,
        draft: &Draft,
    ) -> Result<SubmitOutcome> {
        let (Some(image), Some(address)) = (&draft.image, draft.address.as_deref()) else {
            return Err(Error::IncompleteCapture);
        };
        if address.is_empty() {
            return Err(Error::IncompleteCapture);
        }

        self.validate(&draft.title, &draft.description)?;

        let entry = TravelEntry::new(
            draft.title.trim(),
            image.uri(),
            address,
            draft.description.trim(),
        );

        let mut entries = store.load_for_update()?;
        entries.insert(0, entry.clone());
        store.save(&entries)?;
        info!("Saved entry {} ({} total)", entry.id, entries.len());

        if let Some(notification) = &self.notification {
            if let Err(e) = post(notifier, notification).await {
                warn!("Could not post notification: {e}");
            }
        }

        if let Err(e) = cache.refresh(store) {
            warn!("Entry saved but mirror refresh failed: {e}");
        }

        Ok(SubmitOutcome {
            entry,
            reset_after: self.reset_delay,
        })
    }
}

async fn post(notifier: &dyn Notifier, notification: &Notification) -> Result<()> {
    notify::ensure_permission(notifier).await?;
    notifier.notify(notification).await
}
