//! Configuration management for traveldiary.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::capture::{Accuracy, Position};
use crate::composer::EntryComposer;
use crate::error::{Error, Result};
use crate::list::EntryListManager;
use crate::notify::Notification;
use crate::storage::DEFAULT_ENTRIES_KEY;
use crate::validation::{
    TextLimits, DESCRIPTION_MAX_CHARS_CREATE, DESCRIPTION_MAX_CHARS_EDIT, TITLE_MAX_CHARS,
};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "traveldiary";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "diary.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `TRAVELDIARY_`)
/// 2. TOML config file at `~/.config/traveldiary/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Text length limits.
    pub limits: LimitsConfig,
    /// Capture configuration.
    pub capture: CaptureConfig,
    /// Notification configuration.
    pub notifications: NotificationsConfig,
    /// Entry composer configuration.
    pub composer: ComposerConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/traveldiary/diary.db`
    pub database_path: Option<PathBuf>,
    /// Key the entry collection is stored under.
    pub entries_key: String,
}

/// Title and description length limits.
///
/// The description ceiling differs between creating and editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum title length.
    pub title_max: usize,
    /// Maximum description length for new entries.
    pub description_max_create: usize,
    /// Maximum description length when editing.
    pub description_max_edit: usize,
}

/// Capture-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Request a high-accuracy location fix.
    pub high_accuracy: bool,
    /// Fallback latitude when none is given on the command line.
    pub latitude: Option<f64>,
    /// Fallback longitude when none is given on the command line.
    pub longitude: Option<f64>,
}

/// Notification-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Post a notification after each new entry.
    pub enabled: bool,
    /// Notification headline.
    pub title: String,
    /// Notification body.
    pub body: String,
}

/// Entry composer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// How long the save confirmation stays up, in milliseconds.
    pub reset_delay_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            entries_key: DEFAULT_ENTRIES_KEY.to_string(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            title_max: TITLE_MAX_CHARS,
            description_max_create: DESCRIPTION_MAX_CHARS_CREATE,
            description_max_edit: DESCRIPTION_MAX_CHARS_EDIT,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            latitude: None,
            longitude: None,
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "Travel Entry Added!".to_string(),
            body: "Your travel memory has been saved successfully.".to_string(),
        }
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            reset_delay_ms: 1500,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("TRAVELDIARY_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.entries_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "entries_key must not be empty".to_string(),
            });
        }

        for (name, value) in [
            ("title_max", self.limits.title_max),
            ("description_max_create", self.limits.description_max_create),
            ("description_max_edit", self.limits.description_max_edit),
        ] {
            if value == 0 {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must be greater than 0"),
                });
            }
        }

        match (self.capture.latitude, self.capture.longitude) {
            (None, None) => {}
            (Some(lat), Some(lon)) => {
                if !Position::new(lat, lon).is_valid() {
                    return Err(Error::ConfigValidation {
                        message: format!("coordinates out of range: {lat}, {lon}"),
                    });
                }
            }
            _ => {
                return Err(Error::ConfigValidation {
                    message: "latitude and longitude must be set together".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Limits applied when creating entries.
    #[must_use]
    pub fn create_limits(&self) -> TextLimits {
        TextLimits {
            title_max: self.limits.title_max,
            description_max: self.limits.description_max_create,
        }
    }

    /// Limits applied when editing entries.
    #[must_use]
    pub fn edit_limits(&self) -> TextLimits {
        TextLimits {
            title_max: self.limits.title_max,
            description_max: self.limits.description_max_edit,
        }
    }

    /// Requested location accuracy.
    #[must_use]
    pub fn accuracy(&self) -> Accuracy {
        if self.capture.high_accuracy {
            Accuracy::High
        } else {
            Accuracy::Balanced
        }
    }

    /// Configured fallback position, if both coordinates are set.
    #[must_use]
    pub fn default_position(&self) -> Option<Position> {
        Some(Position::new(self.capture.latitude?, self.capture.longitude?))
    }

    /// Get the confirmation delay as a Duration.
    #[must_use]
    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.composer.reset_delay_ms)
    }

    /// Build an entry composer from these settings.
    #[must_use]
    pub fn composer(&self) -> EntryComposer {
        let notification = self.notifications.enabled.then(|| {
            Notification::new(
                self.notifications.title.clone(),
                self.notifications.body.clone(),
            )
        });
        EntryComposer::new()
            .with_limits(self.create_limits())
            .with_notification(notification)
            .with_reset_delay(self.reset_delay())
    }

    /// Build a list manager from these settings.
    #[must_use]
    pub fn list_manager(&self) -> EntryListManager {
        EntryListManager::new().with_limits(self.edit_limits())
    }
}
