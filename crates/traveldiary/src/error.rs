//! Error types for traveldiary.
//!
//! This module defines all error types used throughout the traveldiary crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A user-editable field of a travel entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The entry title.
    Title,
    /// The entry description.
    Description,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Description => write!(f, "description"),
        }
    }
}

/// A device capability gated behind an OS permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Taking photos with the camera.
    Camera,
    /// Reading the photo library.
    PhotoLibrary,
    /// Foreground location access.
    Location,
    /// Posting local notifications.
    Notifications,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera => write!(f, "camera"),
            Self::PhotoLibrary => write!(f, "photo library"),
            Self::Location => write!(f, "location"),
            Self::Notifications => write!(f, "notifications"),
        }
    }
}

/// The main error type for traveldiary operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Device Errors ===
    /// The user (or OS) refused a device permission.
    #[error("{permission} permission is needed but was not granted")]
    PermissionDenied {
        /// The permission that was refused.
        permission: Permission,
    },

    /// A device facility could not provide a result.
    #[error("device unavailable: {message}")]
    DeviceUnavailable {
        /// Description of what went wrong.
        message: String,
    },

    // === Entry Errors ===
    /// User input failed validation.
    #[error("invalid {field}: {reason}")]
    ValidationFailed {
        /// The offending field.
        field: Field,
        /// Why the value was rejected.
        reason: String,
    },

    /// Submission attempted without both an image and an address.
    #[error("incomplete capture: take or select a picture with a resolved location first")]
    IncompleteCapture,

    /// No entry with the given id exists.
    #[error("no entry with id {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    // === Storage Errors ===
    /// Reading or writing the entry collection failed.
    #[error("storage failure: {message}")]
    StorageFailure {
        /// Description of what went wrong.
        message: String,
    },

    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for traveldiary operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a validation error for the given field.
    #[must_use]
    pub fn validation(field: Field, reason: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field,
            reason: reason.into(),
        }
    }

    /// Create a permission denied error.
    #[must_use]
    pub fn permission_denied(permission: Permission) -> Self {
        Self::PermissionDenied { permission }
    }

    /// Create a device unavailable error.
    #[must_use]
    pub fn device_unavailable(message: impl Into<String>) -> Self {
        Self::DeviceUnavailable {
            message: message.into(),
        }
    }

    /// Create a storage failure error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageFailure {
            message: message.into(),
        }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Check if this error is a validation failure.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }

    /// Check if this error is a permission issue.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Check if this error came from the persistence layer.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::StorageFailure { .. }
                | Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
        )
    }

    /// Short heading suitable for an alert shown to the user.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::PermissionDenied { .. } => "Permission required",
            _ => "Error",
        }
    }
}
