//! `traveldiary` - A local diary of travel memories
//!
//! Each entry pairs a photo reference and a reverse-geocoded address with a
//! short title and description. The whole collection is kept as one JSON
//! document in a key-value store and mirrored in memory for browsing.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod address;
pub mod cache;
pub mod capture;
pub mod cli;
pub mod composer;
pub mod config;
pub mod entry;
pub mod error;
pub mod host;
pub mod list;
pub mod logging;
pub mod notify;
pub mod storage;
pub mod validation;

pub use address::GeocodedAddress;
pub use cache::EntryCache;
pub use capture::{CaptureFlow, CaptureState, ImageRef, ImageSource, Position};
pub use composer::{Draft, EntryComposer, SubmitOutcome};
pub use config::Config;
pub use entry::{EntryCollection, TravelEntry};
pub use error::{Error, Result};
pub use list::{filter, EntryListManager, RemoveOutcome};
pub use logging::init_logging;
pub use storage::{EntryStore, KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
