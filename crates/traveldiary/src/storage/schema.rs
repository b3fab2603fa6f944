//! `SQLite` schema for the key-value backend.

/// Creates the single table backing
/// [`SqliteKeyValueStore`](super::SqliteKeyValueStore).
pub const CREATE_KV_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";
