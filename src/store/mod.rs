//! Blob persistence boundary.
//!
//! Each collection lives under a single string key as one JSON array; the
//! whole array is always the unit of durability. Absence of a key is a valid
//! empty state, not an error, and a blob that fails to parse as JSON reads
//! as absent so a damaged collection reseeds instead of wedging startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;

use crate::error::StoreError;

/// Opaque key-value persistence boundary, one JSON value per key.
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError>;
}

pub type SharedBlobStore = Arc<dyn BlobStore>;

/// Blob store backed by a single SQLite table.
pub struct SqliteBlobStore {
    conn: Mutex<Connection>,
}

impl SqliteBlobStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(persistence)?;
        }
        let conn = Connection::open(path).map_err(persistence)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(persistence)?;
        Self::init(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open the store at the platform data directory (e.g.
    /// `~/.local/share/drydock/fleet.db` on Linux).
    pub fn open_default() -> Result<Self, StoreError> {
        let dirs = directories::ProjectDirs::from("", "", "drydock")
            .ok_or_else(|| StoreError::Persistence("could not determine data directory".into()))?;
        Self::open(dirs.data_dir().join("fleet.db"))
    }

    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(persistence)?;
        Self::init(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "drydock")
            .map(|dirs| dirs.data_dir().join("fleet.db"))
    }

    fn init(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS blobs (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .map_err(persistence)
    }
}

impl BlobStore for SqliteBlobStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let conn = self.conn.lock().expect("blob store lock poisoned");
        let text: Option<String> = conn
            .query_row("SELECT value FROM blobs WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(persistence)?;

        match text {
            None => Ok(None),
            Some(text) => match serde_json::from_str(&text) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    tracing::warn!("blob under key {} is not valid JSON, treating as absent: {}", key, e);
                    Ok(None)
                }
            },
        }
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let conn = self.conn.lock().expect("blob store lock poisoned");
        let text = serde_json::to_string(value).map_err(persistence)?;
        conn.execute(
            "INSERT INTO blobs (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            (key, &text, Utc::now().to_rfc3339()),
        )
        .map_err(persistence)?;
        Ok(())
    }
}

/// In-memory blob store for tests and `open_memory` fleets.
///
/// Writes can be switched to fail via [`MemoryBlobStore::set_failing`], which
/// lets tests observe that rejected writes never reach the store and that a
/// failed persist surfaces as [`StoreError::Persistence`].
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Value>>,
    failing: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let blobs = self.blobs.lock().expect("blob store lock poisoned");
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Persistence("induced write failure".into()));
        }
        let mut blobs = self.blobs.lock().expect("blob store lock poisoned");
        blobs.insert(key.to_string(), value.clone());
        Ok(())
    }
}

fn persistence(e: impl std::fmt::Display) -> StoreError {
    StoreError::Persistence(e.to_string())
}
