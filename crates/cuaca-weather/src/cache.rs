//! Persistent snapshot cache: a string-keyed store with read-time expiry.
//!
//! Freshness policy belongs to the caller; the cache only stamps entries
//! with their capture time. Every failure path degrades to a cache miss:
//! `save` and `load` never return an error and never panic.

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub struct SnapshotCache {
    // None when the backing store could not be opened; all ops then miss.
    conn: Option<Mutex<Connection>>,
}

impl SnapshotCache {
    /// Open (or create) the cache at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_open(path.as_ref()) {
            Ok(conn) => Self {
                conn: Some(Mutex::new(conn)),
            },
            Err(e) => {
                tracing::warn!("Snapshot cache unavailable, all reads will miss: {}", e);
                Self { conn: None }
            }
        }
    }

    /// Create an in-memory cache (for testing).
    #[cfg(test)]
    pub fn in_memory() -> Self {
        match Connection::open_in_memory().and_then(|conn| {
            Self::init_schema(&conn)?;
            Ok(conn)
        }) {
            Ok(conn) => Self {
                conn: Some(Mutex::new(conn)),
            },
            Err(_) => Self { conn: None },
        }
    }

    fn try_open(path: &Path) -> rusqlite::Result<Connection> {
        if let Some(parent) = path.parent() {
            // Creation failure surfaces as an open failure right after
            let _ = std::fs::create_dir_all(parent);
        }
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(conn)
    }

    fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                key TEXT PRIMARY KEY,
                captured_at_ms INTEGER NOT NULL,
                payload TEXT NOT NULL
            );
            "#,
        )
    }

    /// Store a payload under `key`, overwriting any prior snapshot.
    /// Serialization or storage failures are dropped (next read misses).
    pub fn save<T: Serialize>(&self, key: &str, payload: &T) {
        let Some(conn) = &self.conn else {
            return;
        };

        let json = match serde_json::to_string(payload) {
            Ok(json) => json,
            Err(e) => {
                tracing::debug!("Dropping snapshot write for {}: {}", key, e);
                return;
            }
        };

        let result = conn.lock().execute(
            "INSERT OR REPLACE INTO snapshots (key, captured_at_ms, payload) VALUES (?1, ?2, ?3)",
            params![key, epoch_ms(), json],
        );
        if let Err(e) = result {
            tracing::debug!("Dropping snapshot write for {}: {}", key, e);
        }
    }

    /// Read the payload at `key` if it exists, deserializes, and is no
    /// older than `max_age`.
    pub fn load<T: DeserializeOwned>(&self, key: &str, max_age: Duration) -> Option<T> {
        let conn = self.conn.as_ref()?;

        let row: (i64, String) = conn
            .lock()
            .query_row(
                "SELECT captured_at_ms, payload FROM snapshots WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .unwrap_or_else(|e| {
                tracing::debug!("Snapshot read failed for {}: {}", key, e);
                None
            })?;

        let (captured_at_ms, payload) = row;
        let age_ms = epoch_ms().saturating_sub(captured_at_ms);
        if age_ms > max_age.as_millis() as i64 {
            tracing::debug!("Snapshot for {} expired ({} ms old)", key, age_ms);
            return None;
        }

        match serde_json::from_str(&payload) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("Corrupt snapshot for {}: {}", key, e);
                None
            }
        }
    }
}

fn epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
