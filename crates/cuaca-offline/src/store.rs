//! Versioned response store backing the offline shell.
//!
//! One SQLite file per cache version under a shared root directory.
//! Activation keeps only the current version's file, so bumping the
//! version tag invalidates everything stored by earlier shells.

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// A stored HTTP response, as served when the network cannot answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl StoredResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub struct ShellStore {
    name: String,
    root: PathBuf,
    conn: Mutex<Connection>,
}

impl ShellStore {
    /// Open (or create) the store for `name` under `root`.
    pub fn open(root: &Path, name: &str) -> Result<Self, StoreError> {
        std::fs::create_dir_all(root)
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", root.display(), e)))?;

        let conn = Connection::open(Self::store_path(root, name))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS responses (
                url TEXT PRIMARY KEY,
                status INTEGER NOT NULL,
                content_type TEXT,
                body BLOB NOT NULL,
                stored_at_ms INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(Self {
            name: name.to_string(),
            root: root.to_path_buf(),
            conn: Mutex::new(conn),
        })
    }

    fn store_path(root: &Path, name: &str) -> PathBuf {
        root.join(format!("{name}.sqlite"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store a response, overwriting any prior entry for the same URL.
    pub fn put(&self, response: &StoredResponse) -> Result<(), StoreError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        self.conn.lock().execute(
            r#"
            INSERT OR REPLACE INTO responses (url, status, content_type, body, stored_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                response.url,
                response.status,
                response.content_type,
                response.body,
                now,
            ],
        )?;
        Ok(())
    }

    /// Look up the stored response for an exact URL. Read failures are
    /// treated as misses.
    pub fn lookup(&self, url: &str) -> Option<StoredResponse> {
        self.conn
            .lock()
            .query_row(
                "SELECT url, status, content_type, body FROM responses WHERE url = ?1",
                params![url],
                |row| {
                    Ok(StoredResponse {
                        url: row.get(0)?,
                        status: row.get::<_, i64>(1)? as u16,
                        content_type: row.get(2)?,
                        body: row.get(3)?,
                    })
                },
            )
            .optional()
            .unwrap_or_else(|e| {
                tracing::debug!("Store lookup failed for {}: {}", url, e);
                None
            })
    }

    /// URLs of every stored response.
    pub fn keys(&self) -> Vec<String> {
        let conn = self.conn.lock();
        let mut stmt = match conn.prepare("SELECT url FROM responses ORDER BY url") {
            Ok(stmt) => stmt,
            Err(e) => {
                tracing::debug!("Store keys query failed: {}", e);
                return Vec::new();
            }
        };

        let result = match stmt.query_map([], |row| row.get::<_, String>(0)) {
            Ok(rows) => rows.filter_map(Result::ok).collect(),
            Err(e) => {
                tracing::debug!("Store keys query failed: {}", e);
                Vec::new()
            }
        };
        result
    }

    /// Delete every sibling version store whose name differs from `keep`.
    /// Returns the number of stores removed.
    pub fn purge_stale_versions(root: &Path, keep: &str) -> usize {
        let Ok(entries) = std::fs::read_dir(root) else {
            return 0;
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            let is_store = path.extension().is_some_and(|ext| ext == "sqlite");
            let is_current = path
                .file_stem()
                .is_some_and(|stem| stem == std::ffi::OsStr::new(keep));
            if is_store && !is_current {
                match std::fs::remove_file(&path) {
                    Ok(()) => {
                        tracing::info!("Removed stale shell cache {}", path.display());
                        removed += 1;
                    }
                    Err(e) => tracing::warn!("Could not remove {}: {}", path.display(), e),
                }
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(url: &str, body: &[u8]) -> StoredResponse {
        StoredResponse {
            url: url.to_string(),
            status: 200,
            content_type: Some("application/json".to_string()),
            body: body.to_vec(),
        }
    }

    #[test]
    fn put_then_lookup_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShellStore::open(dir.path(), "shell-v1").unwrap();

        let resp = response("https://example.com/v1/forecast?latitude=1", b"{\"ok\":true}");
        store.put(&resp).unwrap();

        assert_eq!(store.lookup(&resp.url), Some(resp));
        assert!(store.lookup("https://example.com/other").is_none());
    }

    #[test]
    fn put_overwrites_same_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShellStore::open(dir.path(), "shell-v1").unwrap();

        store.put(&response("https://example.com/a", b"one")).unwrap();
        store.put(&response("https://example.com/a", b"two")).unwrap();

        let stored = store.lookup("https://example.com/a").unwrap();
        assert_eq!(stored.body, b"two");
        assert_eq!(store.keys().len(), 1);
    }

    #[test]
    fn keys_lists_stored_urls() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShellStore::open(dir.path(), "shell-v1").unwrap();

        store.put(&response("https://example.com/b", b"x")).unwrap();
        store.put(&response("https://example.com/a", b"y")).unwrap();

        assert_eq!(
            store.keys(),
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = ShellStore::open(dir.path(), "shell-v1").unwrap();
            store.put(&response("https://example.com/a", b"kept")).unwrap();
        }

        let store = ShellStore::open(dir.path(), "shell-v1").unwrap();
        assert_eq!(store.lookup("https://example.com/a").map(|r| r.body), Some(b"kept".to_vec()));
    }

    #[test]
    fn purge_removes_only_other_versions() {
        let dir = tempfile::tempdir().unwrap();
        let old = ShellStore::open(dir.path(), "shell-v1").unwrap();
        old.put(&response("https://example.com/a", b"old")).unwrap();
        drop(old);
        let current = ShellStore::open(dir.path(), "shell-v2").unwrap();
        current.put(&response("https://example.com/a", b"new")).unwrap();

        let removed = ShellStore::purge_stale_versions(dir.path(), "shell-v2");
        assert_eq!(removed, 1);
        assert!(!dir.path().join("shell-v1.sqlite").exists());
        assert!(dir.path().join("shell-v2.sqlite").exists());

        // Current store still serves
        assert!(current.lookup("https://example.com/a").is_some());
    }

    #[test]
    fn purge_on_missing_root_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(ShellStore::purge_stale_versions(&missing, "shell-v2"), 0);
    }
}
