//! SQLite-backed document store.
//!
//! Documents are JSON text in a single key/value table.

use rusqlite::{params, Connection};
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;

use super::{subscribe_with, DocumentStore, OnChange, StoreKey, Subscribers, Subscription};
use crate::config::{data_dir, Config};
use crate::error::{CoreError, StoreError};

pub struct SqliteStore {
    conn: Mutex<Connection>,
    subscribers: Subscribers,
}

impl SqliteStore {
    /// Open the database named in `config` inside the data directory.
    pub fn open(config: &Config) -> Result<Self, CoreError> {
        let path = data_dir()?.join(&config.storage.database_file);
        Ok(Self::open_path(&path)?)
    }

    /// Open (or create) the database at `path`.
    pub fn open_path(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            subscribers: Subscribers::default(),
        })
    }
}

impl DocumentStore for SqliteStore {
    fn get(&self, key: StoreKey) -> Result<Option<Value>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Locked)?;
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let raw = match stmt.query_row(params![key.as_str()], |row| row.get::<_, String>(0)) {
            Ok(v) => v,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Malformed {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    fn set(&self, key: StoreKey, value: &Value) -> Result<(), StoreError> {
        {
            let conn = self.conn.lock().map_err(|_| StoreError::Locked)?;
            conn.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key.as_str(), value.to_string()],
            )?;
        }
        self.subscribers.publish(key, value);
        Ok(())
    }

    fn subscribe(&self, key: StoreKey, on_change: OnChange) -> Result<Subscription, StoreError> {
        subscribe_with(self, &self.subscribers, key, on_change)
    }

    fn unsubscribe(&self, subscription: &Subscription) {
        self.subscribers.remove(subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kv_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(store.get(StoreKey::AiMemories).unwrap().is_none());
        store.set(StoreKey::AiMemories, &json!("hello")).unwrap();
        assert_eq!(store.get(StoreKey::AiMemories).unwrap(), Some(json!("hello")));

        store.set(StoreKey::AiMemories, &json!("again")).unwrap();
        assert_eq!(store.get(StoreKey::AiMemories).unwrap(), Some(json!("again")));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lifeos.db");
        {
            let store = SqliteStore::open_path(&path).unwrap();
            store.set(StoreKey::DailyReviewStreak, &json!(3)).unwrap();
        }
        let store = SqliteStore::open_path(&path).unwrap();
        assert_eq!(store.get(StoreKey::DailyReviewStreak).unwrap(), Some(json!(3)));
    }

    #[test]
    fn test_subscribe_seeds_default() {
        let store = SqliteStore::open_memory().unwrap();
        let sub = store
            .subscribe(StoreKey::Settings, std::sync::Arc::new(|_: &Value| {}))
            .unwrap();
        assert_eq!(sub.key, StoreKey::Settings);
        let settings = store.get(StoreKey::Settings).unwrap().unwrap();
        assert_eq!(settings["monthlySpend"], 1500.0);
    }
}
