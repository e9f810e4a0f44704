//! Key-value store adapter for the portal.
//!
//! The portal treats storage as a generic string-keyed store: `get`/`set`/
//! `del` over JSON-serialized values, plus set membership (`sadd`/`srem`/
//! `smembers`) for identifier indexes. This module provides that contract
//! over an embedded SQLite database so the rest of the crate never touches
//! SQL directly.
//!
//! Expiry is lazy: an expired entry reads as absent and is deleted on first
//! touch. There is no background sweeper.

mod schema;

pub use schema::*;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value store backed by SQLite.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open store at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Initialize schema.
    fn initialize(&self) -> StoreResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get a raw value, honoring expiry.
    pub fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let row: Option<(String, Option<i64>)> = self
            .conn
            .query_row(
                "SELECT value, expires_at FROM kv_entries WHERE key = ?",
                [key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((_, Some(expires_at))) if expires_at <= now_unix() => {
                // Lazy expiry: drop the stale row and report absence
                self.conn
                    .execute("DELETE FROM kv_entries WHERE key = ?", [key])?;
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value)),
        }
    }

    /// Set a raw value with no expiry.
    pub fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv_entries (key, value, expires_at, updated_at)
            VALUES (?1, ?2, NULL, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                expires_at = NULL,
                updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// Set a raw value that expires after `expiry_seconds`.
    pub fn set_with_expiry(&self, key: &str, value: &str, expiry_seconds: i64) -> StoreResult<()> {
        let expires_at = now_unix() + expiry_seconds;
        self.conn.execute(
            r#"
            INSERT INTO kv_entries (key, value, expires_at, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                expires_at = excluded.expires_at,
                updated_at = datetime('now')
            "#,
            params![key, value, expires_at],
        )?;
        Ok(())
    }

    /// Delete a key. Returns whether a row was removed.
    pub fn del(&self, key: &str) -> StoreResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?", [key])?;
        Ok(rows_affected > 0)
    }

    /// Add a member to a set. Returns false when already present.
    pub fn sadd(&self, set_key: &str, member: &str) -> StoreResult<bool> {
        let rows_affected = self.conn.execute(
            "INSERT OR IGNORE INTO kv_set_members (set_key, member) VALUES (?1, ?2)",
            params![set_key, member],
        )?;
        Ok(rows_affected > 0)
    }

    /// Remove a member from a set. Returns whether it was present.
    pub fn srem(&self, set_key: &str, member: &str) -> StoreResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM kv_set_members WHERE set_key = ?1 AND member = ?2",
            params![set_key, member],
        )?;
        Ok(rows_affected > 0)
    }

    /// List all members of a set, sorted for determinism.
    pub fn smembers(&self, set_key: &str) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT member FROM kv_set_members WHERE set_key = ? ORDER BY member",
        )?;
        let rows = stmt.query_map([set_key], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List keys matching a prefix, sorted.
    pub fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let pattern = format!("{}%", prefix);
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries WHERE key LIKE ? ORDER BY key")?;
        let rows = stmt.query_map([pattern], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Get and deserialize a JSON value.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.get(key)? {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        }
    }

    /// Serialize and set a JSON value.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    fn setup_store() -> Store {
        Store::open_in_memory().unwrap()
    }

    #[test]
    fn test_get_set_roundtrip() {
        let store = setup_store();

        assert!(store.get("missing").unwrap().is_none());

        store.set("client:c1", r#"{"name":"Dana"}"#).unwrap();
        assert_eq!(
            store.get("client:c1").unwrap().as_deref(),
            Some(r#"{"name":"Dana"}"#)
        );

        // Overwrite
        store.set("client:c1", r#"{"name":"Dana R."}"#).unwrap();
        assert_eq!(
            store.get("client:c1").unwrap().as_deref(),
            Some(r#"{"name":"Dana R."}"#)
        );
    }

    #[test]
    fn test_del() {
        let store = setup_store();
        store.set("k", "v").unwrap();

        assert!(store.del("k").unwrap());
        assert!(store.get("k").unwrap().is_none());
        assert!(!store.del("k").unwrap());
    }

    #[test]
    fn test_expired_entry_reads_as_absent() {
        let store = setup_store();

        store.set_with_expiry("session:abc", "token", -1).unwrap();
        assert!(store.get("session:abc").unwrap().is_none());

        // The stale row is gone after the first read
        let keys = store.list_keys("session:").unwrap();
        assert!(keys.is_empty());
    }

    #[test]
    fn test_unexpired_entry_survives() {
        let store = setup_store();
        store.set_with_expiry("session:abc", "token", 3600).unwrap();
        assert_eq!(store.get("session:abc").unwrap().as_deref(), Some("token"));
    }

    #[test]
    fn test_set_membership() {
        let store = setup_store();

        assert!(store.sadd("onboarding:index:c1", "p2").unwrap());
        assert!(store.sadd("onboarding:index:c1", "p1").unwrap());
        // Re-adding is a no-op
        assert!(!store.sadd("onboarding:index:c1", "p1").unwrap());

        let members = store.smembers("onboarding:index:c1").unwrap();
        assert_eq!(members, vec!["p1".to_string(), "p2".to_string()]);

        assert!(store.srem("onboarding:index:c1", "p1").unwrap());
        assert!(!store.srem("onboarding:index:c1", "p1").unwrap());
        assert_eq!(store.smembers("onboarding:index:c1").unwrap(), vec!["p2"]);
    }

    #[test]
    fn test_smembers_empty_set() {
        let store = setup_store();
        assert!(store.smembers("nothing:here").unwrap().is_empty());
    }

    #[test]
    fn test_list_keys_prefix() {
        let store = setup_store();
        store.set("pet:p1", "{}").unwrap();
        store.set("pet:p2", "{}").unwrap();
        store.set("client:c1", "{}").unwrap();

        let keys = store.list_keys("pet:").unwrap();
        assert_eq!(keys, vec!["pet:p1".to_string(), "pet:p2".to_string()]);
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        id: String,
        count: u32,
    }

    #[test]
    fn test_json_helpers() {
        let store = setup_store();
        let sample = Sample {
            id: "s1".into(),
            count: 3,
        };

        store.set_json("sample:s1", &sample).unwrap();
        let loaded: Sample = store.get_json("sample:s1").unwrap().unwrap();
        assert_eq!(loaded, sample);

        let missing: Option<Sample> = store.get_json("sample:s2").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portal.db");

        {
            let store = Store::open(&path).unwrap();
            store.set("k", "v").unwrap();
        }

        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
    }
}
