//! Database module - SQLite storage for resolved exercise records

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::warn;

use crate::error::StoreError;
use crate::exercises::ExerciseRecord;

/// Durable, cross-session record cache keyed by normalized name
#[async_trait]
pub trait PersistentCache: Send + Sync {
    /// `None` on miss
    async fn get(&self, key: &str) -> Result<Option<ExerciseRecord>, StoreError>;

    /// Upsert; the last writer wins
    async fn put(&self, key: &str, record: &ExerciseRecord) -> Result<(), StoreError>;
}

/// Database wrapper
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Private in-memory database, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<(), StoreError> {
        self.lock().execute(
            "CREATE TABLE IF NOT EXISTS exercise_media_cache (
                cache_key TEXT PRIMARY KEY,
                record_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read a record; rows that no longer deserialize count as misses
    pub fn get_record(&self, key: &str) -> Result<Option<ExerciseRecord>, StoreError> {
        let json: Option<String> = self
            .lock()
            .query_row(
                "SELECT record_json FROM exercise_media_cache WHERE cache_key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(json.and_then(|json| match serde_json::from_str(&json) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(key = %key, error = %e, "Ignoring unreadable cached record");
                None
            }
        }))
    }

    /// Insert or replace the record stored under `key`
    pub fn put_record(&self, key: &str, record: &ExerciseRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)?;
        self.lock().execute(
            "INSERT INTO exercise_media_cache (cache_key, record_json, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(cache_key) DO UPDATE SET record_json = excluded.record_json, updated_at = excluded.updated_at",
            params![key, json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Number of cached records
    pub fn len(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .lock()
            .query_row("SELECT COUNT(*) FROM exercise_media_cache", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl PersistentCache for Database {
    async fn get(&self, key: &str) -> Result<Option<ExerciseRecord>, StoreError> {
        let db = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || db.get_record(&key))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    async fn put(&self, key: &str, record: &ExerciseRecord) -> Result<(), StoreError> {
        let db = self.clone();
        let key = key.to_string();
        let record = record.clone();
        tokio::task::spawn_blocking(move || db.put_record(&key, &record))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::{Angle, Gender, MediaVariant};

    fn record(name: &str) -> ExerciseRecord {
        ExerciseRecord::new(
            name,
            vec![MediaVariant {
                url: format!("https://cdn/{}.mp4", name.replace(' ', "-")),
                angle: Angle::Front,
                gender: Gender::Male,
            }],
        )
    }

    #[test]
    fn test_miss_returns_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_record("hack squat").unwrap().is_none());
        assert!(db.is_empty().unwrap());
    }

    #[test]
    fn test_put_then_get() {
        let db = Database::open_in_memory().unwrap();
        db.put_record("hack squat", &record("Hack Squat")).unwrap();
        assert_eq!(db.get_record("hack squat").unwrap(), Some(record("Hack Squat")));
        assert_eq!(db.len().unwrap(), 1);
    }

    #[test]
    fn test_upsert_replaces() {
        let db = Database::open_in_memory().unwrap();
        db.put_record("row", &record("Row")).unwrap();
        db.put_record("row", &record("Pendlay Row")).unwrap();
        assert_eq!(db.len().unwrap(), 1);
        assert_eq!(db.get_record("row").unwrap().unwrap().name, "Pendlay Row");
    }

    #[test]
    fn test_corrupt_row_reads_as_miss() {
        let db = Database::open_in_memory().unwrap();
        db.lock()
            .execute(
                "INSERT INTO exercise_media_cache (cache_key, record_json, updated_at) VALUES ('bad', '{', '')",
                [],
            )
            .unwrap();
        assert!(db.get_record("bad").unwrap().is_none());
    }

    #[test]
    fn test_schema_init_is_repeatable() {
        let db = Database::open_in_memory().unwrap();
        db.init_schema().unwrap();
        db.put_record("a", &record("A")).unwrap();
        db.init_schema().unwrap();
        assert_eq!(db.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_async_trait_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        let cache: &dyn PersistentCache = &db;
        cache.put("front squat", &record("Front Squat")).await.unwrap();
        let found = cache.get("front squat").await.unwrap();
        assert_eq!(found.map(|r| r.name), Some("Front Squat".to_string()));
    }
}
