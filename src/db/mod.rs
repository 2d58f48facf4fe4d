// src/db/mod.rs

//! Blob Collection Store
//!
//! A single SQLite file holds any number of named buckets. Each bucket stores
//! exactly one blob (one whole serialized collection) together with a version
//! counter that increments on every write.
//!
//! No connection is kept between calls: every operation opens the file,
//! waits at most `open_timeout` for competing writers, does its work in its
//! own transaction and closes the file again. Other processes can safely
//! use the same file between calls.

pub mod paths;
pub mod schema;

use crate::error::{Error, Result};
use rusqlite::{Connection, ErrorCode, OptionalExtension, TransactionBehavior, params};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Default time to wait for the storage file before giving up
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(1);

/// Location and open behaviour of a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path to the SQLite file
    pub path: PathBuf,
    /// How long to wait for a lock held by another writer
    pub open_timeout: Duration,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            open_timeout: DEFAULT_OPEN_TIMEOUT,
        }
    }

    pub fn with_open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = timeout;
        self
    }
}

/// Contents of one bucket as read at a single point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob {
    /// The stored bytes; empty if the bucket was never written
    pub data: Vec<u8>,
    /// Number of successful writes to the bucket
    pub version: u64,
}

impl Blob {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Handle to a blob store file
///
/// Cheap to clone; holds only configuration.
#[derive(Debug, Clone)]
pub struct BlobStore {
    config: StoreConfig,
}

impl BlobStore {
    /// Open (creating if needed) the store file and bring its schema up to date
    pub fn open(config: StoreConfig) -> Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::StorageUnavailable {
                    path: config.path.clone(),
                    reason: format!("cannot create {}: {}", parent.display(), e),
                })?;
            }
        }

        let store = Self { config };
        let mut conn = store.connect()?;
        transaction(&mut conn, schema::migrate).map_err(|e| store.classify(e))?;
        info!("Opened blob store at {}", store.path().display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Create the named bucket if it does not exist yet
    pub fn ensure(&self, bucket: &str) -> Result<()> {
        let mut conn = self.connect()?;
        let created = transaction(&mut conn, |tx| {
            Ok(tx.execute(
                "INSERT OR IGNORE INTO buckets (name) VALUES (?1)",
                [bucket],
            )?)
        })
        .map_err(|e| self.classify(e))?;

        if created > 0 {
            info!("Created bucket '{}'", bucket);
        }
        Ok(())
    }

    /// Read the last written blob of a bucket
    pub fn get(&self, bucket: &str) -> Result<Blob> {
        let conn = self.connect()?;
        let row: Option<(Option<Vec<u8>>, i64)> = conn
            .query_row(
                "SELECT data, version FROM buckets WHERE name = ?1",
                [bucket],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| self.classify(e.into()))?;

        let (data, version) = row.ok_or_else(|| Error::BucketNotFound(bucket.to_string()))?;
        let blob = Blob {
            data: data.unwrap_or_default(),
            version: version as u64,
        };
        debug!(
            "Read {} bytes from bucket '{}' at version {}",
            blob.data.len(),
            bucket,
            blob.version
        );
        Ok(blob)
    }

    /// Replace the whole blob of a bucket, returning the new version
    pub fn put(&self, bucket: &str, data: &[u8]) -> Result<u64> {
        let mut conn = self.connect()?;
        let version = transaction(&mut conn, |tx| {
            let updated = tx.execute(
                "UPDATE buckets
                 SET data = ?2, version = version + 1, updated_at = CURRENT_TIMESTAMP
                 WHERE name = ?1",
                params![bucket, data],
            )?;
            if updated == 0 {
                return Err(Error::BucketNotFound(bucket.to_string()));
            }
            current_version(tx, bucket)
        })
        .map_err(|e| self.classify(e))?;

        debug!(
            "Wrote {} bytes to bucket '{}' (version {})",
            data.len(),
            bucket,
            version
        );
        Ok(version)
    }

    /// Replace the blob only if the bucket is still at `expected` version
    pub fn put_if_version(&self, bucket: &str, expected: u64, data: &[u8]) -> Result<u64> {
        let mut conn = self.connect()?;
        let version = transaction(&mut conn, |tx| {
            let updated = tx.execute(
                "UPDATE buckets
                 SET data = ?2, version = version + 1, updated_at = CURRENT_TIMESTAMP
                 WHERE name = ?1 AND version = ?3",
                params![bucket, data, expected as i64],
            )?;
            let found = current_version(tx, bucket)?;
            if updated == 0 {
                return Err(Error::VersionConflict {
                    bucket: bucket.to_string(),
                    expected,
                    found,
                });
            }
            Ok(found)
        })
        .map_err(|e| self.classify(e))?;

        debug!(
            "Swapped {} bytes into bucket '{}' (version {} -> {})",
            data.len(),
            bucket,
            expected,
            version
        );
        Ok(version)
    }

    /// Remove a bucket and everything stored in it
    pub fn drop_bucket(&self, bucket: &str) -> Result<bool> {
        let mut conn = self.connect()?;
        let removed = transaction(&mut conn, |tx| {
            Ok(tx.execute("DELETE FROM buckets WHERE name = ?1", [bucket])?)
        })
        .map_err(|e| self.classify(e))?;

        if removed > 0 {
            info!("Dropped bucket '{}'", bucket);
        }
        Ok(removed > 0)
    }

    /// Names of all buckets in the store
    pub fn buckets(&self) -> Result<Vec<String>> {
        let conn = self.connect()?;
        bucket_names(&conn).map_err(|e| self.classify(e))
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.config.path).map_err(|e| self.classify(e.into()))?;
        conn.busy_timeout(self.config.open_timeout)
            .map_err(|e| self.classify(e.into()))?;
        Ok(conn)
    }

    /// Turn SQLite failures that mean "cannot use the file" into `StorageUnavailable`
    fn classify(&self, err: Error) -> Error {
        match err {
            Error::Database(rusqlite::Error::SqliteFailure(ref failure, _))
                if is_unavailable(failure.code) =>
            {
                Error::StorageUnavailable {
                    path: self.config.path.clone(),
                    reason: err.to_string(),
                }
            }
            other => other,
        }
    }
}

fn is_unavailable(code: ErrorCode) -> bool {
    matches!(
        code,
        ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::CannotOpen
            | ErrorCode::PermissionDenied
            | ErrorCode::NotADatabase
            | ErrorCode::DatabaseCorrupt
            | ErrorCode::ReadOnly
    )
}

fn bucket_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM buckets ORDER BY name")?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(names)
}

fn current_version(conn: &Connection, bucket: &str) -> Result<u64> {
    let version: i64 = conn.query_row(
        "SELECT version FROM buckets WHERE name = ?1",
        [bucket],
        |row| row.get(0),
    )?;
    Ok(version as u64)
}

/// Run `f` inside an IMMEDIATE transaction, committing on success
///
/// IMMEDIATE takes the write lock up front so a busy file is reported when
/// the transaction starts rather than halfway through it.
pub fn transaction<T, F>(conn: &mut Connection, f: F) -> Result<T>
where
    F: FnOnce(&Connection) -> Result<T>,
{
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let value = f(&*tx)?;
    tx.commit()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, BlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("test.db"))
            .with_open_timeout(Duration::from_millis(100));
        let store = BlobStore::open(config).unwrap();
        (dir, store)
    }

    #[test]
    fn test_get_never_written_bucket_is_empty() {
        let (_dir, store) = test_store();
        store.ensure("inventory").unwrap();

        let blob = store.get("inventory").unwrap();
        assert!(blob.is_empty());
        assert_eq!(blob.version, 0);
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let (_dir, store) = test_store();
        store.ensure("inventory").unwrap();
        store.put("inventory", b"[1]").unwrap();
        store.ensure("inventory").unwrap();

        assert_eq!(store.get("inventory").unwrap().data, b"[1]");
        assert_eq!(store.buckets().unwrap(), vec!["inventory".to_string()]);
    }

    #[test]
    fn test_put_replaces_whole_blob() {
        let (_dir, store) = test_store();
        store.ensure("recipes").unwrap();

        assert_eq!(store.put("recipes", b"first, and longer").unwrap(), 1);
        assert_eq!(store.put("recipes", b"second").unwrap(), 2);

        let blob = store.get("recipes").unwrap();
        assert_eq!(blob.data, b"second");
        assert_eq!(blob.version, 2);
    }

    #[test]
    fn test_buckets_are_independent() {
        let (_dir, store) = test_store();
        store.ensure("inventory").unwrap();
        store.ensure("recipes").unwrap();

        store.put("inventory", b"milk").unwrap();

        assert_eq!(store.get("inventory").unwrap().data, b"milk");
        assert!(store.get("recipes").unwrap().is_empty());
    }

    #[test]
    fn test_missing_bucket() {
        let (_dir, store) = test_store();
        assert!(matches!(store.get("nope"), Err(Error::BucketNotFound(_))));
        assert!(matches!(
            store.put("nope", b"x"),
            Err(Error::BucketNotFound(_))
        ));
    }

    #[test]
    fn test_put_if_version() {
        let (_dir, store) = test_store();
        store.ensure("inventory").unwrap();

        assert_eq!(store.put_if_version("inventory", 0, b"a").unwrap(), 1);

        let err = store.put_if_version("inventory", 0, b"b").unwrap_err();
        match err {
            Error::VersionConflict {
                expected, found, ..
            } => {
                assert_eq!(expected, 0);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.get("inventory").unwrap().data, b"a");
    }

    #[test]
    fn test_drop_bucket() {
        let (_dir, store) = test_store();
        store.ensure("inventory").unwrap();
        store.put("inventory", b"x").unwrap();

        assert!(store.drop_bucket("inventory").unwrap());
        assert!(!store.drop_bucket("inventory").unwrap());
        assert!(matches!(
            store.get("inventory"),
            Err(Error::BucketNotFound(_))
        ));
    }

    #[test]
    fn test_locked_file_is_unavailable() {
        let (_dir, store) = test_store();
        store.ensure("inventory").unwrap();

        let holder = Connection::open(store.path()).unwrap();
        holder.execute_batch("BEGIN EXCLUSIVE;").unwrap();

        let err = store.put("inventory", b"x").unwrap_err();
        assert!(err.is_storage_unavailable(), "got {err}");
        let err = store.get("inventory").unwrap_err();
        assert!(err.is_storage_unavailable(), "got {err}");

        holder.execute_batch("ROLLBACK;").unwrap();
        store.put("inventory", b"x").unwrap();
    }

    #[test]
    fn test_garbage_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, vec![b'x'; 4096]).unwrap();

        let err = BlobStore::open(StoreConfig::new(&path)).unwrap_err();
        assert!(err.is_storage_unavailable(), "got {err}");
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/cookme.db");

        let store = BlobStore::open(StoreConfig::new(&path)).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_uncreatable_parent_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is needed
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = BlobStore::open(StoreConfig::new(blocker.join("data/cookme.db"))).unwrap_err();
        assert!(err.is_storage_unavailable(), "got {err}");
    }
}
