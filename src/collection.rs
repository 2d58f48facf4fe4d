// src/collection.rs

//! Typed collections stored as a single blob
//!
//! A `Collection<T>` binds a blob store to one bucket and stores all of its
//! items as one JSON array. Every mutation reads the whole array, changes it
//! in memory and writes the whole array back.
//!
//! The read and the write are two separate store transactions. With
//! [`WriteMode::LastWriterWins`] a concurrent writer's change made between
//! them is silently overwritten (lost update). [`WriteMode::CompareAndSwap`]
//! detects that case and retries the cycle instead.

use crate::db::BlobStore;
use crate::error::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Maximum read-modify-write attempts under compare-and-swap
pub const MAX_CAS_ATTEMPTS: u32 = 5;

/// How a modified snapshot is written back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Unconditional write; overlapping updates may be lost
    #[default]
    LastWriterWins,
    /// Write only if nobody wrote since the snapshot was read
    CompareAndSwap,
}

/// Items of a collection together with the version they were read at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    pub items: Vec<T>,
    pub version: u64,
}

/// A named, persisted, ordered collection of `T`
#[derive(Debug)]
pub struct Collection<T> {
    store: BlobStore,
    bucket: String,
    write_mode: WriteMode,
    _items: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            bucket: self.bucket.clone(),
            write_mode: self.write_mode,
            _items: PhantomData,
        }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind to `bucket`, creating it if it does not exist
    pub fn open(store: BlobStore, bucket: impl Into<String>, write_mode: WriteMode) -> Result<Self> {
        let bucket = bucket.into();
        store.ensure(&bucket)?;
        Ok(Self {
            store,
            bucket,
            write_mode,
            _items: PhantomData,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    pub fn store(&self) -> &BlobStore {
        &self.store
    }

    /// Current items, in stored order
    pub fn list(&self) -> Result<Vec<T>> {
        Ok(self.load()?.items)
    }

    /// Read the current items and the version they belong to
    ///
    /// A blob that cannot be decoded is logged and treated as empty.
    pub fn load(&self) -> Result<Snapshot<T>> {
        let blob = self.store.get(&self.bucket)?;
        let items = match decode(&self.bucket, &blob.data) {
            Ok(items) => items,
            Err(e) => {
                warn!("{}; treating collection as empty", e);
                Vec::new()
            }
        };
        Ok(Snapshot {
            items,
            version: blob.version,
        })
    }

    /// Write a (modified) snapshot back according to the write mode
    pub fn commit(&self, snapshot: &Snapshot<T>) -> Result<u64> {
        let data = encode(&self.bucket, &snapshot.items)?;
        match self.write_mode {
            WriteMode::LastWriterWins => self.store.put(&self.bucket, &data),
            WriteMode::CompareAndSwap => {
                self.store
                    .put_if_version(&self.bucket, snapshot.version, &data)
            }
        }
    }

    /// Run one read-modify-write cycle, retrying on conflicts under CAS
    pub fn update<R, F>(&self, mut f: F) -> Result<R>
    where
        F: FnMut(&mut Vec<T>) -> R,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut snapshot = self.load()?;
            let result = f(&mut snapshot.items);

            match self.commit(&snapshot) {
                Ok(_) => return Ok(result),
                Err(Error::VersionConflict { found, .. }) if attempt < MAX_CAS_ATTEMPTS => {
                    debug!(
                        "Conflict on '{}' (read {}, now {}), retrying (attempt {})",
                        self.bucket, snapshot.version, found, attempt
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Append items at the end, keeping existing ones
    pub fn append<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Clone,
    {
        let items: Vec<T> = items.into_iter().collect();
        self.update(|current| current.extend(items.iter().cloned()))
    }

    /// Remove every item matching `pred`, returning how many were removed
    pub fn remove_where<P>(&self, pred: P) -> Result<usize>
    where
        P: Fn(&T) -> bool,
    {
        self.update(|current| {
            let before = current.len();
            current.retain(|item| !pred(item));
            before - current.len()
        })
    }
}

/// Decode a stored blob; empty bytes and `null` both mean "no items"
fn decode<T: DeserializeOwned>(bucket: &str, data: &[u8]) -> Result<Vec<T>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let items: Option<Vec<T>> =
        serde_json::from_slice(data).map_err(|source| Error::DecodeFailure {
            bucket: bucket.to_string(),
            source,
        })?;
    Ok(items.unwrap_or_default())
}

fn encode<T: Serialize>(bucket: &str, items: &[T]) -> Result<Vec<u8>> {
    serde_json::to_vec(items).map_err(|source| Error::EncodeFailure {
        bucket: bucket.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StoreConfig;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        name: String,
    }

    fn item(name: &str) -> Item {
        Item {
            name: name.to_string(),
        }
    }

    fn open(mode: WriteMode) -> (TempDir, Collection<Item>) {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::open(StoreConfig::new(dir.path().join("c.db"))).unwrap();
        let collection = Collection::open(store, "items", mode).unwrap();
        (dir, collection)
    }

    #[test]
    fn test_decode_empty_and_null() {
        assert!(decode::<Item>("b", b"").unwrap().is_empty());
        assert!(decode::<Item>("b", b"null").unwrap().is_empty());
        assert!(matches!(
            decode::<Item>("b", b"{not json"),
            Err(Error::DecodeFailure { .. })
        ));
    }

    #[test]
    fn test_corrupt_blob_reads_as_empty() {
        let (_dir, collection) = open(WriteMode::LastWriterWins);
        collection.store().put("items", b"definitely not json").unwrap();

        assert!(collection.list().unwrap().is_empty());

        // The next write replaces the corrupt blob
        collection.append([item("a")]).unwrap();
        assert_eq!(collection.list().unwrap(), vec![item("a")]);
    }

    #[test]
    fn test_append_and_remove() {
        let (_dir, collection) = open(WriteMode::LastWriterWins);
        collection.append([item("a"), item("b")]).unwrap();
        collection.append([item("a")]).unwrap();

        assert_eq!(collection.remove_where(|i| i.name == "a").unwrap(), 2);
        assert_eq!(collection.list().unwrap(), vec![item("b")]);
    }

    #[test]
    fn test_stale_snapshot_overwrites_under_last_writer_wins() {
        let (_dir, collection) = open(WriteMode::LastWriterWins);
        let mut first = collection.load().unwrap();
        let mut second = collection.load().unwrap();

        first.items.push(item("milk"));
        collection.commit(&first).unwrap();

        second.items.push(item("cheese"));
        collection.commit(&second).unwrap();

        assert_eq!(collection.list().unwrap(), vec![item("cheese")]);
    }

    #[test]
    fn test_stale_snapshot_rejected_under_compare_and_swap() {
        let (_dir, collection) = open(WriteMode::CompareAndSwap);
        let mut first = collection.load().unwrap();
        let mut second = collection.load().unwrap();

        first.items.push(item("milk"));
        collection.commit(&first).unwrap();

        second.items.push(item("cheese"));
        let err = collection.commit(&second).unwrap_err();
        assert!(matches!(err, Error::VersionConflict { .. }));

        assert_eq!(collection.list().unwrap(), vec![item("milk")]);
    }

    #[test]
    fn test_update_retries_after_conflict() {
        let (_dir, collection) = open(WriteMode::CompareAndSwap);
        let other = collection.clone();
        let mut interfered = false;

        collection
            .update(|items| {
                if !interfered {
                    // Another writer sneaks in between our read and our write
                    other.append([item("cheese")]).unwrap();
                    interfered = true;
                }
                items.push(item("milk"));
            })
            .unwrap();

        assert_eq!(collection.list().unwrap(), vec![item("cheese"), item("milk")]);
    }
}
