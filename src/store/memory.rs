//! In-process cache store.
//!
//! Buckets and entries live in interior-mutable maps; cloning a store or a
//! bucket handle shares the underlying state. This is the store used by the
//! test suite and by embedders that bring their own persistence.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::http::Response;
use crate::store::{CacheBucket, CacheStore, StoreError};

/// An in-memory store of named cache buckets.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    buckets: Arc<RwLock<HashMap<String, MemoryBucket>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Handle to one in-memory bucket. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryBucket {
    entries: Arc<RwLock<HashMap<String, Response>>>,
}

impl CacheStore for MemoryStore {
    type Bucket = MemoryBucket;

    fn open(&self, name: &str) -> Result<Self::Bucket, StoreError> {
        let mut buckets = self.buckets.write().map_err(|_| StoreError::LockPoisoned)?;
        let bucket = buckets.entry(name.to_string()).or_default();
        Ok(bucket.clone())
    }

    fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let mut buckets = self.buckets.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(buckets.remove(name).is_some())
    }

    fn bucket_names(&self) -> Result<Vec<String>, StoreError> {
        let buckets = self.buckets.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(buckets.keys().cloned().collect())
    }
}

impl CacheBucket for MemoryBucket {
    fn put(&self, key: &str, response: Response) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(key.to_string(), response);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Response>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_bucket() {
        let store = MemoryStore::new();
        assert!(store.bucket_names().unwrap().is_empty());

        store.open("v1").expect("Failed to open bucket");
        assert_eq!(store.bucket_names().unwrap(), vec!["v1".to_string()]);
    }

    #[test]
    fn test_open_same_bucket_shares_entries() {
        let store = MemoryStore::new();
        let first = store.open("v1").unwrap();
        first.put("/", Response::new(200, b"root".to_vec())).unwrap();

        let second = store.open("v1").unwrap();
        let cached = second.get("/").unwrap().expect("Entry should be visible");
        assert_eq!(cached.body, b"root");
    }

    #[test]
    fn test_put_overwrites_existing_entry() {
        let store = MemoryStore::new();
        let bucket = store.open("v1").unwrap();

        bucket.put("/", Response::new(200, b"old".to_vec())).unwrap();
        bucket.put("/", Response::new(200, b"new".to_vec())).unwrap();

        assert_eq!(bucket.keys().unwrap().len(), 1);
        assert_eq!(bucket.get("/").unwrap().unwrap().body, b"new");
    }

    #[test]
    fn test_get_missing_key_returns_none() {
        let store = MemoryStore::new();
        let bucket = store.open("v1").unwrap();
        assert!(bucket.get("/missing").unwrap().is_none());
    }

    #[test]
    fn test_delete_bucket() {
        let store = MemoryStore::new();
        store.open("v1").unwrap();
        store.open("v2").unwrap();

        assert!(store.delete("v1").unwrap());
        assert!(!store.delete("v1").unwrap());
        assert_eq!(store.bucket_names().unwrap(), vec!["v2".to_string()]);
    }

    #[test]
    fn test_cloned_store_shares_buckets() {
        let store = MemoryStore::new();
        let clone = store.clone();

        store.open("v1").unwrap();
        assert_eq!(clone.bucket_names().unwrap(), vec!["v1".to_string()]);
    }
}
