//! Cache store abstraction: named, versioned buckets of cached responses.
//!
//! The store is an external collaborator to the worker. A [`CacheStore`]
//! maps bucket names (version strings) to buckets; a [`CacheBucket`] maps
//! request URLs to responses. Two implementations ship: an in-process
//! [`MemoryStore`](memory::MemoryStore) and a filesystem-backed
//! [`DiskStore`](disk::DiskStore).

pub mod disk;
pub mod memory;

pub use disk::DiskStore;
pub use memory::MemoryStore;

use thiserror::Error;

use crate::http::Response;

/// Errors that can occur in cache store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed
    #[error("Cache store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A cache entry could not be serialized
    #[error("Failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A lock guarding store state was poisoned by a panicking thread
    #[error("Cache store lock poisoned")]
    LockPoisoned,
}

/// A named bucket mapping request URLs to cached responses.
///
/// Keys are request URL strings, used verbatim.
pub trait CacheBucket {
    /// Stores a response under the given key, replacing any existing entry.
    fn put(&self, key: &str, response: Response) -> Result<(), StoreError>;

    /// Looks up the response cached under the given key.
    fn get(&self, key: &str) -> Result<Option<Response>, StoreError>;

    /// Lists the keys currently present in the bucket, in no particular
    /// order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// A store of named cache buckets keyed by version string.
pub trait CacheStore: Send + Sync {
    /// The bucket handle type produced by [`CacheStore::open`].
    type Bucket: CacheBucket + Send;

    /// Opens the bucket with the given name, creating it if absent.
    fn open(&self, name: &str) -> Result<Self::Bucket, StoreError>;

    /// Deletes the bucket with the given name and all its entries.
    ///
    /// Returns `true` if a bucket was deleted, `false` if none existed.
    fn delete(&self, name: &str) -> Result<bool, StoreError>;

    /// Lists the names of all buckets in the store.
    fn bucket_names(&self) -> Result<Vec<String>, StoreError>;
}
