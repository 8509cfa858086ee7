//! Filesystem-backed cache store.
//!
//! Each bucket is a directory under the store root, named by its version
//! string; each entry is a JSON file carrying the cached response together
//! with the full key and a `cached_at` timestamp. Unreadable or corrupt
//! entry files are treated as cache misses, so a damaged cache degrades to
//! network fetches instead of failing.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::http::Response;
use crate::store::{CacheBucket, CacheStore, StoreError};

/// One entry file on disk
#[derive(Debug, Serialize, Deserialize)]
struct DiskEntry {
    /// The full cache key (request URL), kept verbatim since file names are
    /// sanitized
    key: String,
    /// When the entry was stored
    cached_at: DateTime<Utc>,
    /// The cached response
    response: Response,
}

/// A cache store persisting buckets to a root directory.
///
/// Bucket names are used verbatim as directory names and must be valid path
/// components; version strings like `"app-shell-v2"` are.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Creates a store rooted at the XDG-compliant cache directory
    /// (`~/.cache/shellcache/` on Linux, or equivalent elsewhere).
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g. no
    /// home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "shellcache")?;
        Some(Self {
            root: project_dirs.cache_dir().to_path_buf(),
        })
    }

    /// Creates a store rooted at a custom directory.
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }
}

/// Handle to one on-disk bucket.
#[derive(Debug, Clone)]
pub struct DiskBucket {
    dir: PathBuf,
}

/// Builds a filesystem-safe entry file name for an arbitrary URL key: a
/// sanitized prefix for readability plus a hash of the full key for
/// uniqueness.
fn entry_file_name(key: &str) -> String {
    let sanitized: String = key
        .chars()
        .take(32)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    format!("{}-{:016x}.json", sanitized, hasher.finish())
}

impl CacheStore for DiskStore {
    type Bucket = DiskBucket;

    fn open(&self, name: &str) -> Result<Self::Bucket, StoreError> {
        let dir = self.root.join(name);
        fs::create_dir_all(&dir)?;
        Ok(DiskBucket { dir })
    }

    fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let dir = self.root.join(name);
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn bucket_names(&self) -> Result<Vec<String>, StoreError> {
        let read_dir = match fs::read_dir(&self.root) {
            Ok(read_dir) => read_dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::Io(err)),
        };

        let mut names = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Ok(name) = entry.file_name().into_string() {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }
}

impl CacheBucket for DiskBucket {
    fn put(&self, key: &str, response: Response) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        let entry = DiskEntry {
            key: key.to_string(),
            cached_at: Utc::now(),
            response,
        };
        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(self.dir.join(entry_file_name(key)), json)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Response>, StoreError> {
        let path = self.dir.join(entry_file_name(key));
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Ok(None),
        };
        let entry: DiskEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(_) => return Ok(None),
        };
        if entry.key != key {
            return Ok(None);
        }
        Ok(Some(entry.response))
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::Io(err)),
        };

        let mut keys = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            let Ok(content) = fs::read_to_string(entry.path()) else {
                continue;
            };
            if let Ok(parsed) = serde_json::from_str::<DiskEntry>(&content) {
                keys.push(parsed.key);
            }
        }
        Ok(keys)
    }
}
