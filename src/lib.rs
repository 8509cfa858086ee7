//! Offline app-shell cache worker.
//!
//! `shellcache` implements the installable/offline caching behavior of a
//! small web app's shell: an install-time seeder that populates a versioned
//! cache bucket from an asset manifest, a fetch interceptor that resolves
//! requests network-first or cache-first, and an activation sweeper that
//! deletes stale cache buckets. The platform driving the lifecycle is
//! modeled by [`WorkerHost`]; the cache store and the network are
//! collaborators behind the [`CacheStore`] and [`NetworkFetch`] traits.
//!
//! ```no_run
//! use shellcache::{CacheWorker, HttpFetcher, MemoryStore, WorkerConfig, WorkerHost};
//!
//! # async fn run() -> Result<(), shellcache::WorkerError> {
//! let config = WorkerConfig::new("app-shell-v1");
//! let worker = CacheWorker::new(config, MemoryStore::new(), HttpFetcher::new("https://example.com"));
//! let mut host = WorkerHost::new(worker);
//!
//! host.install().await?;
//! host.activate().await?;
//! // From here on, fetch events are intercepted per the configured strategy.
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod host;
pub mod http;
pub mod lifecycle;
pub mod manifest;
pub mod network;
pub mod store;
pub mod worker;

pub use config::{FetchStrategy, WorkerConfig};
pub use host::WorkerHost;
pub use http::{Request, Response};
pub use lifecycle::{FetchOutcome, LifecycleHandler, WorkerState};
pub use manifest::{AssetManifest, ManifestError};
pub use network::{HttpFetcher, NetworkError, NetworkFetch};
pub use store::{CacheBucket, CacheStore, DiskStore, MemoryStore, StoreError};
pub use worker::{CacheWorker, WorkerError};
