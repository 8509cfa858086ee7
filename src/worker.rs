//! The cache worker: install-time seeder, fetch interceptor, and
//! activation sweeper over a versioned cache store.
//!
//! The worker owns its configuration plus two collaborators — a
//! [`CacheStore`] and a [`NetworkFetch`] implementation — and implements
//! [`LifecycleHandler`] so a host can drive it through the install, fetch,
//! and activate events.

use futures::future;
use thiserror::Error;
use tracing::{info, trace, warn};

use async_trait::async_trait;

use crate::config::{FetchStrategy, WorkerConfig};
use crate::http::Request;
use crate::lifecycle::{FetchOutcome, LifecycleHandler, WorkerState};
use crate::network::{NetworkError, NetworkFetch};
use crate::store::{CacheBucket, CacheStore, StoreError};

/// Errors that can occur while handling lifecycle events
#[derive(Debug, Error)]
pub enum WorkerError {
    /// A cache store operation failed
    #[error("Cache store operation failed: {0}")]
    Store(#[from] StoreError),

    /// A network fetch failed
    #[error("Network fetch failed: {0}")]
    Network(#[from] NetworkError),

    /// An install-time asset fetch returned a non-ok status
    #[error("Install seeding rejected '{path}': HTTP {status}")]
    SeedRejected {
        /// The manifest path that failed
        path: String,
        /// The rejected status code
        status: u16,
    },

    /// The network failed and no cached entry covered the request
    #[error("'{url}' is unreachable and has no cached entry: {source}")]
    Unreachable {
        /// The request URL
        url: String,
        /// The underlying network failure
        source: NetworkError,
    },

    /// A lifecycle event was dispatched in a state that does not allow it
    #[error("Invalid worker state: expected {expected}, got {actual}")]
    InvalidState {
        /// The state the event is legal in
        expected: &'static str,
        /// The state the worker was in
        actual: WorkerState,
    },
}

/// An install/fetch/activate cache worker.
///
/// `S` supplies the cache buckets, `N` the live network. Both are chosen at
/// construction; the worker itself holds no mutable state.
#[derive(Debug)]
pub struct CacheWorker<S, N> {
    config: WorkerConfig,
    store: S,
    network: N,
}

impl<S: CacheStore, N: NetworkFetch> CacheWorker<S, N> {
    /// Creates a worker from its configuration and collaborators.
    pub fn new(config: WorkerConfig, store: S, network: N) -> Self {
        Self {
            config,
            store,
            network,
        }
    }

    /// The worker's configuration.
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// The cache store this worker seeds and serves from.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The network collaborator this worker fetches through.
    pub fn network(&self) -> &N {
        &self.network
    }

    /// Seeds the current cache bucket with every manifest path.
    ///
    /// All paths are fetched concurrently; nothing is stored unless every
    /// fetch succeeds with an ok status, so a failed install leaves prior
    /// cache state untouched. Re-running against an already-seeded bucket
    /// overwrites entries key-for-key and leaves the asset set unchanged.
    pub async fn install(&self) -> Result<(), WorkerError> {
        let bucket = self.store.open(&self.config.version_name)?;
        info!(
            bucket = %self.config.version_name,
            assets = self.config.assets.len(),
            "opened cache bucket, seeding install assets"
        );

        let fetches = self.config.assets.paths().map(|path| async move {
            let response = self.network.fetch(&Request::new(path)).await?;
            if !response.ok() {
                return Err(WorkerError::SeedRejected {
                    path: path.to_string(),
                    status: response.status,
                });
            }
            Ok::<_, WorkerError>((path, response))
        });
        let seeded = future::try_join_all(fetches).await?;

        for (path, response) in seeded {
            bucket.put(path, response)?;
        }
        Ok(())
    }

    /// Resolves an intercepted request via the configured strategy.
    pub async fn fetch(&self, request: &Request) -> Result<FetchOutcome, WorkerError> {
        match self.config.strategy {
            FetchStrategy::NetworkFirst => self.fetch_network_first(request).await,
            FetchStrategy::CacheFirst => self.fetch_cache_first(request).await,
        }
    }

    /// Network-first: serve the live response whatever its status; only a
    /// transport failure falls back to the cache. The cache is not updated
    /// on the way through.
    async fn fetch_network_first(&self, request: &Request) -> Result<FetchOutcome, WorkerError> {
        match self.network.fetch(request).await {
            Ok(response) => Ok(FetchOutcome::Served(response)),
            Err(network_err) => {
                trace!(url = %request.url, "network fetch failed, falling back to cache");
                let bucket = self.store.open(&self.config.version_name)?;
                match bucket.get(&request.url)? {
                    Some(cached) => {
                        trace!(url = %request.url, "cache hit");
                        Ok(FetchOutcome::Served(cached))
                    }
                    None => Err(WorkerError::Unreachable {
                        url: request.url.clone(),
                        source: network_err,
                    }),
                }
            }
        }
    }

    /// Cache-first: bypass-marked URLs pass through before any cache
    /// lookup; a cache hit is served without touching the network; a miss
    /// falls back to a live fetch whose response is not written back.
    async fn fetch_cache_first(&self, request: &Request) -> Result<FetchOutcome, WorkerError> {
        if let Some(marker) = self.config.matching_bypass_marker(&request.url) {
            trace!(url = %request.url, marker, "bypass marker matched, passing request through");
            return Ok(FetchOutcome::Passthrough);
        }

        let bucket = self.store.open(&self.config.version_name)?;
        if let Some(cached) = bucket.get(&request.url)? {
            trace!(url = %request.url, "cache hit");
            return Ok(FetchOutcome::Served(cached));
        }

        trace!(url = %request.url, "cache miss, fetching from network");
        let response = self.network.fetch(request).await?;
        Ok(FetchOutcome::Served(response))
    }

    /// Sweeps every bucket whose name differs from the current version.
    ///
    /// Deletion is best-effort: individual failures are logged and skipped,
    /// and never fail the sweep itself.
    pub async fn activate(&self) -> Result<(), WorkerError> {
        let current = self.config.version_name.as_str();
        for name in self.store.bucket_names()? {
            if name == current {
                continue;
            }
            info!(bucket = %name, "deleting stale cache bucket");
            if let Err(err) = self.store.delete(&name) {
                warn!(bucket = %name, error = %err, "failed to delete stale cache bucket");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<S: CacheStore, N: NetworkFetch> LifecycleHandler for CacheWorker<S, N> {
    async fn on_install(&self) -> Result<(), WorkerError> {
        self.install().await
    }

    async fn on_fetch(&self, request: &Request) -> Result<FetchOutcome, WorkerError> {
        self.fetch(request).await
    }

    async fn on_activate(&self) -> Result<(), WorkerError> {
        self.activate().await
    }
}
