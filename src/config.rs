//! Worker configuration.
//!
//! Everything the original keeps as module-level constants — the cache
//! version name, the asset list, the interception strategy, and any bypass
//! markers — lives in an explicit [`WorkerConfig`] passed to the worker at
//! construction.

use crate::manifest::AssetManifest;

/// How the fetch handler resolves intercepted requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStrategy {
    /// Attempt the live fetch first; fall back to the cache on network
    /// failure.
    #[default]
    NetworkFirst,
    /// Look up the cache first; fall back to a live fetch on a miss.
    CacheFirst,
}

/// Configuration for a cache worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Version string naming the current cache bucket
    /// (e.g. `"retirement-calculator-pwa-install-v1"`). Also the sweep
    /// whitelist: every other bucket is deleted on activation.
    pub version_name: String,
    /// Paths seeded into the bucket at install time.
    pub assets: AssetManifest,
    /// Fetch interception strategy.
    pub strategy: FetchStrategy,
    /// URL markers that exempt a request from interception entirely.
    /// A request whose URL contains any marker is passed through without a
    /// cache lookup. Only consulted by the cache-first strategy.
    pub bypass_markers: Vec<String>,
}

impl WorkerConfig {
    /// Creates a configuration for the given cache version with the default
    /// app-shell manifest, the network-first strategy, and no bypass
    /// markers.
    pub fn new(version_name: impl Into<String>) -> Self {
        Self {
            version_name: version_name.into(),
            assets: AssetManifest::app_shell(),
            strategy: FetchStrategy::default(),
            bypass_markers: Vec::new(),
        }
    }

    /// Replaces the asset manifest.
    pub fn with_assets(mut self, assets: AssetManifest) -> Self {
        self.assets = assets;
        self
    }

    /// Sets the fetch strategy.
    pub fn with_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Adds a bypass marker.
    pub fn with_bypass_marker(mut self, marker: impl Into<String>) -> Self {
        self.bypass_markers.push(marker.into());
        self
    }

    /// Returns the first bypass marker contained in `url`, if any.
    pub(crate) fn matching_bypass_marker(&self, url: &str) -> Option<&str> {
        self.bypass_markers
            .iter()
            .find(|marker| url.contains(marker.as_str()))
            .map(String::as_str)
    }
}
