//! Network fetch collaborator.
//!
//! The worker talks to the network through the [`NetworkFetch`] trait so
//! tests can script responses and flip the network offline. [`HttpFetcher`]
//! is the live implementation over a `reqwest` client, resolving the
//! manifest's relative shell paths against a configured base URL.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::http::{Request, Response};

/// Errors that can occur when fetching over the network
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The network was unreachable for the given URL
    #[error("Network unreachable: {0}")]
    Unreachable(String),
}

/// Resolves a request to a response or fails.
#[async_trait]
pub trait NetworkFetch: Send + Sync {
    /// Performs a live fetch of the given request.
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError>;
}

/// Live network fetcher backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    /// Creates a fetcher resolving relative paths against the given base
    /// URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Creates a fetcher with a custom HTTP client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Resolves a request URL: absolute URLs pass through, relative shell
    /// paths are joined onto the base URL.
    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl NetworkFetch for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError> {
        let resolved = self.resolve(&request.url);
        let http_response = self.client.get(&resolved).send().await?;

        let status = http_response.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in http_response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_string(), value.to_string());
            }
        }
        let body = http_response.bytes().await?.to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
