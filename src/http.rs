//! Request and response types shared by the network, the cache store, and
//! the cache worker.
//!
//! A request carries only a URL: the URL string is used verbatim as the
//! cache lookup key, matching how the install manifest addresses assets.
//! No normalization is applied, so `index.html` and `/index.html` are
//! distinct keys.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An outgoing resource fetch, identified by its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Request URL; doubles as the cache lookup key.
    pub url: String,
}

impl Request {
    /// Creates a request for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// A response, either fetched live from the network or served from a cache
/// bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a response with the given status and body, and no headers.
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Returns `true` if the status code is in the 2xx range.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
