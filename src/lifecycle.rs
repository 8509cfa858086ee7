//! Worker lifecycle vocabulary: states, fetch outcomes, and the handler
//! interface the host drives.

use async_trait::async_trait;

use crate::http::{Request, Response};
use crate::worker::WorkerError;

/// Lifecycle states of a cache worker, as tracked by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Install event dispatched or about to be; the bucket is being seeded
    Installing,
    /// Install succeeded; waiting to activate
    Installed,
    /// Activate event dispatched; stale buckets being swept
    Activating,
    /// Active and intercepting fetches
    Activated,
    /// Installation or activation failed; the worker will never serve
    Redundant,
}

impl WorkerState {
    /// Returns `true` if fetch interception is active in this state.
    pub fn can_intercept_fetch(&self) -> bool {
        matches!(self, WorkerState::Activated)
    }

    /// Returns `true` if the worker can make no further progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkerState::Redundant)
    }
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerState::Installing => write!(f, "installing"),
            WorkerState::Installed => write!(f, "installed"),
            WorkerState::Activating => write!(f, "activating"),
            WorkerState::Activated => write!(f, "activated"),
            WorkerState::Redundant => write!(f, "redundant"),
        }
    }
}

/// Result of dispatching a fetch event to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The worker resolved the request, from cache or network.
    Served(Response),
    /// The worker declined to intercept; the request proceeds untouched.
    Passthrough,
}

impl FetchOutcome {
    /// Returns the served response, if any.
    pub fn response(&self) -> Option<&Response> {
        match self {
            FetchOutcome::Served(response) => Some(response),
            FetchOutcome::Passthrough => None,
        }
    }

    /// Returns `true` if the worker declined to intercept.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, FetchOutcome::Passthrough)
    }
}

/// Handler interface with one method per lifecycle event.
///
/// Each method returns a future the host must await before the lifecycle
/// event is considered complete — the analog of the platform's "wait until"
/// contract.
#[async_trait]
pub trait LifecycleHandler: Send + Sync {
    /// Handles the install event: seed the current cache bucket.
    async fn on_install(&self) -> Result<(), WorkerError>;

    /// Handles a fetch event: resolve or decline the request.
    async fn on_fetch(&self, request: &Request) -> Result<FetchOutcome, WorkerError>;

    /// Handles the activate event: sweep stale cache buckets.
    async fn on_activate(&self) -> Result<(), WorkerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(WorkerState::Installing.to_string(), "installing");
        assert_eq!(WorkerState::Installed.to_string(), "installed");
        assert_eq!(WorkerState::Activating.to_string(), "activating");
        assert_eq!(WorkerState::Activated.to_string(), "activated");
        assert_eq!(WorkerState::Redundant.to_string(), "redundant");
    }

    #[test]
    fn test_only_activated_intercepts_fetch() {
        assert!(!WorkerState::Installing.can_intercept_fetch());
        assert!(!WorkerState::Installed.can_intercept_fetch());
        assert!(!WorkerState::Activating.can_intercept_fetch());
        assert!(WorkerState::Activated.can_intercept_fetch());
        assert!(!WorkerState::Redundant.can_intercept_fetch());
    }

    #[test]
    fn test_only_redundant_is_terminal() {
        assert!(WorkerState::Redundant.is_terminal());
        assert!(!WorkerState::Activated.is_terminal());
    }

    #[test]
    fn test_fetch_outcome_accessors() {
        let served = FetchOutcome::Served(Response::new(200, b"ok".to_vec()));
        assert!(!served.is_passthrough());
        assert_eq!(served.response().map(|r| r.status), Some(200));

        let passthrough = FetchOutcome::Passthrough;
        assert!(passthrough.is_passthrough());
        assert!(passthrough.response().is_none());
    }
}
