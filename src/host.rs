//! Lifecycle host: the platform analog that drives a worker through its
//! events.
//!
//! The host owns the worker state machine (`installing → installed →
//! activating → activated`, with `redundant` on failure) and dispatches
//! events to a [`LifecycleHandler`]. Each dispatch awaits the handler's
//! future before the event is considered complete, holding a scoped
//! keep-alive for the pending window. Fetch events are only delivered once
//! the worker is activated; earlier fetches pass through untouched.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::http::Request;
use crate::lifecycle::{FetchOutcome, LifecycleHandler, WorkerState};
use crate::worker::WorkerError;

/// Scoped stay-alive acquisition, held while a lifecycle event's work is
/// pending and released when the guard drops.
struct KeepAlive {
    counter: Arc<AtomicUsize>,
}

impl KeepAlive {
    fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self {
            counter: Arc::clone(counter),
        }
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Drives a [`LifecycleHandler`] through the worker lifecycle.
pub struct WorkerHost<H> {
    handler: H,
    state: WorkerState,
    in_flight: Arc<AtomicUsize>,
}

impl<H: LifecycleHandler> WorkerHost<H> {
    /// Creates a host for the given handler. The worker starts out
    /// installing, i.e. registered but not yet seeded.
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            state: WorkerState::Installing,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The worker's current lifecycle state.
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Number of lifecycle events currently awaiting their handler.
    pub fn pending_events(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// The handler this host drives.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Dispatches the install event and awaits its completion.
    ///
    /// On success the worker moves to `installed`; on failure it becomes
    /// `redundant` and will never serve.
    pub async fn install(&mut self) -> Result<(), WorkerError> {
        if self.state != WorkerState::Installing {
            return Err(WorkerError::InvalidState {
                expected: "installing",
                actual: self.state,
            });
        }

        let keep_alive = KeepAlive::acquire(&self.in_flight);
        let result = self.handler.on_install().await;
        drop(keep_alive);

        match result {
            Ok(()) => {
                self.state = WorkerState::Installed;
                Ok(())
            }
            Err(err) => {
                self.state = WorkerState::Redundant;
                Err(err)
            }
        }
    }

    /// Dispatches the activate event and awaits its completion.
    ///
    /// Legal only from `installed`. On success the worker moves to
    /// `activated` and starts intercepting fetches.
    pub async fn activate(&mut self) -> Result<(), WorkerError> {
        if self.state != WorkerState::Installed {
            return Err(WorkerError::InvalidState {
                expected: "installed",
                actual: self.state,
            });
        }
        self.state = WorkerState::Activating;

        let keep_alive = KeepAlive::acquire(&self.in_flight);
        let result = self.handler.on_activate().await;
        drop(keep_alive);

        match result {
            Ok(()) => {
                self.state = WorkerState::Activated;
                Ok(())
            }
            Err(err) => {
                self.state = WorkerState::Redundant;
                Err(err)
            }
        }
    }

    /// Dispatches a fetch event.
    ///
    /// Until the worker is activated the request is passed through without
    /// reaching the handler.
    pub async fn fetch(&self, request: &Request) -> Result<FetchOutcome, WorkerError> {
        if !self.state.can_intercept_fetch() {
            return Ok(FetchOutcome::Passthrough);
        }

        let _keep_alive = KeepAlive::acquire(&self.in_flight);
        self.handler.on_fetch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;

    use crate::http::Response;

    /// Scripted handler recording fetch dispatches.
    #[derive(Default)]
    struct ScriptedHandler {
        fail_install: bool,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl LifecycleHandler for ScriptedHandler {
        async fn on_install(&self) -> Result<(), WorkerError> {
            if self.fail_install {
                return Err(WorkerError::SeedRejected {
                    path: "/".to_string(),
                    status: 500,
                });
            }
            Ok(())
        }

        async fn on_fetch(&self, _request: &Request) -> Result<FetchOutcome, WorkerError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(FetchOutcome::Served(Response::new(200, b"served".to_vec())))
        }

        async fn on_activate(&self) -> Result<(), WorkerError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_lifecycle_happy_path() {
        let mut host = WorkerHost::new(ScriptedHandler::default());
        assert_eq!(host.state(), WorkerState::Installing);

        host.install().await.expect("Install should succeed");
        assert_eq!(host.state(), WorkerState::Installed);

        host.activate().await.expect("Activate should succeed");
        assert_eq!(host.state(), WorkerState::Activated);
    }

    #[tokio::test]
    async fn test_fetch_before_activation_passes_through() {
        let mut host = WorkerHost::new(ScriptedHandler::default());

        let outcome = host.fetch(&Request::new("/")).await.unwrap();
        assert!(outcome.is_passthrough());

        host.install().await.unwrap();
        let outcome = host.fetch(&Request::new("/")).await.unwrap();
        assert!(outcome.is_passthrough());

        // The handler never saw either fetch
        assert_eq!(host.handler().fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_after_activation_reaches_handler() {
        let mut host = WorkerHost::new(ScriptedHandler::default());
        host.install().await.unwrap();
        host.activate().await.unwrap();

        let outcome = host.fetch(&Request::new("/")).await.unwrap();
        assert_eq!(outcome.response().unwrap().status, 200);
        assert_eq!(host.handler().fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_install_makes_worker_redundant() {
        let mut host = WorkerHost::new(ScriptedHandler {
            fail_install: true,
            ..Default::default()
        });

        assert!(host.install().await.is_err());
        assert_eq!(host.state(), WorkerState::Redundant);
        assert!(host.state().is_terminal());

        // A redundant worker cannot activate or intercept
        assert!(matches!(
            host.activate().await,
            Err(WorkerError::InvalidState { .. })
        ));
        let outcome = host.fetch(&Request::new("/")).await.unwrap();
        assert!(outcome.is_passthrough());
    }

    #[tokio::test]
    async fn test_activate_before_install_is_rejected() {
        let mut host = WorkerHost::new(ScriptedHandler::default());
        match host.activate().await {
            Err(WorkerError::InvalidState { expected, actual }) => {
                assert_eq!(expected, "installed");
                assert_eq!(actual, WorkerState::Installing);
            }
            other => panic!("Expected InvalidState, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_double_install_is_rejected() {
        let mut host = WorkerHost::new(ScriptedHandler::default());
        host.install().await.unwrap();
        assert!(matches!(
            host.install().await,
            Err(WorkerError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn test_no_pending_events_after_lifecycle() {
        let mut host = WorkerHost::new(ScriptedHandler::default());
        host.install().await.unwrap();
        host.activate().await.unwrap();
        host.fetch(&Request::new("/")).await.unwrap();

        assert_eq!(host.pending_events(), 0);
    }

    #[test]
    fn test_keep_alive_guard_tracks_acquisitions() {
        let counter = Arc::new(AtomicUsize::new(0));

        let first = KeepAlive::acquire(&counter);
        let second = KeepAlive::acquire(&counter);
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        drop(first);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        drop(second);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
