//! # Per-service run record.
//!
//! One [`RunRecord`] exists per service from the moment `start_all` reaches it.
//! It holds the service's state, its terminal error and a completion latch.
//!
//! ## State transitions
//! ```text
//! Initializing ──► Initialized ──► Running ──► Stopped
//!      │                │                 └──► Failed   (error recorded)
//!      │                └──► Stopped  (startup aborted before launch)
//!      └──► InitFailed
//! ```
//!
//! ## Rules
//! - Completion is signaled **exactly once**; later calls are ignored
//! - The terminal error is written before the latch opens, so a woken waiter
//!   always sees it
//! - Only one writer at a time: the init path or the service's own run unit

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::sync::watch;

use crate::error::ServiceError;

/// Observable state of a single service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceState {
    /// Registered; `start_all` has not reached it.
    Registered,
    /// Init hook in progress.
    Initializing,
    /// Init done, run not launched yet.
    Initialized,
    /// Init failed; the service never ran.
    InitFailed,
    /// Run unit in flight.
    Running,
    /// Run returned `Ok` (or `Canceled` after a stop), or startup was aborted before launch.
    Stopped,
    /// Run returned a failure.
    Failed,
}

impl ServiceState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => ServiceState::Initializing,
            2 => ServiceState::Initialized,
            3 => ServiceState::InitFailed,
            4 => ServiceState::Running,
            5 => ServiceState::Stopped,
            6 => ServiceState::Failed,
            _ => ServiceState::Registered,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            ServiceState::Registered => 0,
            ServiceState::Initializing => 1,
            ServiceState::Initialized => 2,
            ServiceState::InitFailed => 3,
            ServiceState::Running => 4,
            ServiceState::Stopped => 5,
            ServiceState::Failed => 6,
        }
    }

    /// True for `InitFailed`, `Stopped` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ServiceState::InitFailed | ServiceState::Stopped | ServiceState::Failed
        )
    }
}

/// Mutable run state of one service.
pub(crate) struct RunRecord {
    name: Arc<str>,
    state: AtomicU8,
    error: OnceLock<ServiceError>,
    done: watch::Sender<bool>,
}

impl RunRecord {
    pub(crate) fn new(name: Arc<str>) -> Arc<Self> {
        let (done, _rx) = watch::channel(false);
        Arc::new(Self {
            name,
            state: AtomicU8::new(ServiceState::Initializing.as_u8()),
            error: OnceLock::new(),
            done,
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn state(&self) -> ServiceState {
        ServiceState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn is_running(&self) -> bool {
        self.state() == ServiceState::Running
    }

    pub(crate) fn error(&self) -> Option<&ServiceError> {
        self.error.get()
    }

    pub(crate) fn is_done(&self) -> bool {
        *self.done.borrow()
    }

    pub(crate) fn mark_initialized(&self) {
        self.set_state(ServiceState::Initialized);
    }

    pub(crate) fn mark_running(&self) {
        self.set_state(ServiceState::Running);
    }

    /// Init failed: complete immediately, without a run error.
    pub(crate) fn fail_init(&self) -> bool {
        self.finish(ServiceState::InitFailed)
    }

    /// Startup aborted after this service initialized: complete without running.
    pub(crate) fn abandon(&self) -> bool {
        self.finish(ServiceState::Stopped)
    }

    /// Records the outcome of `run` and opens the completion latch.
    ///
    /// Any error is kept; the run unit maps a graceful `Canceled` to `Ok` first.
    /// Returns `false` if the record was already complete.
    pub(crate) fn complete(&self, res: Result<(), ServiceError>) -> bool {
        match res {
            Err(e) => {
                if self.is_done() {
                    return false;
                }
                let _ = self.error.set(e);
                self.finish(ServiceState::Failed)
            }
            Ok(()) => self.finish(ServiceState::Stopped),
        }
    }

    /// Resolves once the record is complete.
    pub(crate) async fn stopped(&self) {
        let mut rx = self.done.subscribe();
        let _ = rx.wait_for(|done| *done).await;
    }

    fn set_state(&self, state: ServiceState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    fn finish(&self, state: ServiceState) -> bool {
        self.done.send_if_modified(|done| {
            if *done {
                return false;
            }
            self.state.store(state.as_u8(), Ordering::Release);
            *done = true;
            true
        })
    }
}
