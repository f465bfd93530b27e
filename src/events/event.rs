//! # Lifecycle events emitted by the container and its run units.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Registration**: a service was added to the registry
//! - **Startup**: sequential init progress and run launch
//! - **Service terminal events**: a run unit finished (stopped or failed)
//! - **Shutdown/wait**: stop requests, wait progress, wait outcome
//!
//! The [`Event`] struct carries additional metadata such as timestamps, service
//! name, reasons, and start progress.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Events from different run units may interleave in any order.
//!
//! ## Example
//! ```rust
//! use servisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ServiceFailed)
//!     .with_service("s2")
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::ServiceFailed);
//! assert_eq!(ev.service.as_deref(), Some("s2"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Registration ===
    /// Service added to the registry.
    ///
    /// Sets:
    /// - `service`: service name
    /// - `index`/`total`: position in the registry (1-based) and its size at that moment
    ServiceRegistered,

    // === Startup ===
    /// Service's init hook is about to run.
    ///
    /// Sets:
    /// - `service`: service name
    /// - `index`/`total`: progress through the registry (1-based)
    ServiceInitializing,

    /// Service's init hook returned `Ok`, or the service has no init hook.
    ///
    /// Sets:
    /// - `service`: service name
    /// - `index`/`total`: progress through the registry (1-based)
    ServiceInitialized,

    /// Service's init hook failed; startup is aborted.
    ///
    /// Sets:
    /// - `service`: service name
    /// - `reason`: failure message
    /// - `index`/`total`: progress through the registry (1-based)
    ServiceInitFailed,

    /// Run unit launched for the service.
    ///
    /// Sets:
    /// - `service`: service name
    ServiceStarting,

    /// Every initialized service was launched.
    ///
    /// Sets:
    /// - `count`: number of launched services
    AllStarted,

    // === Service terminal events ===
    /// Run returned `Ok`, or `Canceled` after a stop was requested.
    ///
    /// Sets:
    /// - `service`: service name
    ServiceStopped,

    /// Run returned an error (or panicked); a stop cascades to all services.
    ///
    /// Sets:
    /// - `service`: service name
    /// - `reason`: failure message
    ServiceFailed,

    // === Shutdown / wait ===
    /// `stop_all` called.
    ///
    /// Sets:
    /// - `count`: services still running at the time of the request
    StopRequested,

    /// Periodic progress while waiting for services to stop.
    ///
    /// Sets:
    /// - `count`: services still running
    /// - `services`: their names (sorted)
    WaitingForServices,

    /// Every launched service reached a terminal state.
    AllStopped,

    /// The wait deadline expired before every service stopped.
    ///
    /// Sets:
    /// - `count`: services still running
    /// - `services`: their names (sorted)
    WaitTimedOut,

    // === Subscriber events ===
    /// Subscriber panicked while handling an event.
    ///
    /// Sets:
    /// - `service`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,
}

impl EventKind {
    /// Short stable label (kebab-case) for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::ServiceRegistered => "registered",
            EventKind::ServiceInitializing => "initializing",
            EventKind::ServiceInitialized => "initialized",
            EventKind::ServiceInitFailed => "init-failed",
            EventKind::ServiceStarting => "starting",
            EventKind::AllStarted => "all-started",
            EventKind::ServiceStopped => "stopped",
            EventKind::ServiceFailed => "failed",
            EventKind::StopRequested => "stop-requested",
            EventKind::WaitingForServices => "waiting",
            EventKind::AllStopped => "all-stopped",
            EventKind::WaitTimedOut => "wait-timed-out",
            EventKind::SubscriberPanicked => "subscriber-panicked",
        }
    }
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the service, if applicable.
    pub service: Option<Arc<str>>,
    /// Human-readable reason (errors, panic details).
    pub reason: Option<Arc<str>>,
    /// Position of the service in the registry (1-based).
    pub index: Option<u32>,
    /// Number of registered services.
    pub total: Option<u32>,
    /// Number of services concerned (launched, still running).
    pub count: Option<u32>,
    /// Names of services still running (wait events only).
    pub services: Option<Arc<[String]>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            service: None,
            reason: None,
            index: None,
            total: None,
            count: None,
            services: None,
        }
    }

    /// Attaches a service name.
    #[inline]
    pub fn with_service(mut self, service: impl Into<Arc<str>>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches 1-based progress through the registry.
    #[inline]
    pub fn with_progress(mut self, index: usize, total: usize) -> Self {
        self.index = Some(clamp_u32(index));
        self.total = Some(clamp_u32(total));
        self
    }

    /// Attaches a count.
    #[inline]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(clamp_u32(count));
        self
    }

    /// Attaches the names of still-running services (and their count).
    #[inline]
    pub fn with_services(mut self, services: Vec<String>) -> Self {
        self.count = Some(clamp_u32(services.len()));
        self.services = Some(services.into());
        self
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_service(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }

    /// Whether this event reports a failure (init, run, or wait timeout).
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(
            self.kind,
            EventKind::ServiceInitFailed | EventKind::ServiceFailed | EventKind::WaitTimedOut
        )
    }
}

fn clamp_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
