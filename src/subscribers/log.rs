//! # LogWriter — lifecycle events to `tracing`
//!
//! A subscriber that forwards every [`Event`] to the [`tracing`] macros with
//! structured fields. Install any `tracing` subscriber in the application to
//! see the output.
//!
//! ## Example output (`tracing_subscriber::fmt`)
//! ```text
//! INFO servisor: registered service="db" index=1
//! INFO servisor: initializing service="db" index=1 total=2
//! INFO servisor: starting service="db"
//! WARN servisor: failed service="db" error="connection refused"
//! INFO servisor: stop-requested running=1
//! WARN servisor: wait-timed-out count=1 services=["api"]
//! ```

use tracing::{error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Subscribe for LogWriter {
    fn on_event(&self, e: &Event) {
        let label = e.kind.as_label();
        let service = e.service.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::ServiceRegistered => {
                info!(target: "servisor", service, index = e.index, "{label}");
            }
            EventKind::ServiceInitializing | EventKind::ServiceInitialized => {
                info!(target: "servisor", service, index = e.index, total = e.total, "{label}");
            }
            EventKind::ServiceInitFailed => {
                error!(target: "servisor", service, error = reason, "{label}");
            }
            EventKind::ServiceStarting | EventKind::ServiceStopped => {
                info!(target: "servisor", service, "{label}");
            }
            EventKind::ServiceFailed => {
                warn!(target: "servisor", service, error = reason, "{label}");
            }
            EventKind::AllStarted => {
                info!(target: "servisor", count = e.count, "{label}");
            }
            EventKind::StopRequested => {
                info!(target: "servisor", running = e.count, "{label}");
            }
            EventKind::AllStopped => {
                info!(target: "servisor", "{label}");
            }
            EventKind::WaitingForServices => {
                info!(target: "servisor", count = e.count, services = ?e.services, "{label}");
            }
            EventKind::WaitTimedOut => {
                warn!(target: "servisor", count = e.count, services = ?e.services, "{label}");
            }
            EventKind::SubscriberPanicked => {
                warn!(target: "servisor", subscriber = service, info = reason, "{label}");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
