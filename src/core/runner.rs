//! # Execute a service's init hook or launch its run unit.
//!
//! - [`run_init`] awaits one init hook on the caller's task
//! - [`launch`] spawns one run unit on the tokio runtime
//!
//! ## Event flow
//!
//! ```text
//! Success / graceful cancellation:
//!   service.run() → Ok(()) | Err(Canceled) after stop → publish ServiceStopped → record Stopped
//!
//! Failure:
//!   service.run() → Err(Fail) | panic | Err(Canceled) before stop
//!                                     → publish ServiceFailed
//!                                     → cancel shared token (cascading stop)
//!                                     → record Failed (error kept)
//! ```
//!
//! ## Rules
//! - Always publishes **exactly one** terminal event per run unit
//! - Panics are caught and surface as [`ServiceError::Panicked`]
//! - The terminal event and the cascade happen **before** the record's latch
//!   opens, so a caller woken by `wait_all_stopped` has seen both

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::record::RunRecord;
use crate::error::ServiceError;
use crate::events::{Event, EventKind};
use crate::services::{Init, ServiceSpec};
use crate::subscribers::SubscriberSet;

/// Awaits `init` with the shared token; a panic becomes [`ServiceError::Panicked`].
pub(crate) async fn run_init<I: Init + ?Sized>(
    init: &I,
    token: &CancellationToken,
) -> Result<(), ServiceError> {
    match AssertUnwindSafe(init.init(token.clone())).catch_unwind().await {
        Ok(res) => res,
        Err(panic_err) => Err(panicked(panic_err.as_ref())),
    }
}

/// Spawns the run unit for `spec`.
///
/// ### Flow
/// 1. Run the service with the shared token (panics caught)
/// 2. Publish `ServiceStopped` or `ServiceFailed`; `Canceled` is a clean stop
///    only if the shared token was already cancelled
/// 3. On failure, cancel the shared token
/// 4. Complete the run record
pub(crate) fn launch(
    spec: ServiceSpec,
    record: Arc<RunRecord>,
    token: CancellationToken,
    subs: Arc<SubscriberSet>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let run = spec.service().run(token.clone());
        let res = match AssertUnwindSafe(run).catch_unwind().await {
            Ok(Err(e)) if e.is_canceled() && token.is_cancelled() => Ok(()),
            Ok(res) => res,
            Err(panic_err) => Err(panicked(panic_err.as_ref())),
        };

        match &res {
            Err(e) => {
                publish_failed(&subs, record.name(), e);
                token.cancel();
            }
            Ok(()) => publish_stopped(&subs, record.name()),
        }
        record.complete(res);
    })
}

fn panicked(any: &(dyn std::any::Any + Send)) -> ServiceError {
    let info = if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    };
    ServiceError::Panicked { info }
}

/// Publishes `ServiceStopped` (success or graceful cancellation).
fn publish_stopped(subs: &SubscriberSet, name: &str) {
    subs.emit(&Event::new(EventKind::ServiceStopped).with_service(name));
}

/// Publishes `ServiceFailed` with error details.
fn publish_failed(subs: &SubscriberSet, name: &str, err: &ServiceError) {
    subs.emit(
        &Event::new(EventKind::ServiceFailed)
            .with_service(name)
            .with_reason(err.to_string()),
    );
}
