//! # Service capabilities.
//!
//! A service exposes a mandatory [`Service::run`] and, separately, may carry an
//! [`Init`] capability. Both receive the container's shared [`CancellationToken`].
//!
//! Shared handles are [`ServiceRef`] (`Arc<dyn Service>`) and [`InitRef`] (`Arc<dyn Init>`).

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ServiceError;

/// Shared handle to a service.
pub type ServiceRef = Arc<dyn Service>;

/// Shared handle to an init capability.
pub type InitRef = Arc<dyn Init>;

/// # Long-running, cancelable background unit.
///
/// `run` is executed on its own tokio task and should only return once `ctx` is
/// cancelled or a non-recoverable error occurs. Returning an error is a failure
/// and stops every other service in the container.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use servisor::{Service, ServiceError};
///
/// struct Ticker;
///
/// #[async_trait]
/// impl Service for Ticker {
///     fn name(&self) -> &str { "ticker" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), ServiceError> {
///         ctx.cancelled().await;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Display name used for uniqueness and reporting.
    ///
    /// Falls back to the implementing type's path.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Runs the service until cancellation or failure.
    async fn run(&self, ctx: CancellationToken) -> Result<(), ServiceError>;
}

/// # One-shot startup hook.
///
/// Invoked once, before any service runs, strictly one service at a time in
/// registration order. A failure aborts the remaining startup.
#[async_trait]
pub trait Init: Send + Sync + 'static {
    /// Prepares the service for running.
    async fn init(&self, ctx: CancellationToken) -> Result<(), ServiceError>;
}
