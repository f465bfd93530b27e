//! # Function-backed services (`ServiceFn`, `InitFn`)
//!
//! [`ServiceFn`] wraps a closure `F: Fn(CancellationToken) -> Fut` so that a bare
//! function satisfies [`Service`] without a dedicated type. [`InitFn`] does the same
//! for [`Init`].
//!
//! Names are always explicit: closures have no stable identity to derive one from.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use servisor::{ServiceFn, ServiceRef, ServiceError};
//!
//! let s: ServiceRef = ServiceFn::arc("worker", |ctx: CancellationToken| async move {
//!     ctx.cancelled().await;
//!     Ok::<_, ServiceError>(())
//! });
//!
//! assert_eq!(s.name(), "worker");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ServiceError;
use crate::services::service::{Init, Service};

/// Function-backed service implementation.
#[derive(Debug)]
pub struct ServiceFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ServiceFn<F> {
    /// Creates a new function-backed service.
    ///
    /// Prefer [`ServiceFn::arc`] when you immediately need a [`ServiceRef`](crate::ServiceRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the service and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Service for ServiceFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ServiceError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), ServiceError> {
        (self.f)(ctx).await
    }
}

/// Function-backed init hook.
pub struct InitFn<F> {
    f: F,
}

impl<F> InitFn<F> {
    /// Wraps `f` as an [`Init`] capability.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Wraps `f` and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Init for InitFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ServiceError>> + Send + 'static,
{
    async fn init(&self, ctx: CancellationToken) -> Result<(), ServiceError> {
        (self.f)(ctx).await
    }
}
