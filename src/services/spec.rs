//! # Service descriptor for registration.
//!
//! Defines [`ServiceSpec`], the immutable record the container's registry holds:
//! a unique name, the mandatory run capability and an optional init capability.
//!
//! A spec can be created:
//! - **From a service** with [`ServiceSpec::new`] (name taken from [`Service::name`])
//! - **From a service that also initializes** with [`ServiceSpec::initializing`]
//! - **From closures** with [`ServiceSpec::builder`](crate::ServiceBuilder)
//!
//! ## Rules
//! - Init is an explicit field, never discovered from the service's type.
//! - [`ServiceSpec::named`] overrides the display name.

use std::sync::Arc;

use crate::services::service::{Init, InitRef, Service, ServiceRef};

/// Immutable description of a registered service.
///
/// ## Example
/// ```rust
/// use tokio_util::sync::CancellationToken;
/// use servisor::{InitFn, ServiceError, ServiceFn, ServiceSpec};
///
/// let run = ServiceFn::arc("db", |ctx: CancellationToken| async move {
///     ctx.cancelled().await;
///     Ok::<(), ServiceError>(())
/// });
/// let init = InitFn::arc(|_ctx: CancellationToken| async { Ok::<(), ServiceError>(()) });
///
/// let spec = ServiceSpec::new(run).with_init(init);
/// assert_eq!(spec.name(), "db");
/// assert!(spec.has_init());
/// ```
#[derive(Clone)]
pub struct ServiceSpec {
    name: Arc<str>,
    service: ServiceRef,
    init: Option<InitRef>,
}

impl ServiceSpec {
    /// Creates a run-only spec; the name comes from [`Service::name`].
    pub fn new(service: ServiceRef) -> Self {
        let name: Arc<str> = Arc::from(service.name());
        Self {
            name,
            service,
            init: None,
        }
    }

    /// Creates a spec whose init and run capabilities are the same value.
    pub fn initializing<S: Service + Init>(service: Arc<S>) -> Self {
        let init: InitRef = service.clone();
        Self::new(service).with_init(init)
    }

    /// Returns a new spec with the given init capability.
    pub fn with_init(mut self, init: InitRef) -> Self {
        self.init = Some(init);
        self
    }

    /// Returns a new spec registered under `name` instead of the service's own name.
    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Returns reference to the run capability.
    pub fn service(&self) -> &ServiceRef {
        &self.service
    }

    /// Returns reference to the init capability, if any.
    pub fn init(&self) -> Option<&InitRef> {
        self.init.as_ref()
    }

    /// Whether this spec carries an init capability.
    pub fn has_init(&self) -> bool {
        self.init.is_some()
    }
}

impl From<ServiceRef> for ServiceSpec {
    fn from(service: ServiceRef) -> Self {
        Self::new(service)
    }
}

impl std::fmt::Debug for ServiceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceSpec")
            .field("name", &self.name)
            .field("init", &self.init.is_some())
            .finish()
    }
}
