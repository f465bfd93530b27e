use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::Container;
use crate::error::{ContainerError, ServiceError};
use crate::services::{InitFn, InitRef, ServiceFn, ServiceRef, ServiceSpec};

/// Builder for a [`ServiceSpec`] from a name and a pair of closures.
///
/// Without a `run` closure the service returns `Ok(())` immediately.
///
/// ```rust
/// use tokio_util::sync::CancellationToken;
/// use servisor::{Container, ServiceBuilder, ServiceError};
///
/// let container = Container::new();
/// ServiceBuilder::new("http")
///     .init(|_ctx: CancellationToken| async { Ok::<(), ServiceError>(()) })
///     .run(|ctx: CancellationToken| async move {
///         ctx.cancelled().await;
///         Ok::<(), ServiceError>(())
///     })
///     .register(&container)
///     .unwrap();
///
/// assert_eq!(container.registered_names(), vec!["http".to_string()]);
/// ```
#[derive(Clone)]
pub struct ServiceBuilder {
    name: Cow<'static, str>,
    init: Option<InitRef>,
    run: Option<ServiceRef>,
}

impl ServiceBuilder {
    /// Creates a new builder with the given service name
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            init: None,
            run: None,
        }
    }

    pub fn init<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ServiceError>> + Send + 'static,
    {
        self.init = Some(InitFn::arc(f));
        self
    }

    pub fn run<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ServiceError>> + Send + 'static,
    {
        self.run = Some(ServiceFn::arc(self.name.clone(), f));
        self
    }

    /// Build the ServiceSpec
    pub fn build(self) -> ServiceSpec {
        let run: ServiceRef = match self.run {
            Some(run) => run,
            None => ServiceFn::arc(self.name.clone(), |_ctx: CancellationToken| async {
                Ok::<(), ServiceError>(())
            }),
        };
        let spec = ServiceSpec::new(run).named(Arc::<str>::from(self.name.as_ref()));
        match self.init {
            Some(init) => spec.with_init(init),
            None => spec,
        }
    }

    /// Builds the spec and registers it with `container`.
    pub fn register(self, container: &Container) -> Result<(), ContainerError> {
        container.register(self.build())
    }

    /// Builds the spec and registers it with [`Container::global`].
    pub fn register_global(self) -> Result<(), ContainerError> {
        Container::global().register(self.build())
    }
}

impl ServiceSpec {
    /// Creates a builder for constructing a ServiceSpec from closures
    pub fn builder(name: impl Into<Cow<'static, str>>) -> ServiceBuilder {
        ServiceBuilder::new(name)
    }
}
