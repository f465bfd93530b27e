use std::sync::Arc;

use crate::{
    core::{Container, ContainerConfig},
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Container`] with optional features.
pub struct ContainerBuilder {
    cfg: ContainerConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl ContainerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: ContainerConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive lifecycle events (registration, init, run, stop, wait)
    /// inline, in the given order.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one subscriber after the ones already set.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds and returns the container.
    pub fn build(self) -> Container {
        Container::with_parts(self.cfg, SubscriberSet::new(self.subscribers))
    }
}
