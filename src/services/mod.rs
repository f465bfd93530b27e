//! # Service abstractions and registration specs.
//!
//! This module provides the service-related types:
//! - [`Service`] - trait for the mandatory, cancelable `run` capability
//! - [`Init`] - trait for the optional, one-shot `init` capability
//! - [`ServiceFn`] / [`InitFn`] - closure-backed adapters with explicit names
//! - [`ServiceSpec`] - descriptor bundling a name, the run capability and an optional init
//! - [`ServiceBuilder`] - fluent builder over a name plus `init`/`run` closures

mod service;
mod service_fn;
mod spec;
mod spec_builder;

pub use service::{Init, InitRef, Service, ServiceRef};
pub use service_fn::{InitFn, ServiceFn};
pub use spec::ServiceSpec;
pub use spec_builder::ServiceBuilder;
