//! Runtime core: registration, startup, shutdown.
//!
//! The public API from this module is [`Container`] with its builder and
//! config, plus the signal helpers in [`shutdown`].
//!
//! Internal modules:
//! - [`registry`]: ordered, name-unique service specs;
//! - [`record`]: per-service run state and completion latch;
//! - [`runner`]: executes an init hook or launches a run unit, publishing events;
//! - [`container`]: orchestrates init/run, cascading stop, wait and introspection;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod builder;
mod config;
mod container;
mod record;
mod registry;
mod runner;
pub mod shutdown;

pub use builder::ContainerBuilder;
pub use config::ContainerConfig;
pub use container::{Container, ContainerState, WaitOutcome};
pub use record::ServiceState;
