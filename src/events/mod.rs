//! Lifecycle events emitted by the container.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publishers**: `Container` (registration, start, stop, wait) and the
//!   per-service run units spawned by `core::runner`.
//! - **Consumers**: the container's [`SubscriberSet`](crate::SubscriberSet),
//!   which hands every event to each [`Subscribe`](crate::Subscribe) in turn.
//!
//! See `core/mod.rs` for the system-level wiring diagram.

mod event;

pub use event::{Event, EventKind};
