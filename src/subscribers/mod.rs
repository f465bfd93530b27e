//! # Event subscribers for the servisor container.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out,
//! and the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Container / run unit ── emit(&Event) ──► SubscriberSet
//!                                               │
//!                                      ┌────────┼────────┐
//!                                      ▼        ▼        ▼
//!                                  LogWriter  Metrics  Custom ...
//! ```
//!
//! An empty set is the default and costs nothing: no subscriber, no effect.
//! Subscribers observe the lifecycle but never influence control flow.
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use servisor::{Subscribe, Event, EventKind};
//!
//! struct FailureCounter;
//!
//! impl Subscribe for FailureCounter {
//!     fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::ServiceFailed {
//!             // increment failure counter
//!         }
//!     }
//!     fn name(&self) -> &'static str { "failure-counter" }
//! }
//! ```

mod log;
mod subscribe;
mod subscriber_set;

pub use log::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
