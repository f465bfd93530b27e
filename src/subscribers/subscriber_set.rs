//! # Event fan-out to multiple subscribers.
//!
//! Provides [`SubscriberSet`] — delivers each event to every subscriber in the
//! order they were added.
//!
//! ## Architecture
//! ```text
//! emit(event)
//!     │
//!     ├──► subscriber1.on_event()
//!     │        └──────► panic → SubscriberPanicked (to the others)
//!     ├──► subscriber2.on_event()
//!     └──► subscriberN.on_event()
//! ```
//!
//! ## Rules
//! - **Per-subscriber FIFO**: each subscriber sees events in emit order per publisher
//! - **Isolation**: a panicking subscriber doesn't affect others or the caller
//! - **Empty set is a no-op**: the default container carries one
//!
//! ## Panic handling
//! Each call is wrapped in `catch_unwind`:
//! - Panic is caught and converted to a `SubscriberPanicked` event
//! - That event is delivered to every other subscriber (never re-reported on panic)
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a subscriber uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::events::Event;
use crate::subscribers::Subscribe;

/// Fan-out coordinator for lifecycle subscribers.
#[derive(Clone, Default)]
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a set delivering to `subs` in the given order.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// Set with no subscribers (no-op sink).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// True if no subscriber is attached.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Delivers `event` to every subscriber.
    pub fn emit(&self, event: &Event) {
        for (idx, sub) in self.subs.iter().enumerate() {
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| sub.on_event(event)));
            if let Err(panic_err) = delivered {
                if event.is_subscriber_panic() {
                    continue;
                }
                let info = panic_message(panic_err.as_ref());
                let report = Event::subscriber_panicked(sub.name(), info);
                self.emit_except(idx, &report);
            }
        }
    }

    fn emit_except(&self, skip: usize, event: &Event) {
        for (idx, sub) in self.subs.iter().enumerate() {
            if idx == skip {
                continue;
            }
            let _ = panic::catch_unwind(AssertUnwindSafe(|| sub.on_event(event)));
        }
    }
}

fn panic_message(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
