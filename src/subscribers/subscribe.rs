//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging lifecycle observers into the
//! container. Subscribers are called inline, in registration order, by the
//! [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - `on_event` must be quick and must not block; hand heavy work (I/O,
//!   batching) to a channel of your own.
//! - A panic inside `on_event` is caught and reported to the other subscribers
//!   as `SubscriberPanicked`; it never reaches the container.

use crate::events::Event;

/// Contract for event subscribers.
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
