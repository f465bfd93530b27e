//! # Container configuration.
//!
//! Provides [`ContainerConfig`] centralized settings for a [`Container`](crate::Container).
//!
//! ## Sentinel values
//! - `wait_timeout = 0s` → wait without deadline
//! - `progress_interval = 0s` → no `WaitingForServices` progress events

use std::time::Duration;

/// Configuration for a [`Container`](crate::Container).
///
/// ## Field semantics
/// - `wait_timeout`: Deadline used by the `*_default` wait helpers (`0s` = no deadline)
/// - `progress_interval`: Period of `WaitingForServices` events while waiting (`0s` = off)
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct ContainerConfig {
    /// Default deadline for [`Container::wait_all_stopped_default`](crate::Container::wait_all_stopped_default)
    /// and [`Container::stop_and_wait_default`](crate::Container::stop_and_wait_default).
    ///
    /// Only bounds the caller's wait; services that are still running keep running.
    pub wait_timeout: Duration,

    /// How often a waiting caller emits a `WaitingForServices` event
    /// listing the services that are still running.
    pub progress_interval: Duration,
}

impl ContainerConfig {
    /// Returns the default wait deadline as an `Option`.
    ///
    /// - `None` → wait until every service stopped
    /// - `Some(d)` → give up after `d`
    #[inline]
    pub fn default_wait_timeout(&self) -> Option<Duration> {
        non_zero(self.wait_timeout)
    }

    /// Returns the progress period as an `Option` (`None` = disabled).
    #[inline]
    pub fn progress_interval(&self) -> Option<Duration> {
        non_zero(self.progress_interval)
    }
}

impl Default for ContainerConfig {
    /// Default configuration:
    ///
    /// - `wait_timeout = 0s` (no deadline)
    /// - `progress_interval = 1s`
    fn default() -> Self {
        Self {
            wait_timeout: Duration::ZERO,
            progress_interval: Duration::from_secs(1),
        }
    }
}

#[inline]
pub(crate) fn non_zero(d: Duration) -> Option<Duration> {
    if d == Duration::ZERO { None } else { Some(d) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_means_disabled() {
        let cfg = ContainerConfig {
            wait_timeout: Duration::ZERO,
            progress_interval: Duration::ZERO,
        };
        assert_eq!(cfg.default_wait_timeout(), None);
        assert_eq!(cfg.progress_interval(), None);
    }

    #[test]
    fn defaults() {
        let cfg = ContainerConfig::default();
        assert_eq!(cfg.default_wait_timeout(), None);
        assert_eq!(cfg.progress_interval(), Some(Duration::from_secs(1)));
    }
}
