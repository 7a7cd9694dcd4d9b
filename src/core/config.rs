//! # Group configuration.
//!
//! Provides [`GroupConfig`] centralized settings for a [`Group`](crate::Group).
//!
//! ## Sentinel values
//! - `shutdown_timeout = 0s` → the default (5s) is used
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

use crate::core::ignore::IgnoreSet;

/// Configuration for a single group.
///
/// ## Field semantics
/// - `shutdown_timeout`: Lifetime of the grace context handed to every actor's `shutdown`
/// - `ignore`: Errors that turn into `Ok(())` when they end the run
/// - `bus_capacity`: Lifecycle event ring buffer size (min 1)
///
/// ## Notes
/// All fields are public. Prefer the accessors to avoid sprinkling sentinel checks
/// (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct GroupConfig {
    /// How long actors get to stop once the group decided to stop.
    ///
    /// The window starts after the terminal decision and does not depend on the
    /// caller's context, which may already be expired.
    pub shutdown_timeout: Duration,

    /// Errors that are treated as a clean stop.
    pub ignore: IgnoreSet,

    /// Capacity of the lifecycle event broadcast channel.
    pub bus_capacity: usize,
}

impl GroupConfig {
    /// Shutdown timeout used when none is configured.
    pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

    /// Returns the shutdown timeout, substituting the default for `0s`.
    #[inline]
    pub fn shutdown_timeout(&self) -> Duration {
        if self.shutdown_timeout.is_zero() {
            Self::DEFAULT_SHUTDOWN_TIMEOUT
        } else {
            self.shutdown_timeout
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for GroupConfig {
    /// Default configuration:
    ///
    /// - `shutdown_timeout = 5s`
    /// - `ignore = [Canceled, DeadlineExceeded]`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            shutdown_timeout: Self::DEFAULT_SHUTDOWN_TIMEOUT,
            ignore: IgnoreSet::default(),
            bus_capacity: 1024,
        }
    }
}
