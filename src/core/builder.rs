use std::sync::Arc;
use std::time::Duration;

use super::{config::GroupConfig, group::Group, ignore::IgnoreRule};
use crate::subscribers::Subscribe;

/// Builder for constructing a [`Group`] with optional settings.
///
/// Each `with_*` call is one option applied at construction time; the settings are
/// fixed once [`build`](Self::build) returns.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use actorgroup::{Group, IgnoreRule};
///
/// #[derive(Debug, PartialEq, thiserror::Error)]
/// #[error("server closed")]
/// struct ServerClosed;
///
/// let group = Group::builder()
///     .with_shutdown_timeout(Duration::from_secs(10))
///     .with_ignore_errors([IgnoreRule::error(ServerClosed)])
///     .build();
///
/// assert_eq!(group.config().shutdown_timeout(), Duration::from_secs(10));
/// assert_eq!(group.config().ignore.len(), 3);
/// ```
pub struct GroupBuilder {
    cfg: GroupConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl GroupBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: GroupConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets the shutdown timeout. `Duration::ZERO` keeps the current value.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.cfg.shutdown_timeout = timeout;
        }
        self
    }

    /// Appends errors to the ignore set.
    pub fn with_ignore_errors<I, R>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<IgnoreRule>,
    {
        self.cfg.ignore.extend(rules);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive lifecycle events (actor start/stop/failure, shutdown calls,
    /// final result) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the group.
    pub fn build(self) -> Group {
        Group::new_internal(self.cfg, self.subscribers)
    }
}
