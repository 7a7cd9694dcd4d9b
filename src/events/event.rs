//! # Lifecycle events emitted while a group runs.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Actor events**: callback flow (starting, stopped, failed) and shutdown calls
//! - **Group events**: the terminal decision and the final result
//! - **Subscriber events**: delivery problems (overflow, panic)
//!
//! The [`Event`] struct carries metadata such as timestamps, actor name, and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use actorgroup::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ActorFailed)
//!     .with_actor("http")
//!     .with_reason("bind: address in use");
//!
//! assert_eq!(ev.kind, EventKind::ActorFailed);
//! assert_eq!(ev.actor.as_deref(), Some("http"));
//! assert_eq!(ev.reason.as_deref(), Some("bind: address in use"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `actor`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `actor`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Actor events ===
    /// Actor callback is about to run.
    ///
    /// Sets:
    /// - `actor`: actor name
    ActorStarting,

    /// Actor callback returned `Ok(())`.
    ///
    /// Sets:
    /// - `actor`: actor name
    ActorStopped,

    /// Actor callback returned an error (including context errors).
    ///
    /// Sets:
    /// - `actor`: actor name
    /// - `reason`: error message
    ActorFailed,

    /// Actor shutdown is about to be called.
    ///
    /// Sets:
    /// - `actor`: actor name
    /// - `timeout_ms`: shutdown timeout of the grace context
    ShutdownStarting,

    /// Actor shutdown returned.
    ///
    /// Sets:
    /// - `actor`: actor name
    /// - `reason`: `"grace deadline reached"` if it returned after the grace deadline
    ShutdownFinished,

    // === Group events ===
    /// The group decided to stop (first actor returned or the caller context is done).
    ///
    /// Sets:
    /// - `actor`: the actor that returned first (absent when the caller context ended the run)
    /// - `reason`: the candidate error, if any; `"actor panicked"` when the first
    ///   callback to finish panicked
    StopRequested,

    /// The group finished: all callbacks and all shutdown calls returned.
    ///
    /// Sets:
    /// - `reason`: the error returned to the caller, if any
    GroupStopped,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the actor (or subscriber), if applicable.
    pub actor: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Shutdown timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            actor: None,
            reason: None,
            timeout_ms: None,
        }
    }

    /// Attaches an actor name.
    #[inline]
    pub fn with_actor(mut self, actor: impl Into<Arc<str>>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_actor(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_actor(subscriber)
            .with_reason(info)
    }

    /// True for [`EventKind::SubscriberOverflow`].
    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    /// True for [`EventKind::SubscriberPanicked`].
    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::ActorStarting);
        let b = Event::new(EventKind::ActorStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_timeout_is_saturated() {
        let ev = Event::new(EventKind::ShutdownStarting).with_timeout(Duration::MAX);
        assert_eq!(ev.timeout_ms, Some(u32::MAX));

        let ev = Event::new(EventKind::ShutdownStarting).with_timeout(Duration::from_secs(5));
        assert_eq!(ev.timeout_ms, Some(5000));
    }

    #[test]
    fn test_subscriber_helpers() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert!(ev.is_subscriber_overflow());
        assert_eq!(ev.reason.as_deref(), Some("subscriber=audit reason=full"));

        let ev = Event::subscriber_panicked("audit", "boom".into());
        assert!(ev.is_subscriber_panic());
        assert_eq!(ev.actor.as_deref(), Some("audit"));
    }
}
