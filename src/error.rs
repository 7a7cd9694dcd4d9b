//! Error types used by the group runtime and its actors.
//!
//! This module defines:
//!
//! - [`ContextError`] — the reason a [`Context`](crate::Context) is done.
//! - [`ActorError`] — what an actor's `run` returns, and what [`Group::run`](crate::Group::run) surfaces.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! [`ActorError::chain`] walks the wrapped error and its `source()` chain, which is
//! what the ignore set matches against.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error accepted by [`ActorError::Failed`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// # Reason a context is done.
///
/// Returned by [`Context::err`](crate::Context::err) once the context was cancelled
/// or its deadline passed.
#[derive(Error, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContextError {
    /// The context (or one of its ancestors) was cancelled.
    #[default]
    #[error("context canceled")]
    Canceled,

    /// The context deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

impl ContextError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ContextError::Canceled => "context_canceled",
            ContextError::DeadlineExceeded => "context_deadline_exceeded",
        }
    }
}

/// # Errors produced by actors.
///
/// An actor either observed its context being done ([`ActorError::Context`]) or
/// failed on its own ([`ActorError::Failed`]).
///
/// # Example
/// ```
/// use actorgroup::{ActorError, ContextError};
///
/// let err = ActorError::failed("connection refused");
/// assert_eq!(err.as_label(), "actor_failed");
/// assert_eq!(err.to_string(), "connection refused");
///
/// let err = ActorError::from(ContextError::Canceled);
/// assert!(err.is_context());
/// ```
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ActorError {
    /// The actor returned because its context is done.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The actor failed with a domain error.
    #[error(transparent)]
    Failed(BoxError),
}

impl ActorError {
    /// Wraps any error (or message) into [`ActorError::Failed`].
    pub fn failed(error: impl Into<BoxError>) -> Self {
        ActorError::Failed(error.into())
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ActorError::Context(e) => e.as_label(),
            ActorError::Failed(_) => "actor_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ActorError::Context(e) => e.to_string(),
            ActorError::Failed(e) => format!("error: {e}"),
        }
    }

    /// True if the actor stopped because its context is done.
    pub fn is_context(&self) -> bool {
        matches!(self, ActorError::Context(_))
    }

    /// Iterates over the wrapped error followed by its `source()` chain.
    ///
    /// The variant itself is skipped: both variants are transparent wrappers.
    pub fn chain(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> {
        let first: &(dyn StdError + 'static) = match self {
            ActorError::Context(e) => e,
            ActorError::Failed(e) => e.as_ref(),
        };
        std::iter::successors(Some(first), |e| (*e).source())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Error, Debug)]
    #[error("outer")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_labels() {
        assert_eq!(
            ActorError::from(ContextError::Canceled).as_label(),
            "context_canceled"
        );
        assert_eq!(
            ActorError::from(ContextError::DeadlineExceeded).as_label(),
            "context_deadline_exceeded"
        );
        assert_eq!(ActorError::failed("boom").as_label(), "actor_failed");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ActorError::from(ContextError::DeadlineExceeded).to_string(),
            "context deadline exceeded"
        );
        assert_eq!(ActorError::failed("boom").as_message(), "error: boom");
    }

    #[test]
    fn test_chain_walks_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use");
        let err = ActorError::failed(Outer(io));

        let links: Vec<String> = err.chain().map(|e| e.to_string()).collect();
        assert_eq!(links, vec!["outer".to_string(), "in use".to_string()]);
        assert!(err.chain().any(|e| e.is::<std::io::Error>()));
    }

    #[test]
    fn test_chain_of_context_error() {
        let err = ActorError::from(ContextError::Canceled);
        let first = err.chain().next().and_then(|e| e.downcast_ref::<ContextError>());
        assert_eq!(first, Some(&ContextError::Canceled));
        assert_eq!(err.chain().count(), 1);
    }
}
