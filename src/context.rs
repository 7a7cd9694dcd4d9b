//! # Cancellation context with an optional deadline.
//!
//! [`Context`] pairs a [`CancellationToken`] with an optional deadline and remembers
//! *why* it is done ([`ContextError`]). Contexts form a tree:
//!
//! ```text
//! background ──► with_cancel() ──► with_timeout(d)
//!    (root)        (child token)     (child token, deadline = min(parent, now + d))
//! ```
//!
//! ## Rules
//! - Cancelling a context cancels all of its descendants (token hierarchy).
//! - A child inherits its parent's deadline; it can only make it earlier.
//! - Deadlines are evaluated lazily by [`Context::done`] and [`Context::err`]; no timer
//!   task is spawned per context. The raw [`Context::token`] does **not** observe deadlines.
//! - The first reason observed through [`Context::err`] is kept for the lifetime of the context.
//! - A deadline that passed before the cancellation reached the context is reported as
//!   [`ContextError::DeadlineExceeded`], even if nobody asked before the cancel.

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::error::ContextError;

/// Cancellation signal plus optional deadline, cheap to clone.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use actorgroup::{Context, ContextError};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let root = Context::background();
/// let ctx = root.with_timeout(Duration::from_millis(1));
///
/// ctx.done().await;
/// assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
/// assert_eq!(root.err(), None);
/// # }
/// ```
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

struct Inner {
    token: CancellationToken,
    deadline: Option<Instant>,
    reason: OnceLock<ContextError>,
    cancelled_at: OnceLock<Instant>,
    parent: Option<Context>,
}

impl Context {
    /// Returns a fresh root context: never cancelled by an ancestor, no deadline.
    pub fn background() -> Self {
        Self::from_parts(CancellationToken::new(), None, None)
    }

    /// Wraps an existing token as a root context.
    ///
    /// Cancelling `token` makes the context report [`ContextError::Canceled`].
    pub fn from_token(token: CancellationToken) -> Self {
        Self::from_parts(token, None, None)
    }

    /// Derives a child that is cancelled with its parent or by its own [`cancel`](Self::cancel).
    pub fn with_cancel(&self) -> Self {
        Self::from_parts(
            self.inner.token.child_token(),
            self.inner.deadline,
            Some(self.clone()),
        )
    }

    /// Derives a child whose deadline is `at`, or the parent's deadline if that is earlier.
    pub fn with_deadline(&self, at: Instant) -> Self {
        let deadline = match self.inner.deadline {
            Some(parent) => Some(parent.min(at)),
            None => Some(at),
        };
        Self::from_parts(self.inner.token.child_token(), deadline, Some(self.clone()))
    }

    /// Derives a child with a deadline `timeout` from now.
    ///
    /// A timeout too large to represent keeps the parent's deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(at) => self.with_deadline(at),
            None => self.with_cancel(),
        }
    }

    fn from_parts(
        token: CancellationToken,
        deadline: Option<Instant>,
        parent: Option<Context>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                token,
                deadline,
                reason: OnceLock::new(),
                cancelled_at: OnceLock::new(),
                parent,
            }),
        }
    }

    /// Cancels this context and all of its descendants. Idempotent.
    ///
    /// A context that is already done keeps its original reason.
    pub fn cancel(&self) {
        if self.err().is_none() {
            let _ = self.inner.reason.set(ContextError::Canceled);
            let _ = self.inner.cancelled_at.set(Instant::now());
        }
        self.inner.token.cancel();
    }

    /// Completes once the context is cancelled or its deadline passes.
    pub async fn done(&self) {
        match self.inner.deadline {
            Some(at) => {
                tokio::select! {
                    _ = self.inner.token.cancelled() => {}
                    _ = time::sleep_until(at) => {}
                }
            }
            None => self.inner.token.cancelled().await,
        }
    }

    /// Returns why the context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<ContextError> {
        if let Some(reason) = self.inner.reason.get() {
            return Some(*reason);
        }

        let observed = if self.inner.token.is_cancelled() {
            if self.expired_before_cancel() {
                ContextError::DeadlineExceeded
            } else {
                self.inner
                    .parent
                    .as_ref()
                    .and_then(Context::err)
                    .unwrap_or(ContextError::Canceled)
            }
        } else {
            match self.inner.deadline {
                Some(at) if Instant::now() >= at => ContextError::DeadlineExceeded,
                _ => return None,
            }
        };
        Some(*self.inner.reason.get_or_init(|| observed))
    }

    /// True if the deadline passed before the cancellation that reached this context.
    ///
    /// A token cancelled from outside (see [`from_token`](Self::from_token)) has no
    /// recorded instant; then any passed deadline counts.
    fn expired_before_cancel(&self) -> bool {
        match (self.inner.deadline, self.cancelled_at()) {
            (Some(at), Some(cancelled)) => at <= cancelled,
            (Some(at), None) => Instant::now() >= at,
            (None, _) => false,
        }
    }

    /// Earliest explicit [`cancel`](Self::cancel) on this context or an ancestor.
    fn cancelled_at(&self) -> Option<Instant> {
        let own = self.inner.cancelled_at.get().copied();
        let inherited = self.inner.parent.as_ref().and_then(Context::cancelled_at);
        match (own, inherited) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// True once the context is cancelled or past its deadline.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Returns the effective deadline, if any.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Returns the underlying cancellation token (does not observe the deadline).
    #[inline]
    pub fn token(&self) -> &CancellationToken {
        &self.inner.token
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("deadline", &self.inner.deadline)
            .field("err", &self.err())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_live() {
        let ctx = Context::background();
        assert!(!ctx.is_done());
        assert_eq!(ctx.err(), None);
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn test_cancel_propagates_to_children_only() {
        let root = Context::background();
        let mid = root.with_cancel();
        let leaf = mid.with_cancel();

        mid.cancel();

        assert_eq!(root.err(), None);
        assert_eq!(mid.err(), Some(ContextError::Canceled));
        assert_eq!(leaf.err(), Some(ContextError::Canceled));
    }

    #[test]
    fn test_from_token_reports_canceled() {
        let token = CancellationToken::new();
        let ctx = Context::from_token(token.clone()).with_cancel();
        token.cancel();
        assert_eq!(ctx.err(), Some(ContextError::Canceled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded() {
        let ctx = Context::background().with_timeout(Duration::from_millis(10));
        assert_eq!(ctx.err(), None);

        ctx.done().await;
        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
    }

    #[tokio::test(start_paused = true)]
    async fn test_child_inherits_earlier_deadline() {
        let parent = Context::background().with_timeout(Duration::from_millis(10));
        let child = parent.with_timeout(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());

        let child = parent.with_cancel();
        child.done().await;
        assert_eq!(child.err(), Some(ContextError::DeadlineExceeded));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_deadline_keeps_reason() {
        let ctx = Context::background().with_timeout(Duration::from_millis(1));
        ctx.done().await;

        ctx.cancel();
        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
    }

    #[tokio::test(start_paused = true)]
    async fn test_parent_deadline_reported_through_canceled_child() {
        let parent = Context::background().with_timeout(Duration::from_millis(5));
        let child = parent.with_cancel();

        parent.done().await;
        parent.cancel();

        assert_eq!(child.err(), Some(ContextError::DeadlineExceeded));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_child_reports_deadline_after_parent_cancel() {
        let parent = Context::background();
        let child = parent.with_timeout(Duration::from_millis(1));

        time::sleep(Duration::from_millis(5)).await;
        parent.cancel();

        assert_eq!(parent.err(), Some(ContextError::Canceled));
        assert_eq!(child.err(), Some(ContextError::DeadlineExceeded));
    }

    #[tokio::test(start_paused = true)]
    async fn test_parent_cancel_before_child_deadline_reports_canceled() {
        let parent = Context::background();
        let child = parent.with_timeout(Duration::from_millis(10));

        parent.cancel();
        time::sleep(Duration::from_millis(20)).await;

        assert_eq!(child.err(), Some(ContextError::Canceled));
    }
}
