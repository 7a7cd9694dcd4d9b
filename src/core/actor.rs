//! # Actor contract and closure-backed actor.
//!
//! An [`Actor`] is a pair of operations driven by the [`Group`](crate::Group):
//! - [`run`](Actor::run): the blocking unit of work, called once per group run with the
//!   *work context*;
//! - [`shutdown`](Actor::shutdown): a best-effort stop request, called once per group run
//!   with the *grace context* (fresh root, bounded by the group shutdown timeout).
//!
//! [`ActorFn`] builds an actor from two closures, each producing a fresh future per call.
//!
//! ## Example
//! ```rust
//! use actorgroup::{ActorError, ActorFn, ActorRef, Context};
//!
//! let a: ActorRef = ActorFn::arc(
//!     "ticker",
//!     |ctx: Context| async move {
//!         ctx.done().await;
//!         Err::<(), _>(ActorError::from(ctx.err().unwrap_or_default()))
//!     },
//!     |_ctx: Context| async {},
//! );
//! assert_eq!(a.name(), "ticker");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::Context;
use crate::error::ActorError;

/// # Shared handle to an actor object.
pub type ActorRef = Arc<dyn Actor>;

/// # Unit of work supervised by a group.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use actorgroup::{Actor, ActorError, Context};
///
/// struct Listener;
///
/// #[async_trait]
/// impl Actor for Listener {
///     fn name(&self) -> &str { "listener" }
///
///     async fn run(&self, ctx: Context) -> Result<(), ActorError> {
///         // accept connections until cancelled...
///         ctx.done().await;
///         Ok(())
///     }
///
///     async fn shutdown(&self, _ctx: Context) {
///         // close the socket, drain in-flight requests until `_ctx` is done...
///     }
/// }
/// ```
#[async_trait]
pub trait Actor: Send + Sync + 'static {
    /// Returns a stable, human-readable actor name.
    fn name(&self) -> &str;

    /// Runs the unit of work.
    ///
    /// Must not return until the work is finished, failed, or `ctx` is done.
    /// Returns `Ok(())` on voluntary completion, a domain error on failure, or
    /// the context error if it observed cancellation.
    async fn run(&self, ctx: Context) -> Result<(), ActorError>;

    /// Asks the actor to stop.
    ///
    /// Should make the paired [`run`](Actor::run) return and itself return before `ctx`'s
    /// deadline. Failures here cannot be reported to the group; handle them locally.
    async fn shutdown(&self, ctx: Context);
}

/// Closure-backed actor.
///
/// Wraps a `callback` and a `shutdown` closure; each call creates a new future.
#[derive(Debug)]
pub struct ActorFn<C, S> {
    name: Cow<'static, str>,
    callback: C,
    shutdown: S,
}

impl<C, S> ActorFn<C, S> {
    /// Creates a new closure-backed actor.
    ///
    /// Prefer [`ActorFn::arc`] when you immediately need an [`ActorRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, callback: C, shutdown: S) -> Self {
        Self {
            name: name.into(),
            callback,
            shutdown,
        }
    }

    /// Creates the actor and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, callback: C, shutdown: S) -> Arc<Self> {
        Arc::new(Self::new(name, callback, shutdown))
    }
}

#[async_trait]
impl<C, CF, S, SF> Actor for ActorFn<C, S>
where
    C: Fn(Context) -> CF + Send + Sync + 'static,
    CF: Future<Output = Result<(), ActorError>> + Send + 'static,
    S: Fn(Context) -> SF + Send + Sync + 'static,
    SF: Future<Output = ()> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: Context) -> Result<(), ActorError> {
        (self.callback)(ctx).await
    }

    async fn shutdown(&self, ctx: Context) {
        (self.shutdown)(ctx).await
    }
}
