//! # Group: run actors until the first one exits, then stop them all.
//!
//! The [`Group`] owns a list of [`Actor`]s, a [`GroupConfig`] and an event [`Bus`].
//! [`Group::run`] starts every actor concurrently, waits for the first terminal event,
//! and drives a bounded shutdown of everyone.
//!
//! ## High-level flow
//! ```text
//! run(ctx):
//!   0 actors ─────────────────────────────────────────────► Ok(())
//!
//!   top = ctx.with_cancel()
//!   actor[0].run(top)   actor[1].run(top)   ...   actor[N-1].run(top)    (JoinSet, one task each)
//!         │                   │                          │
//!         └─────── first join_next() ◄── select! ──► top.done() (caller ctx ended)
//!                              │
//!                  candidate = that result  |  candidate = top.err()
//!                              ▼
//!   top.cancel()                               (the one stop signal for callbacks)
//!   grace = background().with_timeout(shutdown_timeout)
//!   actor[i].shutdown(grace) for all i          (JoinSet, one task each)
//!   join!( drain remaining callbacks , join all shutdowns )
//!   ignore.filter(candidate) ──────────────────────────────► result
//! ```
//!
//! ## Rules
//! - Every actor's `run` and `shutdown` are called exactly once per `run`.
//! - `shutdown` is called even if the actor's `run` already returned.
//! - Only the first terminal result is surfaced; later results are drained and dropped.
//! - The grace context is rooted at a fresh background context, so the shutdown window
//!   does not depend on why the group stopped.
//! - A `shutdown` that ignores its deadline keeps `run` waiting; the group never abandons it.
//! - A panic in `run` or `shutdown` is re-raised on the caller once every other actor
//!   has been stopped and drained.

use std::any::Any;
use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::{JoinError, JoinSet};

use crate::context::Context;
use crate::core::actor::{Actor, ActorFn, ActorRef};
use crate::core::builder::GroupBuilder;
use crate::core::config::GroupConfig;
use crate::error::{ActorError, ContextError};
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::{Subscribe, SubscriberSet};

type PanicPayload = Box<dyn Any + Send + 'static>;

/// `StopRequested` reason when the first callback to finish panicked.
const ACTOR_PANICKED: &str = "actor panicked";

/// `ShutdownFinished` reason when a shutdown returned after the grace deadline.
const GRACE_DEADLINE_REACHED: &str = "grace deadline reached";

/// Runs a set of actors concurrently and stops them together.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use actorgroup::{ActorError, Context, Group};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut group = Group::builder()
///     .with_shutdown_timeout(Duration::from_millis(50))
///     .build();
///
/// group
///     .add(
///         |_ctx: Context| async { Err(ActorError::failed("boom")) },
///         |_ctx: Context| async {},
///     )
///     .add(
///         |ctx: Context| async move {
///             ctx.done().await;
///             Err(ActorError::from(ctx.err().unwrap_or_default()))
///         },
///         |_ctx: Context| async {},
///     );
///
/// let err = group.run(Context::background()).await.unwrap_err();
/// assert_eq!(err.to_string(), "boom");
/// # }
/// ```
pub struct Group {
    cfg: GroupConfig,
    actors: Vec<ActorRef>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    bus: Bus,
}

impl Group {
    /// Creates an empty group with the given configuration and no subscribers.
    pub fn new(cfg: GroupConfig) -> Self {
        Self::new_internal(cfg, Vec::new())
    }

    /// Returns a builder starting from [`GroupConfig::default`].
    pub fn builder() -> GroupBuilder {
        GroupBuilder::new(GroupConfig::default())
    }

    pub(crate) fn new_internal(cfg: GroupConfig, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self {
            cfg,
            actors: Vec::new(),
            subscribers,
            bus,
        }
    }

    /// Registers an actor from a callback and a shutdown closure.
    ///
    /// The actor is named `actor-<index>` in lifecycle events.
    pub fn add<C, CF, S, SF>(&mut self, callback: C, shutdown: S) -> &mut Self
    where
        C: Fn(Context) -> CF + Send + Sync + 'static,
        CF: Future<Output = Result<(), ActorError>> + Send + 'static,
        S: Fn(Context) -> SF + Send + Sync + 'static,
        SF: Future<Output = ()> + Send + 'static,
    {
        let name = format!("actor-{}", self.actors.len());
        self.add_named(name, callback, shutdown)
    }

    /// Registers a named actor from a callback and a shutdown closure.
    pub fn add_named<C, CF, S, SF>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        callback: C,
        shutdown: S,
    ) -> &mut Self
    where
        C: Fn(Context) -> CF + Send + Sync + 'static,
        CF: Future<Output = Result<(), ActorError>> + Send + 'static,
        S: Fn(Context) -> SF + Send + Sync + 'static,
        SF: Future<Output = ()> + Send + 'static,
    {
        self.add_actor(ActorFn::arc(name, callback, shutdown))
    }

    /// Registers an actor object.
    pub fn add_actor(&mut self, actor: ActorRef) -> &mut Self {
        self.actors.push(actor);
        self
    }

    /// Number of registered actors.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// True if no actor is registered.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Returns the group configuration.
    pub fn config(&self) -> &GroupConfig {
        &self.cfg
    }

    /// Creates a receiver for the lifecycle events of the coming [`run`](Self::run).
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Runs all actors until the first one returns or `ctx` is done, then stops everyone.
    ///
    /// Returns the first terminal result after the ignore filter: the first actor's
    /// result, or the context error if `ctx` ended first. Blocks until every callback
    /// and every shutdown call has returned.
    ///
    /// Consumes the group: a group runs once.
    pub async fn run(self, ctx: Context) -> Result<(), ActorError> {
        let Group {
            cfg,
            actors,
            subscribers,
            bus,
        } = self;

        if actors.is_empty() {
            return Ok(());
        }

        let (bus, subscribers) = SubscriberSet::attach(&bus, subscribers);

        let top = ctx.with_cancel();
        let mut callbacks = JoinSet::new();
        for actor in &actors {
            callbacks.spawn(run_actor(Arc::clone(actor), top.clone(), bus.clone()));
        }

        let mut panicked: Option<PanicPayload> = None;
        let (first, candidate) = tokio::select! {
            biased;
            Some(joined) = callbacks.join_next() => match joined {
                Ok((name, res)) => (Some(name), res),
                Err(err) => {
                    panicked = panic_payload(err);
                    (None, Err(ActorError::from(ContextError::Canceled)))
                }
            },
            _ = top.done() => (None, Err(ActorError::from(top.err().unwrap_or_default()))),
        };

        let mut stop = Event::new(EventKind::StopRequested);
        if let Some(name) = first {
            stop = stop.with_actor(name);
        }
        if panicked.is_some() {
            stop = stop.with_reason(ACTOR_PANICKED);
        } else if let Err(e) = &candidate {
            stop = stop.with_reason(e.to_string());
        }
        bus.publish(stop);

        top.cancel();

        let timeout = cfg.shutdown_timeout();
        let grace = Context::background().with_timeout(timeout);
        let mut shutdowns = JoinSet::new();
        for actor in &actors {
            shutdowns.spawn(stop_actor(
                Arc::clone(actor),
                grace.clone(),
                timeout,
                bus.clone(),
            ));
        }

        let (drained, stopped) = tokio::join!(drain(&mut callbacks), drain(&mut shutdowns));

        let res = cfg.ignore.filter(candidate);

        let mut done = Event::new(EventKind::GroupStopped);
        if let Err(e) = &res {
            done = done.with_reason(e.to_string());
        }
        bus.publish(done);

        if let Some(subscribers) = subscribers {
            subscribers.flush().await;
        }
        if let Some(payload) = panicked.or(drained).or(stopped) {
            std::panic::resume_unwind(payload);
        }
        res
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.actors.iter().map(|a| a.name()).collect();
        f.debug_struct("Group")
            .field("cfg", &self.cfg)
            .field("actors", &names)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Runs one callback, publishing its start and terminal event.
async fn run_actor(
    actor: ActorRef,
    ctx: Context,
    bus: Bus,
) -> (Arc<str>, Result<(), ActorError>) {
    let name: Arc<str> = Arc::from(actor.name());
    bus.publish(Event::new(EventKind::ActorStarting).with_actor(Arc::clone(&name)));

    let res = actor.run(ctx).await;

    let ev = match &res {
        Ok(()) => Event::new(EventKind::ActorStopped),
        Err(e) => Event::new(EventKind::ActorFailed).with_reason(e.to_string()),
    };
    bus.publish(ev.with_actor(Arc::clone(&name)));
    (name, res)
}

/// Runs one shutdown call with the shared grace context.
async fn stop_actor(actor: ActorRef, grace: Context, timeout: Duration, bus: Bus) {
    bus.publish(
        Event::new(EventKind::ShutdownStarting)
            .with_actor(actor.name())
            .with_timeout(timeout),
    );

    actor.shutdown(grace.clone()).await;

    let mut ev = Event::new(EventKind::ShutdownFinished).with_actor(actor.name());
    if grace.is_done() {
        ev = ev.with_reason(GRACE_DEADLINE_REACHED);
    }
    bus.publish(ev);
}

/// Joins every task left in `set`, returning the first panic payload seen.
async fn drain<T: 'static>(set: &mut JoinSet<T>) -> Option<PanicPayload> {
    let mut first = None;
    while let Some(joined) = set.join_next().await {
        if let Err(err) = joined {
            if first.is_none() {
                first = panic_payload(err);
            }
        }
    }
    first
}

fn panic_payload(err: JoinError) -> Option<PanicPayload> {
    if err.is_panic() {
        Some(err.into_panic())
    } else {
        None
    }
}
