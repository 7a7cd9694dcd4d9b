//! # actorgroup
//!
//! **actorgroup** runs a set of independently written units of work ("actors")
//! concurrently, waits for the first one to exit, then stops all of them within a
//! bounded grace period and returns a single, filtered error.
//!
//! It is the lifecycle core an application wires its servers, listeners, and workers
//! into: every one of them is an [`Actor`] (or a [`Service`]) handed to a [`Group`].
//! There are no restarts and no retries: the group runs until the first exit, then
//! stops everyone.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    Actor     │   │    Actor     │   │ ServiceActor │
//!     │ (http, grpc) │   │  (worker)    │   │  (Service)   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Group (GroupConfig: shutdown_timeout, ignore set)                │
//! │  - work context  "top"   = ctx.with_cancel()                      │
//! │  - grace context         = background().with_timeout(timeout)     │
//! │  - Bus (broadcast lifecycle events)                               │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!   actor.run(top)     actor.run(top)     actor.run(top)       │
//!        │ first exit (or caller ctx done) decides             │
//!        ▼                                                     ▼
//!   top.cancel() ──► actor.shutdown(grace) × N        SubscriberSet
//!                 ──► drain remaining callbacks       (LogWriter, custom)
//!                 ──► ignore.filter(first result)
//! ```
//!
//! ### Lifecycle
//! ```text
//! Idle ──run()──► Running (N actors racing)
//!                    │ first actor returns  |  caller ctx cancelled / deadline
//!                    ▼
//!                 Stopping (top.cancel + bounded shutdown fan-out)
//!                    ▼
//!                 Drained (every callback and shutdown returned) ──► Result
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                      |
//! |-------------------|---------------------------------------------------------------|-----------------------------------------|
//! | **Supervision**   | Run actors until the first exit, then stop everyone.          | [`Group`], [`GroupBuilder`]             |
//! | **Actors**        | Define actors as trait objects or closure pairs.              | [`Actor`], [`ActorFn`], [`ActorRef`]    |
//! | **Services**      | Named start/stop services with transition logs.               | [`Service`], [`ServiceGroup`]           |
//! | **Contexts**      | Cancellation with deadlines, signal-driven root context.      | [`Context`], [`graceful_context`]       |
//! | **Errors**        | Typed errors and the ignore set.                              | [`ActorError`], [`IgnoreRule`]          |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics).                | [`Subscribe`], [`Event`]                |
//! | **Configuration** | Centralized group settings.                                   | [`GroupConfig`]                         |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] that renders events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use actorgroup::{ActorError, Context, Group};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), ActorError> {
//!     let mut group = Group::builder()
//!         .with_shutdown_timeout(Duration::from_secs(1))
//!         .build();
//!
//!     // A worker that runs until it is told to stop.
//!     group.add_named(
//!         "worker",
//!         |ctx: Context| async move {
//!             ctx.done().await;
//!             Err(ActorError::from(ctx.err().unwrap_or_default()))
//!         },
//!         |_ctx: Context| async {},
//!     );
//!
//!     // Stop everything after 10ms; the deadline is an ignored error by default.
//!     let ctx = Context::background().with_timeout(Duration::from_millis(10));
//!     group.run(ctx).await
//! }
//! ```
mod context;
mod core;
mod error;
mod events;
mod services;
mod subscribers;

// ---- Public re-exports ----

pub use context::Context;
pub use crate::core::{
    Actor, ActorFn, ActorRef, Group, GroupBuilder, GroupConfig, IgnoreRule, IgnoreSet,
    graceful_context, wait_for_shutdown_signal,
};
pub use error::{ActorError, BoxError, ContextError};
pub use events::{Event, EventKind};
pub use services::{Service, ServiceActor, ServiceGroup, ServiceRef};
pub use subscribers::Subscribe;

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
