//! Runtime core: actors, group orchestration and shutdown.
//!
//! Internal modules:
//! - [`actor`]: the actor contract and the closure-backed [`ActorFn`];
//! - [`group`]: runs actors, decides when to stop, drives the bounded shutdown;
//! - [`builder`]: construction-time options;
//! - [`config`]: group settings and defaults;
//! - [`ignore`]: errors that count as a clean stop;
//! - [`shutdown`]: OS signal handling and the graceful root context.

mod actor;
mod builder;
mod config;
mod group;
mod ignore;
mod shutdown;

pub use actor::{Actor, ActorFn, ActorRef};
pub use builder::GroupBuilder;
pub use config::GroupConfig;
pub use group::Group;
pub use ignore::{IgnoreRule, IgnoreSet};
pub use shutdown::{graceful_context, wait_for_shutdown_signal};
