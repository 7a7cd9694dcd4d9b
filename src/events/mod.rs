//! Lifecycle events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] broadcast ring plus an optional lossless inbox for subscribers
//!
//! ## Quick reference
//! - **Publishers**: `Group::run` (terminal decision, final result), callback tasks,
//!   shutdown tasks, `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the subscriber inbox attached by `Group::run` and any receiver
//!   obtained from `Group::events`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
