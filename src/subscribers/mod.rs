//! # Event subscribers for group lifecycle events.
//!
//! This module provides the [`Subscribe`] trait, the per-run fan-out and an optional
//! built-in `LogWriter` (feature `logging`).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Group::run ── publish(Event) ──► Bus ──► inbox ──► dispatcher
//!                                                           │
//!                                           ┌───────────────┼─────────┐
//!                                           ▼               ▼         ▼
//!                                       LogWriter        Metrics    Custom
//! ```
//!
//! Subscribers are attached with [`GroupBuilder::with_subscribers`](crate::GroupBuilder::with_subscribers);
//! the set lives for the duration of one [`Group::run`](crate::Group::run) and is flushed
//! before `run` returns.

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub(crate) use set::SubscriberSet;
pub use subscribe::Subscribe;
