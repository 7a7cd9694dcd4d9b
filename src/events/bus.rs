//! # Event bus for group lifecycle events.
//!
//! [`Bus`] publishes to two kinds of receivers:
//! - a [`tokio::sync::broadcast`] ring read by [`Group::events`](crate::Group::events);
//! - an optional unbounded inbox feeding the run's subscribers.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                  Receivers:
//!   callback tasks ──┐               ┌──► inbox (lossless) ──► SubscriberSet
//!   shutdown tasks ──┼──────► Bus ───┤
//!   Group::run     ──┘               └──► broadcast ring ──► Group::events() receivers
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks.
//! - **Lossless inbox**: the inbox sees every event, in publish order.
//! - **Bounded ring**: slow broadcast receivers get `RecvError::Lagged(n)` and skip `n` items.
//! - **No persistence**: broadcast events are lost if there are no receivers at send time.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use super::event::Event;

/// Publisher side of the lifecycle event stream.
///
/// Cheap to clone; every clone publishes to the same receivers.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
    inbox: Option<mpsc::UnboundedSender<Arc<Event>>>,
}

impl Bus {
    /// Creates a new bus with the given broadcast capacity (minimum 1) and no inbox.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx, inbox: None }
    }

    /// Returns a bus that also delivers every event to `inbox`.
    ///
    /// Broadcast receivers are shared with `self`.
    pub(crate) fn with_inbox(&self, inbox: mpsc::UnboundedSender<Arc<Event>>) -> Self {
        Self {
            tx: self.tx.clone(),
            inbox: Some(inbox),
        }
    }

    /// Publishes an event to the inbox (if any) and to all broadcast receivers.
    pub fn publish(&self, ev: Event) {
        let Some(inbox) = &self.inbox else {
            let _ = self.tx.send(ev);
            return;
        };
        if self.tx.receiver_count() > 0 {
            let _ = self.tx.send(ev.clone());
        }
        let _ = inbox.send(Arc::new(ev));
    }

    /// Creates a new broadcast receiver that will observe subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
