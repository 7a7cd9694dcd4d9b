//! # Per-run subscriber fan-out.
//!
//! [`SubscriberSet::attach`] hooks the group's subscribers onto a [`Bus`] for one run:
//! the returned bus feeds an unbounded inbox, and a dispatcher task hands each event
//! to every subscriber's bounded queue.
//!
//! ```text
//! Bus::publish ──► inbox ──► dispatcher ──┬──► [queue S1] ──► worker S1 ──► on_event()
//!   (lossless)                            └──► [queue SN] ──► worker SN ──► on_event()
//! ```
//!
//! ## Rules
//! - Every subscriber sees events in inbox order.
//! - A full subscriber queue drops the event for that subscriber only and publishes
//!   `SubscriberOverflow` (never for an overflow report itself).
//! - A panic in `on_event` is caught and published as `SubscriberPanicked`; the worker
//!   keeps going.
//! - [`SubscriberSet::flush`] returns once everything published before it was handled.
//!   Reports raised while flushing reach broadcast receivers only.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use super::Subscribe;
use crate::events::{Bus, Event};

/// Subscribers attached to one run of a group.
pub(crate) struct SubscriberSet {
    stop: CancellationToken,
    dispatcher: JoinHandle<()>,
}

impl SubscriberSet {
    /// Attaches `subscribers` to `bus`.
    ///
    /// Returns the bus the run must publish through, and the set to flush at the end
    /// (`None` when there are no subscribers). Must be called inside a Tokio runtime.
    pub(crate) fn attach(
        bus: &Bus,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> (Bus, Option<Self>) {
        if subscribers.is_empty() {
            return (bus.clone(), None);
        }
        let (tx, inbox) = mpsc::unbounded_channel();
        let bus = bus.with_inbox(tx);
        let queues = Queues::spawn(subscribers, &bus);
        let stop = CancellationToken::new();
        let dispatcher = tokio::spawn(dispatch(inbox, queues, stop.clone()));

        (bus, Some(Self { stop, dispatcher }))
    }

    /// Delivers everything published so far, then waits for every subscriber to finish.
    pub(crate) async fn flush(self) {
        self.stop.cancel();
        let _ = self.dispatcher.await;
    }
}

async fn dispatch(
    mut inbox: mpsc::UnboundedReceiver<Arc<Event>>,
    queues: Queues,
    stop: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            Some(ev) = inbox.recv() => queues.deliver(ev),
            _ = stop.cancelled() => break,
        }
    }
    while let Ok(ev) = inbox.try_recv() {
        queues.deliver(ev);
    }
    queues.close().await;
}

/// Bounded queue in front of one subscriber's worker.
struct Queue {
    subscriber: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
}

struct Queues {
    queues: Vec<Queue>,
    workers: JoinSet<()>,
    bus: Bus,
}

impl Queues {
    fn spawn(subscribers: Vec<Arc<dyn Subscribe>>, bus: &Bus) -> Self {
        let mut queues = Vec::with_capacity(subscribers.len());
        let mut workers = JoinSet::new();

        for sub in subscribers {
            let (tx, rx) = mpsc::channel(sub.queue_capacity().max(1));
            queues.push(Queue {
                subscriber: sub.name(),
                tx,
            });
            workers.spawn(work(sub, rx, bus.clone()));
        }
        Self {
            queues,
            workers,
            bus: bus.clone(),
        }
    }

    fn deliver(&self, ev: Arc<Event>) {
        for queue in &self.queues {
            let reason = match queue.tx.try_send(Arc::clone(&ev)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !ev.is_subscriber_overflow() {
                self.bus
                    .publish(Event::subscriber_overflow(queue.subscriber, reason));
            }
        }
    }

    async fn close(self) {
        let Queues {
            queues,
            mut workers,
            ..
        } = self;
        drop(queues);
        while workers.join_next().await.is_some() {}
    }
}

async fn work(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>, bus: Bus) {
    while let Some(ev) = rx.recv().await {
        if let Err(payload) = AssertUnwindSafe(sub.on_event(&ev)).catch_unwind().await {
            bus.publish(Event::subscriber_panicked(
                sub.name(),
                panic_message(payload.as_ref()),
            ));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_owned()
    }
}
