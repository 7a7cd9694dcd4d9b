//! # LogWriter — renders events through `tracing`
//!
//! A minimal subscriber that turns incoming [`Event`]s into `tracing` records
//! (target `actorgroup`). Install any `tracing` subscriber to see them.
//!
//! ## Example output (`tracing_subscriber::fmt`)
//! ```text
//! INFO  actorgroup: actor starting actor="http"
//! WARN  actorgroup: actor failed actor="http" err="bind: address in use"
//! INFO  actorgroup: stop requested actor="http" reason="bind: address in use"
//! INFO  actorgroup: shutdown starting actor="worker" timeout_ms=5000
//! INFO  actorgroup: shutdown finished actor="worker"
//! INFO  actorgroup: group stopped err="bind: address in use"
//! ```

use async_trait::async_trait;
use tracing::{info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let actor = e.actor.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref();

        match e.kind {
            EventKind::ActorStarting => {
                info!(target: "actorgroup", actor, "actor starting");
            }
            EventKind::ActorStopped => {
                info!(target: "actorgroup", actor, "actor stopped");
            }
            EventKind::ActorFailed => {
                warn!(target: "actorgroup", actor, err = ?reason, "actor failed");
            }
            EventKind::StopRequested => {
                info!(target: "actorgroup", actor, reason = ?reason, "stop requested");
            }
            EventKind::ShutdownStarting => {
                info!(target: "actorgroup", actor, timeout_ms = ?e.timeout_ms, "shutdown starting");
            }
            EventKind::ShutdownFinished => match reason {
                Some(reason) => warn!(target: "actorgroup", actor, reason, "shutdown finished late"),
                None => info!(target: "actorgroup", actor, "shutdown finished"),
            },
            EventKind::GroupStopped => {
                info!(target: "actorgroup", err = ?reason, "group stopped");
            }
            EventKind::SubscriberOverflow => {
                warn!(target: "actorgroup", subscriber = actor, reason = ?reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                warn!(target: "actorgroup", subscriber = actor, info = ?reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
