//! # Example: web_and_worker
//!
//! Runs two named services in one group until Ctrl-C / SIGTERM / SIGHUP.
//!
//! Shows how to:
//! - Implement [`Service`] for long-running components
//! - Root the run in [`graceful_context`] so OS signals stop everything
//! - Attach the built-in [`LogWriter`] and install a `tracing` subscriber
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► ServiceGroup [ticker, flaky]
//!   ├─► run(graceful_context())
//!   │     ├─► ticker: ticks every 500ms until cancelled
//!   │     └─► flaky: fails after 3s ─► StopRequested
//!   │                                   ├─► top.cancel()   (ticker returns)
//!   │                                   └─► stop(grace) × 2
//!   └─► prints the returned error
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example web_and_worker --features logging
//! ```

use std::{sync::Arc, time::Duration};

use actorgroup::{
    ActorError, Context, Group, LogWriter, Service, ServiceGroup, ServiceRef, Subscribe,
    graceful_context,
};
use async_trait::async_trait;
use tracing_subscriber::EnvFilter;

struct Ticker;

#[async_trait]
impl Service for Ticker {
    fn name(&self) -> &str {
        "ticker"
    }

    async fn start(&self, ctx: Context) -> Result<(), ActorError> {
        let mut tick = tokio::time::interval(Duration::from_millis(500));
        let mut counter = 0u32;
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    counter += 1;
                    tracing::info!(counter, "tick");
                }
                _ = ctx.done() => return Err(ctx.err().unwrap_or_default().into()),
            }
        }
    }

    async fn stop(&self, _ctx: Context) {}
}

struct Flaky;

#[async_trait]
impl Service for Flaky {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn start(&self, ctx: Context) -> Result<(), ActorError> {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(3)) => {
                Err(ActorError::failed("upstream connection reset"))
            }
            _ = ctx.done() => Err(ctx.err().unwrap_or_default().into()),
        }
    }

    async fn stop(&self, ctx: Context) {
        // Pretend to flush buffers, bounded by the grace deadline.
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(200)) => {}
            _ = ctx.done() => tracing::warn!("flush interrupted"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let builder = Group::builder()
        .with_shutdown_timeout(Duration::from_secs(2))
        .with_subscribers(subs);

    let services: Vec<Option<ServiceRef>> = vec![Some(Arc::new(Ticker)), Some(Arc::new(Flaky))];
    let group = ServiceGroup::with_builder(builder, services);

    match group.run(graceful_context()).await {
        Ok(()) => println!("stopped cleanly"),
        Err(err) => println!("stopped with error: {err} ({})", err.as_label()),
    }
    Ok(())
}
