//! # Named services and their actor adapter.
//!
//! A [`Service`] is the higher-level shape most servers and workers have: a name, a
//! blocking `start` and a `stop`. [`ServiceActor`] turns one into an [`Actor`] and logs
//! each transition with `tracing`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::context::Context;
use crate::core::Actor;
use crate::error::ActorError;

/// # Shared handle to a service object.
pub type ServiceRef = Arc<dyn Service>;

/// # Long-running named service (HTTP listener, queue consumer, ...).
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use actorgroup::{ActorError, Context, Service};
///
/// struct Metrics;
///
/// #[async_trait]
/// impl Service for Metrics {
///     fn name(&self) -> &str { "metrics" }
///
///     async fn start(&self, ctx: Context) -> Result<(), ActorError> {
///         ctx.done().await;
///         Ok(())
///     }
///
///     async fn stop(&self, _ctx: Context) {}
/// }
/// ```
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Returns a stable, human-readable service name.
    fn name(&self) -> &str;

    /// Serves until done, failed, or `ctx` is done.
    async fn start(&self, ctx: Context) -> Result<(), ActorError>;

    /// Stops serving; should return before `ctx`'s deadline.
    async fn stop(&self, ctx: Context);
}

/// Adapts a [`Service`] into an [`Actor`], logging `run service` / `stop service`.
pub struct ServiceActor {
    service: ServiceRef,
}

impl ServiceActor {
    /// Wraps a service.
    pub fn new(service: ServiceRef) -> Self {
        Self { service }
    }

    /// Wraps a service and returns it as a shared actor handle.
    pub fn arc(service: ServiceRef) -> Arc<Self> {
        Arc::new(Self::new(service))
    }
}

#[async_trait]
impl Actor for ServiceActor {
    fn name(&self) -> &str {
        self.service.name()
    }

    async fn run(&self, ctx: Context) -> Result<(), ActorError> {
        info!(name = self.service.name(), "run service");
        self.service.start(ctx).await
    }

    async fn shutdown(&self, ctx: Context) {
        info!(name = self.service.name(), "stop service");
        self.service.stop(ctx).await
    }
}
