//! # ServiceGroup: run a list of services as one group.
//!
//! Builds a [`Group`] where every [`Service`](super::Service) becomes an actor through
//! [`ServiceActor`]. Empty slots (`None`) are skipped with a warning, so a service list
//! assembled from optional components can be passed as is.

use std::time::Duration;

use tracing::{info, warn};

use super::service::{ServiceActor, ServiceRef};
use crate::context::Context;
use crate::core::{Group, GroupBuilder};
use crate::error::ActorError;

/// Group of named services sharing one lifecycle.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use async_trait::async_trait;
/// use actorgroup::{ActorError, Context, Service, ServiceGroup, ServiceRef};
///
/// struct Once;
///
/// #[async_trait]
/// impl Service for Once {
///     fn name(&self) -> &str { "once" }
///     async fn start(&self, _ctx: Context) -> Result<(), ActorError> { Ok(()) }
///     async fn stop(&self, _ctx: Context) {}
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let services: Vec<Option<ServiceRef>> = vec![Some(Arc::new(Once)), None];
/// let group = ServiceGroup::new(Duration::from_secs(1), services);
/// assert_eq!(group.len(), 1);
/// assert!(group.run(Context::background()).await.is_ok());
/// # }
/// ```
pub struct ServiceGroup {
    group: Group,
}

impl ServiceGroup {
    /// Creates a group with the default settings and the given shutdown timeout.
    ///
    /// A zero `shutdown_timeout` keeps the default.
    pub fn new(shutdown_timeout: Duration, services: Vec<Option<ServiceRef>>) -> Self {
        Self::with_builder(
            Group::builder().with_shutdown_timeout(shutdown_timeout),
            services,
        )
    }

    /// Creates a group from a pre-configured builder.
    pub fn with_builder(builder: GroupBuilder, services: Vec<Option<ServiceRef>>) -> Self {
        let mut group = builder.build();

        info!(count = services.len(), "added workers");

        for (position, slot) in services.into_iter().enumerate() {
            let Some(service) = slot else {
                warn!(position, "ignore empty service slot");
                continue;
            };
            info!(name = service.name(), "add service");
            group.add_actor(ServiceActor::arc(service));
        }

        Self { group }
    }

    /// Number of services that will run.
    pub fn len(&self) -> usize {
        self.group.len()
    }

    /// True if no service will run.
    pub fn is_empty(&self) -> bool {
        self.group.is_empty()
    }

    /// Runs all services; see [`Group::run`].
    pub async fn run(self, ctx: Context) -> Result<(), ActorError> {
        self.group.run(ctx).await
    }
}
