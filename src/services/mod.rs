//! # Named services on top of the group.
//!
//! - [`Service`] - trait for named, long-running components (`start` / `stop`)
//! - [`ServiceActor`] - adapts a service into an [`Actor`](crate::Actor) with transition logs
//! - [`ServiceGroup`] - runs a list of services as one [`Group`](crate::Group)

mod group;
mod service;

pub use group::ServiceGroup;
pub use service::{Service, ServiceActor, ServiceRef};
