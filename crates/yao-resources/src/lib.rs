//! REST resource mapping for OpenStack-compatible clouds.
//!
//! Every resource type wraps a [`Base`] attribute map and declares a
//! [`ResourceMeta`]; [`RestfullyAccessible`] derives the list, get, create,
//! update and destroy calls from that metadata. Calls take a
//! [`yao_core::Session`], which selects the transport per service and
//! access level.
//!
//! ```no_run
//! use yao_core::{Query, Service, ServiceEndpointConfig, Session, YaoConfig};
//! use yao_resources::{RestfullyAccessible, Tenant};
//!
//! # async fn run() -> yao_core::Result<()> {
//! let config = YaoConfig::new()
//!     .with_auth_token("token")
//!     .with_endpoint(
//!         Service::Identity,
//!         ServiceEndpointConfig::new().with_admin_url("http://keystone:35357/v2.0")?,
//!     );
//! let session = Session::from_config(&config)?;
//! let tenants = Tenant::list(&session, &Query::new()).await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod accessible;
pub mod base;
pub mod metadata;
pub mod resources;

#[cfg(test)]
mod testing;

pub use accessible::{Resource, RestfullyAccessible};
pub use base::{parse_timestamp, AttributeValue, Attributes, Base};
pub use metadata::ResourceMeta;
pub use resources::{
    Hypervisor, LoadBalancerHealthMonitor, LoadBalancerPool, Meter, Port, Project, Role,
    SecurityGroup, SecurityGroupRule, Server, Tenant, User,
};

/// Convenient result alias sharing the `yao-core` error type.
pub type Result<T> = yao_core::Result<T>;
