//! # yao-core
//!
//! Core types and utilities for talking to OpenStack-compatible clouds.
//!
//! This crate provides error handling, configuration, the HTTP transport
//! seam and its reqwest implementation, and the session that hands resource
//! accessors the right transport for each service and access level.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`identifier`] - Lookup identifier grammar (URL, UUID, name)
//! - [`types`] - Services, access levels and the security-group switch
//! - [`query`] - Query parameter builder
//! - [`config`] - Configuration structures for Yao sessions
//! - [`transport`] - The HTTP seam used by resource accessors
//! - [`client`] - reqwest-backed transport and HTTP client settings
//! - [`pool`] - Transports keyed by service and access level
//! - [`session`] - Scoped view of a pool

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod identifier;
pub mod pool;
pub mod query;
pub mod session;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use config::{ServiceEndpointConfig, YaoConfig};
pub use error::{Error, Result};
pub use identifier::Identifier;
pub use pool::ConnectionPool;
pub use query::Query;
pub use session::Session;
pub use transport::{ApiRequest, ApiResponse, Transport};
pub use types::{AccessLevel, SecurityGroupService, Service};
