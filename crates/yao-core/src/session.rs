//! Session: the immutable view of a connection pool used by resource calls.
//!
//! A session decides which transport a resource type talks to. Resource
//! types that require admin access normally get the admin transport; a
//! member-scoped session (see [`Session::as_member`]) hands out the public
//! transport instead. Scoping derives a new session and never mutates the
//! original, so the admin scope is intact however the scoped work ends.

use crate::config::YaoConfig;
use crate::error::Result;
use crate::pool::ConnectionPool;
use crate::transport::Transport;
use crate::types::{AccessLevel, SecurityGroupService, Service};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Shared, cheaply clonable handle to the configured services.
#[derive(Debug, Clone)]
pub struct Session {
    pool: Arc<ConnectionPool>,
    security_group_service: SecurityGroupService,
    member_scope: bool,
}

impl Session {
    /// Create a session over an existing pool.
    #[must_use]
    pub fn new(pool: ConnectionPool) -> Self {
        Self {
            pool: Arc::new(pool),
            security_group_service: SecurityGroupService::default(),
            member_scope: false,
        }
    }

    /// Validate the configuration and build a client for every endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ConfigError`] if the configuration is invalid.
    pub fn from_config(config: &YaoConfig) -> Result<Self> {
        config.validate_all()?;
        let pool = ConnectionPool::from_config(config)?;
        Ok(Self::new(pool).with_security_group_service(config.security_group_service))
    }

    /// Choose which service hosts security groups for this session.
    #[must_use]
    pub const fn with_security_group_service(mut self, service: SecurityGroupService) -> Self {
        self.security_group_service = service;
        self
    }

    /// Which service hosts security groups.
    #[must_use]
    pub const fn security_group_service(&self) -> SecurityGroupService {
        self.security_group_service
    }

    /// Borrow the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Returns true for sessions derived through [`Session::as_member`].
    #[must_use]
    pub const fn is_member_scoped(&self) -> bool {
        self.member_scope
    }

    /// Access level used for a resource type that declares `admin`.
    #[must_use]
    pub const fn access_for(&self, admin: bool) -> AccessLevel {
        if admin && !self.member_scope {
            AccessLevel::Admin
        } else {
            AccessLevel::Public
        }
    }

    /// Transport for a service, honouring the member scope.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ConfigError`] naming the missing access level.
    pub fn client(&self, service: Service, admin: bool) -> Result<Arc<dyn Transport>> {
        self.pool.get(service, self.access_for(admin))
    }

    /// A member-scoped view of this session.
    #[must_use]
    pub fn as_member(&self) -> Self {
        Self {
            member_scope: true,
            ..self.clone()
        }
    }

    /// Run `f` with a member-scoped view of this session.
    ///
    /// `self` is not modified, so it keeps its scope whether `f` returns
    /// normally, returns an error, or panics.
    pub async fn with_member_scope<F, Fut, T>(&self, f: F) -> T
    where
        F: FnOnce(Self) -> Fut,
        Fut: Future<Output = T>,
    {
        debug!("entering member scope");
        f(self.as_member()).await
    }
}
