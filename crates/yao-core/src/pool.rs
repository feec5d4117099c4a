//! Per-service, per-access-level connection pool.
//!
//! The pool maps every `(service, access level)` pair to the [`Transport`]
//! that reaches it. A missing entry is a configuration error naming the
//! access level and service.

use crate::config::YaoConfig;
use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::types::{AccessLevel, Service};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Transports keyed by service and access level.
#[derive(Clone, Default)]
pub struct ConnectionPool {
    public: HashMap<Service, Arc<dyn Transport>>,
    admin: HashMap<Service, Arc<dyn Transport>>,
}

impl ConnectionPool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a [`crate::client::ServiceClient`] for every configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint URL is invalid or a client cannot be
    /// built.
    pub fn from_config(config: &YaoConfig) -> Result<Self> {
        let mut pool = Self::new();
        for service in config.endpoints.keys() {
            for access in [AccessLevel::Public, AccessLevel::Admin] {
                if let Some(builder) = config.client_builder(*service, access)? {
                    debug!(%service, %access, "registering service client");
                    pool.insert(*service, access, Arc::new(builder.build()?));
                }
            }
        }
        Ok(pool)
    }

    /// Register a transport, replacing any previous one.
    pub fn insert(&mut self, service: Service, access: AccessLevel, transport: Arc<dyn Transport>) {
        self.map_mut(access).insert(service, transport);
    }

    /// Builder form of [`ConnectionPool::insert`].
    #[must_use]
    pub fn with_transport(
        mut self,
        service: Service,
        access: AccessLevel,
        transport: Arc<dyn Transport>,
    ) -> Self {
        self.insert(service, access, transport);
        self
    }

    /// Returns true when a transport is registered for the pair.
    #[must_use]
    pub fn contains(&self, service: Service, access: AccessLevel) -> bool {
        self.map(access).contains_key(&service)
    }

    /// Look up the transport for a service at an access level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if no transport is registered.
    pub fn get(&self, service: Service, access: AccessLevel) -> Result<Arc<dyn Transport>> {
        self.map(access).get(&service).cloned().ok_or_else(|| {
            Error::ConfigError(format!(
                "You do not have {access} access to the {service} service"
            ))
        })
    }

    fn map(&self, access: AccessLevel) -> &HashMap<Service, Arc<dyn Transport>> {
        match access {
            AccessLevel::Public => &self.public,
            AccessLevel::Admin => &self.admin,
        }
    }

    fn map_mut(&mut self, access: AccessLevel) -> &mut HashMap<Service, Arc<dyn Transport>> {
        match access {
            AccessLevel::Public => &mut self.public,
            AccessLevel::Admin => &mut self.admin,
        }
    }
}

impl fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut public: Vec<_> = self.public.keys().collect();
        let mut admin: Vec<_> = self.admin.keys().collect();
        public.sort();
        admin.sort();
        f.debug_struct("ConnectionPool")
            .field("public", &public)
            .field("admin", &admin)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceEndpointConfig;
    use crate::transport::MockTransport;
    use url::Url;

    fn mock_at(url: &'static str) -> Arc<dyn Transport> {
        let mut mock = MockTransport::new();
        mock.expect_url_prefix()
            .returning(move || Url::parse(url).unwrap());
        Arc::new(mock)
    }

    #[test]
    fn get_missing_access_names_level_and_service() {
        let pool = ConnectionPool::new().with_transport(
            Service::Identity,
            AccessLevel::Public,
            mock_at("http://keystone:5000/v3/"),
        );

        let err = pool
            .get(Service::Identity, AccessLevel::Admin)
            .err()
            .unwrap();
        assert_eq!(
            err,
            Error::ConfigError("You do not have admin access to the identity service".into())
        );

        let err = pool.get(Service::Compute, AccessLevel::Public).err().unwrap();
        assert_eq!(
            err.to_string(),
            "Configuration error: You do not have public access to the compute service"
        );
    }

    #[test]
    fn get_returns_registered_transport() {
        let pool = ConnectionPool::new()
            .with_transport(
                Service::Identity,
                AccessLevel::Admin,
                mock_at("http://keystone:35357/v2.0/"),
            )
            .with_transport(
                Service::Identity,
                AccessLevel::Public,
                mock_at("http://keystone:5000/v2.0/"),
            );

        let admin = pool.get(Service::Identity, AccessLevel::Admin).unwrap();
        assert_eq!(admin.url_prefix().port(), Some(35357));
        let public = pool.get(Service::Identity, AccessLevel::Public).unwrap();
        assert_eq!(public.url_prefix().port(), Some(5000));
        assert!(pool.contains(Service::Identity, AccessLevel::Admin));
        assert!(!pool.contains(Service::Network, AccessLevel::Admin));
    }

    #[test]
    fn from_config_registers_each_configured_url() {
        let config = YaoConfig::new()
            .with_endpoint(
                Service::Compute,
                ServiceEndpointConfig::new()
                    .with_public_url("http://nova:8774/v2.1")
                    .unwrap()
                    .with_admin_url("http://nova-admin:8774/v2.1")
                    .unwrap(),
            )
            .with_endpoint(
                Service::Network,
                ServiceEndpointConfig::new()
                    .with_public_url("http://neutron:9696")
                    .unwrap(),
            );

        let pool = ConnectionPool::from_config(&config).unwrap();
        assert!(pool.contains(Service::Compute, AccessLevel::Public));
        assert!(pool.contains(Service::Compute, AccessLevel::Admin));
        assert!(pool.contains(Service::Network, AccessLevel::Public));
        assert!(!pool.contains(Service::Network, AccessLevel::Admin));
        assert_eq!(
            pool.get(Service::Compute, AccessLevel::Admin)
                .unwrap()
                .url_prefix()
                .as_str(),
            "http://nova-admin:8774/v2.1/"
        );
    }

    #[test]
    fn debug_lists_keys() {
        let pool = ConnectionPool::new().with_transport(
            Service::Network,
            AccessLevel::Public,
            mock_at("http://neutron:9696/"),
        );
        let rendered = format!("{pool:?}");
        assert!(rendered.contains("Network"));
    }
}
