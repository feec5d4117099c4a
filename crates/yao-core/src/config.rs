//! Configuration structures for Yao sessions.
//!
//! A [`YaoConfig`] lists the endpoint of every reachable service at each
//! access level, the auth token to present, TLS settings, and the
//! security-group hosting switch. It is validated once and is read-only
//! afterwards.

use crate::client::{ClientConfig, ServiceClientBuilder};
use crate::types::{AccessLevel, SecurityGroupService, Service};
use crate::Error;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Configuration for a Yao session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct YaoConfig {
    /// Endpoints keyed by service
    #[serde(default)]
    pub endpoints: HashMap<Service, ServiceEndpointConfig>,

    /// Token sent as `X-Auth-Token`; never serialised
    #[serde(skip)]
    pub auth_token: Option<Arc<SecretString>>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional path to custom CA certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca_cert: Option<PathBuf>,

    /// Request timeout in seconds, overriding every service's default
    #[validate(range(min = 1, max = 300))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Which service hosts security groups
    #[serde(default)]
    pub security_group_service: SecurityGroupService,
}

const fn default_tls_verify() -> bool {
    true
}

impl YaoConfig {
    /// Create an empty configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoints: HashMap::new(),
            auth_token: None,
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
            request_timeout_secs: None,
            security_group_service: SecurityGroupService::default(),
        }
    }

    /// Register the endpoints of a service.
    #[must_use]
    pub fn with_endpoint(mut self, service: Service, endpoint: ServiceEndpointConfig) -> Self {
        self.endpoints.insert(service, endpoint);
        self
    }

    /// Set the token presented to every service.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(Arc::new(SecretString::from(token.into())));
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    /// Choose which service hosts security groups.
    #[must_use]
    pub const fn with_security_group_service(mut self, service: SecurityGroupService) -> Self {
        self.security_group_service = service;
        self
    }

    /// Effective request timeout for a service.
    ///
    /// An endpoint override wins over the global timeout, which wins over
    /// the service's default.
    #[must_use]
    pub fn timeout_for(&self, service: Service) -> Duration {
        let secs = self
            .endpoints
            .get(&service)
            .and_then(|endpoint| endpoint.timeout_override_secs)
            .or(self.request_timeout_secs)
            .unwrap_or_else(|| service.default_timeout_secs());
        Duration::from_secs(secs)
    }

    /// Validate this configuration and every endpoint in it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid field.
    pub fn validate_all(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        for (service, endpoint) in &self.endpoints {
            endpoint.validate().map_err(|e| {
                Error::ConfigError(format!("Invalid endpoint for {service}: {e}"))
            })?;
        }
        Ok(())
    }

    /// Prepare a client builder for one service at one access level.
    ///
    /// Returns `Ok(None)` when no URL is configured for that combination.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL is invalid.
    pub fn client_builder(
        &self,
        service: Service,
        access: AccessLevel,
    ) -> Result<Option<ServiceClientBuilder>, Error> {
        let Some(endpoint) = self.endpoints.get(&service) else {
            return Ok(None);
        };
        let Some(url) = endpoint.url(access) else {
            return Ok(None);
        };

        let mut builder = ServiceClientBuilder::new(url)?
            .with_http_config(ClientConfig::new().with_timeout(self.timeout_for(service)))
            .with_tls_verify(self.tls_verify);
        if let Some(token) = &self.auth_token {
            builder = builder.with_secret_token(Arc::clone(token));
        }
        if let Some(ca_cert) = &self.tls_ca_cert {
            builder = builder.with_ca_cert(ca_cert.clone());
        }
        Ok(Some(builder))
    }
}

impl Default for YaoConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Public and admin endpoints of a single service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ServiceEndpointConfig {
    /// Member-level endpoint URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub public_url: Option<String>,

    /// Administrative endpoint URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub admin_url: Option<String>,

    /// Optional timeout override for this service (in seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 300))]
    pub timeout_override_secs: Option<u64>,
}

impl ServiceEndpointConfig {
    /// Create an endpoint configuration with no URLs.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            public_url: None,
            admin_url: None,
            timeout_override_secs: None,
        }
    }

    /// Set the public URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_public_url(mut self, url: impl Into<String>) -> Result<Self, Error> {
        self.public_url = Some(url.into());
        self.checked()
    }

    /// Set the admin URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_admin_url(mut self, url: impl Into<String>) -> Result<Self, Error> {
        self.admin_url = Some(url.into());
        self.checked()
    }

    /// Set timeout override in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_override_secs = Some(seconds);
        self
    }

    /// URL configured for an access level.
    #[must_use]
    pub fn url(&self, access: AccessLevel) -> Option<&str> {
        match access {
            AccessLevel::Public => self.public_url.as_deref(),
            AccessLevel::Admin => self.admin_url.as_deref(),
        }
    }

    /// Get the timeout as a Duration, if set.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_override_secs.map(Duration::from_secs)
    }

    /// Parse the URL configured for an access level.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_url(&self, access: AccessLevel) -> Result<Option<Url>, Error> {
        self.url(access)
            .map(|url| {
                Url::parse(url)
                    .map_err(|e| Error::ConfigError(format!("Invalid service URL: {e}")))
            })
            .transpose()
    }

    fn checked(self) -> Result<Self, Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid endpoint configuration: {e}")))?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_endpoint() -> ServiceEndpointConfig {
        ServiceEndpointConfig::new()
            .with_public_url("https://keystone.example.com:5000/v2.0")
            .unwrap()
            .with_admin_url("https://keystone.example.com:35357/v2.0")
            .unwrap()
    }

    #[test]
    fn test_yao_config_default() {
        let config = YaoConfig::default();
        assert!(config.endpoints.is_empty());
        assert!(config.auth_token.is_none());
        assert!(config.tls_verify);
        assert!(config.request_timeout_secs.is_none());
        assert_eq!(config.security_group_service, SecurityGroupService::Compute);
    }

    #[test]
    fn test_yao_config_builder() {
        let config = YaoConfig::new()
            .with_endpoint(Service::Identity, identity_endpoint())
            .with_auth_token("token")
            .with_tls_verify(false)
            .with_timeout(45)
            .with_security_group_service(SecurityGroupService::Network);

        assert!(config.endpoints.contains_key(&Service::Identity));
        assert!(config.auth_token.is_some());
        assert!(!config.tls_verify);
        assert_eq!(config.timeout_for(Service::Identity), Duration::from_secs(45));
        assert_eq!(config.security_group_service, SecurityGroupService::Network);
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_endpoint_invalid_url() {
        let result = ServiceEndpointConfig::new().with_public_url("not-a-url");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_endpoint_url_by_access() {
        let endpoint = ServiceEndpointConfig::new()
            .with_public_url("http://nova:8774/v2.1")
            .unwrap();
        assert_eq!(endpoint.url(AccessLevel::Public), Some("http://nova:8774/v2.1"));
        assert_eq!(endpoint.url(AccessLevel::Admin), None);

        let url = endpoint.parse_url(AccessLevel::Public).unwrap().unwrap();
        assert_eq!(url.host_str(), Some("nova"));
        assert_eq!(url.port(), Some(8774));
        assert!(endpoint.parse_url(AccessLevel::Admin).unwrap().is_none());
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = YaoConfig::default();
        config.request_timeout_secs = Some(0);
        assert!(config.validate_all().is_err());

        config.request_timeout_secs = Some(301);
        assert!(config.validate_all().is_err());

        config.request_timeout_secs = Some(30);
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_timeout_precedence() {
        let config = YaoConfig::new().with_endpoint(
            Service::Image,
            ServiceEndpointConfig::new()
                .with_public_url("http://glance:9292")
                .unwrap()
                .with_timeout(120),
        );
        assert_eq!(config.timeout_for(Service::Image), Duration::from_secs(120));
        assert_eq!(
            config.timeout_for(Service::Identity),
            Duration::from_secs(crate::client::IDENTITY_DEFAULT_TIMEOUT)
        );

        let config = config.with_timeout(5);
        assert_eq!(config.timeout_for(Service::Image), Duration::from_secs(120));
        assert_eq!(config.timeout_for(Service::Compute), Duration::from_secs(5));
    }

    #[test]
    fn test_config_validation_endpoint_timeout() {
        let config = YaoConfig::new().with_endpoint(
            Service::Compute,
            ServiceEndpointConfig::new().with_timeout(0),
        );
        assert!(matches!(config.validate_all(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_client_builder_missing_endpoint() {
        let config = YaoConfig::new().with_endpoint(Service::Identity, identity_endpoint());
        assert!(config
            .client_builder(Service::Compute, AccessLevel::Public)
            .unwrap()
            .is_none());

        let public_only = YaoConfig::new().with_endpoint(
            Service::Network,
            ServiceEndpointConfig::new()
                .with_public_url("http://neutron:9696")
                .unwrap(),
        );
        assert!(public_only
            .client_builder(Service::Network, AccessLevel::Admin)
            .unwrap()
            .is_none());
        assert!(public_only
            .client_builder(Service::Network, AccessLevel::Public)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_config_serialization_skips_token() {
        let config = YaoConfig::new()
            .with_endpoint(Service::LoadBalancer, identity_endpoint())
            .with_auth_token("very-secret")
            .with_security_group_service(SecurityGroupService::Network);

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("very-secret"));
        assert!(json.contains("\"load-balancer\""));
        assert!(json.contains("\"network\""));

        let deserialized: YaoConfig = serde_json::from_str(&json).unwrap();
        assert!(deserialized.auth_token.is_none());
        assert_eq!(
            deserialized.endpoints[&Service::LoadBalancer].admin_url,
            config.endpoints[&Service::LoadBalancer].admin_url
        );
        assert_eq!(
            deserialized.security_group_service,
            SecurityGroupService::Network
        );
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: YaoConfig = serde_json::from_str(
            r#"{"endpoints": {"compute": {"public_url": "http://nova:8774/v2.1"}}}"#,
        )
        .unwrap();
        assert!(config.tls_verify);
        assert!(config.request_timeout_secs.is_none());
        assert_eq!(config.security_group_service, SecurityGroupService::Compute);
        assert!(config.validate_all().is_ok());
    }
}
