//! Core OpenStack domain types.
//!
//! This module provides the enumeration of backend services, the access
//! level a resource type is bound to, and the security-group hosting switch.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Backend services reachable through their own endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Service {
    /// Identity service (keystone)
    Identity,
    /// Compute service (nova)
    Compute,
    /// Network service (neutron)
    Network,
    /// Load balancer service (octavia / neutron-lbaas)
    LoadBalancer,
    /// Metering service (ceilometer)
    Metering,
    /// Image service (glance)
    Image,
    /// Block storage service (cinder)
    Volume,
}

impl Service {
    /// Returns the service name as it appears in the service catalog.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Compute => "compute",
            Self::Network => "network",
            Self::LoadBalancer => "load-balancer",
            Self::Metering => "metering",
            Self::Image => "image",
            Self::Volume => "volume",
        }
    }

    /// Returns all known services.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Identity,
            Self::Compute,
            Self::Network,
            Self::LoadBalancer,
            Self::Metering,
            Self::Image,
            Self::Volume,
        ]
    }

    /// Returns the default request timeout for the service, in seconds.
    #[must_use]
    pub const fn default_timeout_secs(&self) -> u64 {
        match self {
            Self::Identity => crate::client::IDENTITY_DEFAULT_TIMEOUT,
            Self::Compute => crate::client::COMPUTE_DEFAULT_TIMEOUT,
            Self::Network | Self::LoadBalancer => crate::client::NETWORK_DEFAULT_TIMEOUT,
            Self::Metering => crate::client::METERING_DEFAULT_TIMEOUT,
            Self::Image | Self::Volume => crate::client::STORAGE_DEFAULT_TIMEOUT,
        }
    }
}

impl FromStr for Service {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "identity" => Ok(Self::Identity),
            "compute" => Ok(Self::Compute),
            "network" => Ok(Self::Network),
            "load-balancer" => Ok(Self::LoadBalancer),
            "metering" => Ok(Self::Metering),
            "image" => Ok(Self::Image),
            "volume" => Ok(Self::Volume),
            _ => Err(Error::InvalidRequest(format!("Unknown service: {s}"))),
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Connection scope used to reach a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Member-level endpoint
    Public,
    /// Administrative endpoint
    Admin,
}

impl AccessLevel {
    /// Returns the access level as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which service hosts security groups.
///
/// Nova exposes them as `os-security-groups`, Neutron as `security-groups`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityGroupService {
    /// Compute-hosted security groups
    #[default]
    Compute,
    /// Network-hosted security groups
    Network,
}

impl SecurityGroupService {
    /// Returns the backing service.
    #[must_use]
    pub const fn service(&self) -> Service {
        match self {
            Self::Compute => Service::Compute,
            Self::Network => Service::Network,
        }
    }
}

impl FromStr for SecurityGroupService {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "compute" => Ok(Self::Compute),
            "network" => Ok(Self::Network),
            _ => Err(Error::ConfigError(format!(
                "security_group_service must be `compute` or `network`, got `{s}`"
            ))),
        }
    }
}
