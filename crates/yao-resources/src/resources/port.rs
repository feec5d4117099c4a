//! Network ports.

use crate::accessible::RestfullyAccessible;
use crate::metadata::ResourceMeta;
use crate::resource;
use serde_json::Value;
use yao_core::{Result, Service, Session};

resource! {
    /// A network port.
    pub struct Port {
        name: &str => "name",
        status: &str => "status",
        network_id: &str => "network_id",
        tenant_id: &str => "tenant_id",
        mac_address: &str => "mac_address",
        device_id: &str => "device_id",
        device_owner: &str => "device_owner",
        admin_state_up: bool => "admin_state_up",
        fixed_ips: &[Value] => "fixed_ips",
        host_id: &str => "binding:host_id",
    }
}

impl Port {
    /// Address of the first fixed IP.
    #[must_use]
    pub fn primary_ip(&self) -> Option<&str> {
        self.fixed_ips()?
            .first()?
            .get("ip_address")
            .and_then(Value::as_str)
    }
}

impl RestfullyAccessible for Port {
    fn metadata(_session: &Session) -> Result<ResourceMeta> {
        ResourceMeta::for_service(Service::Network, "port", "ports").with_api_version("v2.0")
    }
}
