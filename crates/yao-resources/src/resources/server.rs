//! Compute servers.

use crate::accessible::RestfullyAccessible;
use crate::metadata::ResourceMeta;
use crate::resource;
use yao_core::{Result, Service, Session};

resource! {
    /// A compute instance.
    pub struct Server {
        name: &str => "name",
        status: &str => "status",
        tenant_id: &str => "tenant_id",
        user_id: &str => "user_id",
        host_id: &str => "hostId",
        key_name: &str => "key_name",
        flavor: &serde_json::Value => "flavor",
        image: &serde_json::Value => "image",
        addresses: &crate::Attributes => "addresses",
        metadata: &crate::Attributes => "metadata",
        availability_zone: &str => "OS-EXT-AZ:availability_zone",
        hypervisor_hostname: &str => "OS-EXT-SRV-ATTR:hypervisor_hostname",
        power_state: u64 => "OS-EXT-STS:power_state",
        vm_state: &str => "OS-EXT-STS:vm_state",
    }
}

impl RestfullyAccessible for Server {
    fn metadata(_session: &Session) -> Result<ResourceMeta> {
        Ok(ResourceMeta::for_service(Service::Compute, "server", "servers")
            .with_resources_detail_available(true))
    }
}
