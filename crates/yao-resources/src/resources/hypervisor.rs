//! Compute hypervisors.

use crate::accessible::RestfullyAccessible;
use crate::metadata::ResourceMeta;
use crate::resource;
use yao_core::{Result, Service, Session};

resource! {
    /// A compute hypervisor host.
    pub struct Hypervisor {
        hypervisor_hostname: &str => "hypervisor_hostname",
        hypervisor_type: &str => "hypervisor_type",
        hypervisor_version: u64 => "hypervisor_version",
        host_ip: &str => "host_ip",
        status: &str => "status",
        state: &str => "state",
        vcpus: u64 => "vcpus",
        vcpus_used: u64 => "vcpus_used",
        memory_mb: u64 => "memory_mb",
        memory_mb_used: u64 => "memory_mb_used",
        local_gb: u64 => "local_gb",
        local_gb_used: u64 => "local_gb_used",
        running_vms: u64 => "running_vms",
        current_workload: u64 => "current_workload",
    }
}

impl Hypervisor {
    /// Returns true when the hypervisor's service is enabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.status() == Some("enabled")
    }
}

impl RestfullyAccessible for Hypervisor {
    fn metadata(_session: &Session) -> Result<ResourceMeta> {
        Ok(
            ResourceMeta::for_service(Service::Compute, "os-hypervisor", "os-hypervisors")
                .with_admin(true)
                .with_resources_detail_available(true),
        )
    }
}
