//! LBaaS v2 pools.

use crate::accessible::RestfullyAccessible;
use crate::metadata::ResourceMeta;
use crate::resource;
use serde_json::Value;
use yao_core::{Result, Service, Session};

resource! {
    /// A load-balancer pool.
    pub struct LoadBalancerPool {
        name: &str => "name",
        description: &str => "description",
        lb_algorithm: &str => "lb_algorithm",
        protocol: &str => "protocol",
        admin_state_up: bool => "admin_state_up",
        provisioning_status: &str => "provisioning_status",
        operating_status: &str => "operating_status",
        healthmonitor_id: &str => "healthmonitor_id",
        members: &[Value] => "members",
        listeners: &[Value] => "listeners",
        loadbalancers: &[Value] => "loadbalancers",
    }
}

impl RestfullyAccessible for LoadBalancerPool {
    fn metadata(_session: &Session) -> Result<ResourceMeta> {
        Ok(
            ResourceMeta::for_service(Service::LoadBalancer, "pool", "pools")
                .with_api_version("v2.0")?
                .with_resources_path("lbaas/pools"),
        )
    }
}
