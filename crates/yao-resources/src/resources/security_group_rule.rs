//! Security group rules.

use crate::accessible::RestfullyAccessible;
use crate::metadata::ResourceMeta;
use crate::resource;
use yao_core::{Result, SecurityGroupService, Session};

resource! {
    /// One rule of a security group. Compute and network name the same
    /// fields differently; both spellings are exposed.
    pub struct SecurityGroupRule {
        direction: &str => "direction",
        ethertype: &str => "ethertype",
        protocol: &str => "protocol",
        port_range_min: u64 => "port_range_min",
        port_range_max: u64 => "port_range_max",
        remote_ip_prefix: &str => "remote_ip_prefix",
        remote_group_id: &str => "remote_group_id",
        security_group_id: &str => "security_group_id",
        parent_group_id: &str => "parent_group_id",
        ip_protocol: &str => "ip_protocol",
        from_port: i64 => "from_port",
        to_port: i64 => "to_port",
        ip_range: &crate::Attributes => "ip_range",
    }
}

impl RestfullyAccessible for SecurityGroupRule {
    fn metadata(session: &Session) -> Result<ResourceMeta> {
        let backend = session.security_group_service();
        Ok(match backend {
            SecurityGroupService::Compute => ResourceMeta::for_service(
                backend.service(),
                "os-security-group-rule",
                "os-security-group-rules",
            ),
            SecurityGroupService::Network => ResourceMeta::for_service(
                backend.service(),
                "security-group-rule",
                "security-group-rules",
            ),
        })
    }
}
