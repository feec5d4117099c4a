//! Identity v3 projects.

use crate::accessible::RestfullyAccessible;
use crate::metadata::ResourceMeta;
use crate::resource;
use yao_core::{Result, Service, Session};

resource! {
    /// A Keystone v3 project.
    pub struct Project {
        name: &str => "name",
        description: &str => "description",
        enabled: bool => "enabled",
        domain_id: &str => "domain_id",
        parent_id: &str => "parent_id",
        is_domain: bool => "is_domain",
    }
}

impl RestfullyAccessible for Project {
    fn metadata(_session: &Session) -> Result<ResourceMeta> {
        Ok(ResourceMeta::for_service(Service::Identity, "project", "projects").with_admin(true))
    }
}
