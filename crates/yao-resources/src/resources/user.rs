//! Identity users.

use crate::accessible::RestfullyAccessible;
use crate::metadata::ResourceMeta;
use crate::resource;
use yao_core::{Result, Service, Session};

resource! {
    /// An identity user.
    pub struct User {
        name: &str => "name",
        email: &str => "email",
        enabled: bool => "enabled",
        tenant_id: &str => "tenantId",
        default_project_id: &str => "default_project_id",
        domain_id: &str => "domain_id",
    }
}

impl RestfullyAccessible for User {
    fn metadata(_session: &Session) -> Result<ResourceMeta> {
        Ok(ResourceMeta::for_service(Service::Identity, "user", "users").with_admin(true))
    }
}
