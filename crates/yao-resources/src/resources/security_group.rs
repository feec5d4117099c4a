//! Security groups, hosted by compute or network depending on the session.

use crate::accessible::RestfullyAccessible;
use crate::metadata::ResourceMeta;
use crate::resource;
use crate::resources::SecurityGroupRule;
use async_trait::async_trait;
use yao_core::{Error, Query, Result, SecurityGroupService, Session};

resource! {
    /// A security group.
    pub struct SecurityGroup {
        name: &str => "name",
        description: &str => "description",
        tenant_id: &str => "tenant_id",
    }
}

impl SecurityGroup {
    /// Every security group visible to the session.
    ///
    /// # Errors
    ///
    /// See [`RestfullyAccessible::list`].
    pub async fn all(session: &Session) -> Result<Vec<Self>> {
        Self::list(session, &Query::new()).await
    }

    /// Rules embedded in the group. Memoised.
    #[must_use]
    pub fn rules(&self, session: &Session) -> Vec<SecurityGroupRule> {
        let field = match session.security_group_service() {
            SecurityGroupService::Compute => "rules",
            SecurityGroupService::Network => "security_group_rules",
        };
        self.0.nested_list(field)
    }
}

#[async_trait]
impl RestfullyAccessible for SecurityGroup {
    fn metadata(session: &Session) -> Result<ResourceMeta> {
        let backend = session.security_group_service();
        Ok(match backend {
            SecurityGroupService::Compute => ResourceMeta::for_service(
                backend.service(),
                "os-security-group",
                "os-security-groups",
            ),
            SecurityGroupService::Network => {
                ResourceMeta::for_service(backend.service(), "security-group", "security-groups")
            }
        })
    }

    // Groups are looked up through a filtered list rather than by path.
    async fn get(session: &Session, id: &str, query: &Query) -> Result<Self> {
        let mut found = Self::list(session, &query.clone().with("id", id)).await?;
        if found.len() > 1 {
            return Err(Error::TooManyItemsFound(format!(
                "More than one security group matches '{id}'"
            )));
        }
        found
            .pop()
            .ok_or_else(|| Error::NotFound(format!("No security group matches '{id}'")))
    }
}
