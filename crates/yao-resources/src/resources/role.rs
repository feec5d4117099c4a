//! Identity roles and role assignments.
//!
//! Keystone v2.0 keeps roles under the `OS-KSADM` extension and scopes
//! assignments to tenants; v3 uses plain `roles` and projects. The
//! generation is read off the identity endpoint URL.

use crate::accessible::RestfullyAccessible;
use crate::metadata::ResourceMeta;
use crate::resource;
use crate::resources::{Project, Tenant, User};
use crate::Resource;
use async_trait::async_trait;
use yao_core::{ApiRequest, Query, Result, Service, Session};

resource! {
    /// An identity role.
    pub struct Role {
        name: &str => "name",
        description: &str => "description",
    }
}

impl Role {
    /// Returns true when the identity endpoint speaks Keystone v2.0.
    ///
    /// # Errors
    ///
    /// Returns [`yao_core::Error::ConfigError`] if the session has no
    /// identity client.
    pub fn is_v2(session: &Session) -> Result<bool> {
        let client = session.client(Service::Identity, true)?;
        Ok(client.url_prefix().as_str().contains("v2.0"))
    }

    /// Roles `user` holds on the tenant or project `on`.
    ///
    /// # Errors
    ///
    /// Propagates lookup and transport errors.
    pub async fn list_for_user(session: &Session, user: &str, on: &str) -> Result<Vec<Self>> {
        let path = Self::assignment_path(session, user, on, None).await?;
        let (meta, client) = Self::transport(session)?;
        let response = client.send(ApiRequest::get(path)).await?;
        Self::decode_many(&meta, &response)
    }

    /// Grant `role` to user `to` on the tenant or project `on`.
    ///
    /// # Errors
    ///
    /// Propagates lookup and transport errors.
    pub async fn grant(session: &Session, role: &str, to: &str, on: &str) -> Result<()> {
        let role = Self::get(session, role, &Query::new()).await?;
        let path = Self::assignment_path(session, to, on, Some(&role)).await?;
        let (_, client) = Self::transport(session)?;
        client.send(ApiRequest::put(path)).await?;
        Ok(())
    }

    /// Revoke `role` from user `from` on the tenant or project `on`.
    ///
    /// # Errors
    ///
    /// Propagates lookup and transport errors.
    pub async fn revoke(session: &Session, role: &str, from: &str, on: &str) -> Result<()> {
        let role = Self::get(session, role, &Query::new()).await?;
        let path = Self::assignment_path(session, from, on, Some(&role)).await?;
        let (_, client) = Self::transport(session)?;
        client.send(ApiRequest::delete(path)).await?;
        Ok(())
    }

    async fn assignment_path(
        session: &Session,
        user: &str,
        on: &str,
        role: Option<&Self>,
    ) -> Result<String> {
        let user_id = User::get(session, user, &Query::new())
            .await?
            .base()
            .require_id()?;
        let role_id = role.map(|role| role.base().require_id()).transpose()?;

        if Self::is_v2(session)? {
            let tenant_id = Tenant::get_by_name(session, on, &Query::new())
                .await?
                .base()
                .require_id()?;
            let mut path = format!("tenants/{tenant_id}/users/{user_id}/roles");
            if let Some(role_id) = role_id {
                path.push_str(&format!("/OS-KSADM/{role_id}"));
            }
            Ok(path)
        } else {
            let project_id = Project::get(session, on, &Query::new())
                .await?
                .base()
                .require_id()?;
            let mut path = format!("projects/{project_id}/users/{user_id}/roles");
            if let Some(role_id) = role_id {
                path.push_str(&format!("/{role_id}"));
            }
            Ok(path)
        }
    }
}

#[async_trait]
impl RestfullyAccessible for Role {
    fn metadata(session: &Session) -> Result<ResourceMeta> {
        let meta = ResourceMeta::for_service(Service::Identity, "role", "roles").with_admin(true);
        if Self::is_v2(session)? {
            Ok(meta.with_resources_path("OS-KSADM/roles"))
        } else {
            Ok(meta)
        }
    }

    // v2.0 cannot filter roles by name server-side.
    async fn find_by_name(session: &Session, name: &str, query: &Query) -> Result<Vec<Self>> {
        if Self::is_v2(session)? {
            Ok(Self::list(session, query)
                .await?
                .into_iter()
                .filter(|role| role.name() == Some(name))
                .collect())
        } else {
            Self::list(session, &query.clone().with("name", name)).await
        }
    }
}
