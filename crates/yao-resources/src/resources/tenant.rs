//! Identity v2.0 tenants and the resources they own.

use crate::accessible::RestfullyAccessible;
use crate::metadata::ResourceMeta;
use crate::resource;
use crate::resources::{Meter, Port, Server};
use yao_core::{Query, Result, Service, Session};

resource! {
    /// A Keystone v2.0 tenant.
    pub struct Tenant {
        name: &str => "name",
        description: &str => "description",
        enabled: bool => "enabled",
    }
}

impl Tenant {
    /// Servers owned by the tenant, across all tenants' view. Memoised.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Server::list`].
    pub async fn servers(&self, session: &Session) -> Result<Vec<Server>> {
        let id = self.0.require_id()?;
        self.0
            .related("servers", || async move {
                let query = Query::new()
                    .with("all_tenants", 1)
                    .with("project_id", &id);
                Server::list(session, &query).await
            })
            .await
    }

    /// Ports owned by the tenant. Memoised.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Port::list`].
    pub async fn ports(&self, session: &Session) -> Result<Vec<Port>> {
        let id = self.0.require_id()?;
        self.0
            .related("ports", || async move {
                Port::list(session, &Query::new().with("tenant_id", &id)).await
            })
            .await
    }

    /// Meters scoped to the tenant's project. Memoised.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Meter::list`].
    pub async fn meters(&self, session: &Session) -> Result<Vec<Meter>> {
        let id = self.0.require_id()?;
        self.0
            .related("meters", || async move {
                let query = Query::new()
                    .with("q.field", "project_id")
                    .with("q.op", "eq")
                    .with("q.value", &id);
                Meter::list(session, &query).await
            })
            .await
    }

    /// The tenant's meters with the given name.
    ///
    /// # Errors
    ///
    /// See [`Tenant::meters`].
    pub async fn meters_by_name(&self, session: &Session, name: &str) -> Result<Vec<Meter>> {
        Ok(self
            .meters(session)
            .await?
            .into_iter()
            .filter(|meter| meter.name() == Some(name))
            .collect())
    }

    /// Tenants visible to the token's own user, listed through the public
    /// endpoint.
    ///
    /// # Errors
    ///
    /// See [`RestfullyAccessible::list`].
    pub async fn accessible(session: &Session) -> Result<Vec<Self>> {
        session
            .with_member_scope(|member| async move { Self::list(&member, &Query::new()).await })
            .await
    }
}

impl RestfullyAccessible for Tenant {
    fn metadata(_session: &Session) -> Result<ResourceMeta> {
        Ok(ResourceMeta::for_service(Service::Identity, "tenant", "tenants")
            .with_admin(true)
            .with_return_single_on_querying(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::session_with;
    use crate::{Base, Resource};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use yao_core::{AccessLevel, Error};

    fn tenant(id: &str) -> Tenant {
        Tenant::from_base(Base::from_value(json!({"id": id, "name": "acme"})).unwrap())
    }

    fn session(server: &MockServer) -> Session {
        session_with(
            server,
            &[
                (Service::Identity, AccessLevel::Admin),
                (Service::Compute, AccessLevel::Public),
                (Service::Network, AccessLevel::Public),
                (Service::Metering, AccessLevel::Public),
            ],
        )
    }

    #[tokio::test]
    async fn test_servers_filtered_and_memoised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/servers/detail"))
            .and(query_param("all_tenants", "1"))
            .and(query_param("project_id", "t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "servers": [{"id": "s1", "name": "web"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = session(&server);
        let acme = tenant("t1");
        let first = acme.servers(&session).await.unwrap();
        let second = acme.servers(&session).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_ports_filtered_by_tenant() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/ports"))
            .and(query_param("tenant_id", "t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ports": [{"id": "p1"}, {"id": "p2"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ports = tenant("t1").ports(&session(&server)).await.unwrap();
        assert_eq!(ports.len(), 2);
    }

    #[tokio::test]
    async fn test_meters_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/meters"))
            .and(query_param("q.field", "project_id"))
            .and(query_param("q.op", "eq"))
            .and(query_param("q.value", "t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "cpu", "resource_id": "s1"},
                {"name": "disk.read.bytes", "resource_id": "s1"},
                {"name": "cpu", "resource_id": "s2"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let session = session(&server);
        let acme = tenant("t1");
        let cpu = acme.meters_by_name(&session, "cpu").await.unwrap();
        assert_eq!(cpu.len(), 2);
        let disk = acme.meters_by_name(&session, "disk.read.bytes").await.unwrap();
        assert_eq!(disk[0].resource_id(), Some("s1"));
    }

    #[tokio::test]
    async fn test_relations_need_an_id() {
        let server = MockServer::start().await;
        let anonymous = Tenant::from_base(Base::from_value(json!({"name": "x"})).unwrap());
        let err = anonymous.ports(&session(&server)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_accessible_uses_public_endpoint() {
        let admin = MockServer::start().await;
        let public = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tenants"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tenants": [{"id": "t1", "name": "acme"}]
            })))
            .expect(0)
            .mount(&admin)
            .await;
        Mock::given(method("GET"))
            .and(path("/tenants"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tenants": [{"id": "t2", "name": "mine"}]
            })))
            .expect(1)
            .mount(&public)
            .await;

        let mut pool = yao_core::ConnectionPool::new();
        for (server, access) in [(&admin, AccessLevel::Admin), (&public, AccessLevel::Public)] {
            let client = yao_core::client::ServiceClient::new(server.uri()).unwrap();
            pool.insert(Service::Identity, access, std::sync::Arc::new(client));
        }
        let session = Session::new(pool);

        let tenants = Tenant::accessible(&session).await.unwrap();
        assert_eq!(tenants.len(), 1);
        assert_eq!(tenants[0].name(), Some("mine"));
        assert!(!session.is_member_scoped());
    }
}
