//! LBaaS v2 health monitors.

use crate::accessible::RestfullyAccessible;
use crate::metadata::ResourceMeta;
use crate::resource;
use crate::resources::LoadBalancerPool;
use serde_json::Value;
use yao_core::{Error, Query, Result, Service, Session};

resource! {
    /// A load-balancer health monitor.
    pub struct LoadBalancerHealthMonitor {
        name: &str => "name",
        admin_state_up: bool => "admin_state_up",
        provisioning_status: &str => "provisioning_status",
        operating_status: &str => "operating_status",
        delay: u64 => "delay",
        timeout: u64 => "timeout",
        max_retries: u64 => "max_retries",
        max_retries_down: u64 => "max_retries_down",
        expected_codes: &str => "expected_codes",
        http_method: &str => "http_method",
        url_path: &str => "url_path",
        kind: &str => "type",
    }
}

impl LoadBalancerHealthMonitor {
    /// Pools the monitor is attached to, each fetched by id. Memoised.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] for a pool reference without an id and
    /// propagates lookup errors.
    pub async fn pools(&self, session: &Session) -> Result<Vec<LoadBalancerPool>> {
        let ids = self
            .0
            .get::<&[Value]>("pools")
            .unwrap_or_default()
            .iter()
            .map(|pool| {
                pool.get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| Error::ParseError("pool reference has no id".to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        self.0
            .related("pools", || async move {
                let mut pools = Vec::with_capacity(ids.len());
                for id in &ids {
                    pools.push(LoadBalancerPool::find(session, id, &Query::new()).await?);
                }
                Ok(pools)
            })
            .await
    }
}

impl RestfullyAccessible for LoadBalancerHealthMonitor {
    fn metadata(_session: &Session) -> Result<ResourceMeta> {
        Ok(
            ResourceMeta::for_service(Service::LoadBalancer, "healthmonitor", "healthmonitors")
                .with_api_version("v2.0")?
                .with_resources_path("lbaas/healthmonitors"),
        )
    }
}
