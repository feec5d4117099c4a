//! Telemetry meters.

use crate::accessible::RestfullyAccessible;
use crate::metadata::ResourceMeta;
use crate::resource;
use yao_core::{Result, Service, Session};

resource! {
    /// A telemetry meter. The metering API answers lists with a bare array.
    pub struct Meter {
        name: &str => "name",
        meter_id: &str => "meter_id",
        resource_id: &str => "resource_id",
        project_id: &str => "project_id",
        user_id: &str => "user_id",
        source: &str => "source",
        kind: &str => "type",
        unit: &str => "unit",
    }
}

impl RestfullyAccessible for Meter {
    fn metadata(_session: &Session) -> Result<ResourceMeta> {
        ResourceMeta::for_service(Service::Metering, "meter", "meters").with_api_version("v2")
    }
}
