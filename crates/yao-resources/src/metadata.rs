//! Declarative per-resource-type metadata.
//!
//! [`ResourceMeta`] names the backing service, API version, singular and
//! plural resource names and the collection path. Everything the generic
//! accessor needs to build URLs and translate JSON envelopes is derived
//! from it.

use crate::base::Base;
use serde_json::{Map, Value};
use yao_core::{Error, Result, Service};

/// Metadata describing how one resource type maps onto a REST collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMeta {
    service: Option<Service>,
    api_version: Option<String>,
    resource_name: String,
    resources_name: String,
    resources_path: Option<String>,
    admin: bool,
    return_single_on_querying: bool,
    resources_detail_available: bool,
}

impl ResourceMeta {
    /// Metadata with no service bound yet.
    #[must_use]
    pub fn new(resource_name: impl Into<String>, resources_name: impl Into<String>) -> Self {
        Self {
            service: None,
            api_version: None,
            resource_name: resource_name.into(),
            resources_name: resources_name.into(),
            resources_path: None,
            admin: false,
            return_single_on_querying: false,
            resources_detail_available: false,
        }
    }

    /// Metadata bound to a service.
    #[must_use]
    pub fn for_service(
        service: Service,
        resource_name: impl Into<String>,
        resources_name: impl Into<String>,
    ) -> Self {
        Self::new(resource_name, resources_name).with_service(service)
    }

    /// Bind the backing service.
    #[must_use]
    pub const fn with_service(mut self, service: Service) -> Self {
        self.service = Some(service);
        self
    }

    /// Set the API version path prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if no service has been declared yet.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Result<Self> {
        if self.service.is_none() {
            return Err(Error::ConfigError(
                "Set api_version after service is declared".to_string(),
            ));
        }
        self.api_version = Some(version.into());
        Ok(self)
    }

    /// Override the collection path. A leading `/` is stripped.
    #[must_use]
    pub fn with_resources_path(mut self, path: impl AsRef<str>) -> Self {
        self.resources_path = Some(path.as_ref().trim_start_matches('/').to_string());
        self
    }

    /// Require admin access.
    #[must_use]
    pub const fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    /// Filtered list responses come back in the singular envelope.
    #[must_use]
    pub const fn with_return_single_on_querying(mut self, single: bool) -> Self {
        self.return_single_on_querying = single;
        self
    }

    /// The collection has a `detail` sub-endpoint used for listing.
    #[must_use]
    pub const fn with_resources_detail_available(mut self, available: bool) -> Self {
        self.resources_detail_available = available;
        self
    }

    /// The backing service.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if no service has been declared.
    pub fn service(&self) -> Result<Service> {
        self.service.ok_or_else(|| {
            Error::ConfigError(format!(
                "No service declared for resource `{}`",
                self.resource_name
            ))
        })
    }

    /// API version prefix, empty when unset.
    #[must_use]
    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or("")
    }

    /// Singular resource name.
    #[must_use]
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Plural resource name.
    #[must_use]
    pub fn resources_name(&self) -> &str {
        &self.resources_name
    }

    /// Collection path, defaulting to the plural name.
    #[must_use]
    pub fn resources_path(&self) -> &str {
        self.resources_path.as_deref().unwrap_or(&self.resources_name)
    }

    /// Whether the type requires admin access.
    #[must_use]
    pub const fn admin(&self) -> bool {
        self.admin
    }

    /// Whether filtered lists answer in the singular envelope.
    #[must_use]
    pub const fn return_single_on_querying(&self) -> bool {
        self.return_single_on_querying
    }

    /// Whether listing goes through the `detail` sub-endpoint.
    #[must_use]
    pub const fn resources_detail_available(&self) -> bool {
        self.resources_detail_available
    }

    /// Singular JSON envelope key.
    #[must_use]
    pub fn resource_name_in_json(&self) -> String {
        json_key(&self.resource_name)
    }

    /// Plural JSON envelope key.
    #[must_use]
    pub fn resources_name_in_json(&self) -> String {
        json_key(&self.resources_name)
    }

    /// Relative URL: `[api_version]/[resources_path]/[subpath]`, empty parts
    /// skipped.
    ///
    /// `subpath` is one path segment; it is percent-encoded so `/`, `?` and
    /// `#` in ids or names cannot escape it.
    #[must_use]
    pub fn create_url(&self, subpath: &str) -> String {
        let segment = urlencoding::encode(subpath);
        [self.api_version(), self.resources_path(), &*segment]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// URL used by `list`.
    #[must_use]
    pub fn list_url(&self) -> String {
        if self.resources_detail_available {
            self.create_url("detail")
        } else {
            self.create_url("")
        }
    }

    /// Wrap request attributes in the singular envelope.
    #[must_use]
    pub fn wrap(&self, params: Value) -> Value {
        let mut envelope = Map::new();
        envelope.insert(self.resource_name_in_json(), params);
        Value::Object(envelope)
    }

    /// Decode a singular envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the key is missing or not an object.
    pub fn resource_from_json(&self, json: &Value) -> Result<Base> {
        let key = self.resource_name_in_json();
        match json.get(&key) {
            Some(attributes) => Base::from_value(attributes.clone()),
            None => Err(Error::ParseError(format!("response has no `{key}` key"))),
        }
    }

    /// Decode a plural envelope, or a bare top-level array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if neither shape is present or an entry
    /// is not an object.
    pub fn resources_from_json(&self, json: &Value) -> Result<Vec<Base>> {
        let key = self.resources_name_in_json();
        let entries = match json {
            Value::Array(entries) => entries,
            other => other
                .get(&key)
                .and_then(Value::as_array)
                .ok_or_else(|| Error::ParseError(format!("response has no `{key}` array")))?,
        };
        entries.iter().cloned().map(Base::from_value).collect()
    }

    /// Decode a `list` response.
    ///
    /// When `return_single_on_querying` is set and the list was filtered,
    /// the result holds at most one resource: the singular envelope when
    /// present, else the first entry of the plural envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if no expected envelope is present.
    pub fn list_from_json(&self, json: &Value, filtered: bool) -> Result<Vec<Base>> {
        if !(self.return_single_on_querying && filtered) {
            return self.resources_from_json(json);
        }
        if json.get(self.resource_name_in_json()).is_some() {
            return Ok(vec![self.resource_from_json(json)?]);
        }
        let mut found = self.resources_from_json(json)?;
        found.truncate(1);
        Ok(found)
    }
}

/// JSON key for a resource name: `os-` prefix stripped, `-` replaced by `_`.
#[must_use]
pub fn json_key(name: &str) -> String {
    name.strip_prefix("os-").unwrap_or(name).replace('-', "_")
}
