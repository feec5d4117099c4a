//! Generic REST accessors shared by every resource type.
//!
//! A resource type declares its [`ResourceMeta`]; [`RestfullyAccessible`]
//! turns that into URLs, request envelopes and response decoding for the
//! list / get / create / update / destroy verbs.

use crate::base::Base;
use crate::metadata::ResourceMeta;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};
use yao_core::{ApiRequest, ApiResponse, Error, Identifier, Query, Result, Session, Transport};

/// A typed view over a [`Base`] attribute map.
pub trait Resource: Sized + Send + Sync + 'static {
    /// Wrap decoded attributes.
    fn from_base(base: Base) -> Self;

    /// Borrow the underlying attributes.
    fn base(&self) -> &Base;

    /// Mutably borrow the underlying attributes.
    fn base_mut(&mut self) -> &mut Base;

    /// Raw attribute value.
    fn attribute(&self, name: &str) -> Option<&Value> {
        self.base().attribute(name)
    }

    /// The `id` attribute.
    fn id(&self) -> Option<String> {
        self.base().id()
    }

    /// The `created` timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the attribute is malformed.
    fn created(&self) -> Result<Option<DateTime<Utc>>> {
        self.base().created()
    }

    /// The `updated` timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the attribute is malformed.
    fn updated(&self) -> Result<Option<DateTime<Utc>>> {
        self.base().updated()
    }
}

/// Declare a resource newtype over [`Base`] with typed accessors.
///
/// Each accessor line reads `method: Type => "json_key"` and generates
/// `fn method(&self) -> Option<Type>`.
///
/// ```
/// yao_resources::resource! {
///     /// A flavor.
///     pub struct Flavor {
///         name: &str => "name",
///         vcpus: u64 => "vcpus",
///     }
/// }
/// ```
#[macro_export]
macro_rules! resource {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident {
            $($method:ident : $ty:ty => $key:literal),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Default)]
        $vis struct $name($crate::Base);

        impl $crate::Resource for $name {
            fn from_base(base: $crate::Base) -> Self {
                Self(base)
            }

            fn base(&self) -> &$crate::Base {
                &self.0
            }

            fn base_mut(&mut self) -> &mut $crate::Base {
                &mut self.0
            }
        }

        impl $name {
            $(
                #[doc = concat!("The `", $key, "` attribute.")]
                #[must_use]
                pub fn $method(&self) -> Option<$ty> {
                    self.0.get::<$ty>($key)
                }
            )*
        }

        impl From<$crate::Base> for $name {
            fn from(base: $crate::Base) -> Self {
                Self(base)
            }
        }
    };
}

/// REST verbs derived from a resource type's metadata.
///
/// Only [`RestfullyAccessible::metadata`] is required; types override the
/// provided methods where their backing API deviates from the convention.
#[async_trait]
pub trait RestfullyAccessible: Resource {
    /// Metadata for this type as seen through `session`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the metadata cannot be resolved.
    fn metadata(session: &Session) -> Result<ResourceMeta>;

    /// Metadata together with the transport it selects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the session has no client for the
    /// service at the required access level.
    fn transport(session: &Session) -> Result<(ResourceMeta, Arc<dyn Transport>)> {
        let meta = Self::metadata(session)?;
        let client = session.client(meta.service()?, meta.admin())?;
        Ok((meta, client))
    }

    /// Decode a singular envelope into `Self`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] for a malformed body.
    fn decode_one(meta: &ResourceMeta, response: &ApiResponse) -> Result<Self> {
        meta.resource_from_json(&response.json()?).map(Self::from_base)
    }

    /// Decode a plural envelope into a list of `Self`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] for a malformed body.
    fn decode_many(meta: &ResourceMeta, response: &ApiResponse) -> Result<Vec<Self>> {
        Ok(meta
            .resources_from_json(&response.json()?)?
            .into_iter()
            .map(Self::from_base)
            .collect())
    }

    /// List the collection, through `detail` when the type has it.
    ///
    /// # Errors
    ///
    /// Propagates transport errors and [`Error::ParseError`].
    async fn list(session: &Session, query: &Query) -> Result<Vec<Self>> {
        let (meta, client) = Self::transport(session)?;
        let response = client
            .send(ApiRequest::get(meta.list_url()).with_query(query.clone()))
            .await?;
        Ok(meta
            .list_from_json(&response.json()?, !query.is_empty())?
            .into_iter()
            .map(Self::from_base)
            .collect())
    }

    /// Alias for [`RestfullyAccessible::list`].
    ///
    /// # Errors
    ///
    /// See [`RestfullyAccessible::list`].
    async fn list_detail(session: &Session, query: &Query) -> Result<Vec<Self>> {
        Self::list(session, query).await
    }

    /// Fetch one resource by URL, UUID or name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] / [`Error::ItemNotFound`] when absent and
    /// [`Error::TooManyItemsFound`] when a name is ambiguous.
    async fn get(session: &Session, id: &str, query: &Query) -> Result<Self> {
        match Identifier::classify(id) {
            Identifier::Url(url) => {
                let (meta, client) = Self::transport(session)?;
                let response = client
                    .send(ApiRequest::get(url).with_query(query.clone()))
                    .await?;
                Self::decode_one(&meta, &response)
            }
            Identifier::Uuid(uuid) => {
                let (meta, client) = Self::transport(session)?;
                let response = client
                    .send(ApiRequest::get(meta.create_url(uuid)).with_query(query.clone()))
                    .await?;
                Self::decode_one(&meta, &response)
            }
            Identifier::Name(name) => Self::get_by_name(session, name, query).await,
        }
    }

    /// Alias for [`RestfullyAccessible::get`].
    ///
    /// # Errors
    ///
    /// See [`RestfullyAccessible::get`].
    async fn find(session: &Session, id: &str, query: &Query) -> Result<Self> {
        Self::get(session, id, query).await
    }

    /// Like [`RestfullyAccessible::get`], but absence is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Propagates every error except `NotFound` and `ItemNotFound`.
    async fn get_opt(session: &Session, id: &str, query: &Query) -> Result<Option<Self>> {
        match Self::get(session, id, query).await {
            Ok(resource) => Ok(Some(resource)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Resolve `name` as an id-shaped path segment first, then by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no resource carries the name and
    /// [`Error::TooManyItemsFound`] when several do.
    async fn get_by_name(session: &Session, name: &str, query: &Query) -> Result<Self> {
        let (meta, client) = Self::transport(session)?;
        match client
            .send(ApiRequest::get(meta.create_url(name)).with_query(query.clone()))
            .await
        {
            Ok(response) => return Self::decode_one(&meta, &response),
            Err(err) if err.is_not_found() => {
                debug!(
                    resource = meta.resource_name(),
                    name, "not addressable by path, searching by name"
                );
            }
            Err(err) => return Err(err),
        }

        let matches = Self::find_by_name(session, name, &Query::new()).await?;
        let id = match matches.as_slice() {
            [] => {
                return Err(Error::NotFound(format!(
                    "No {} exists with the name '{name}'",
                    meta.resource_name()
                )))
            }
            [single] => single.base().require_id()?,
            _ => {
                warn!(
                    resource = meta.resource_name(),
                    name,
                    count = matches.len(),
                    "ambiguous name"
                );
                return Err(Error::TooManyItemsFound(format!(
                    "More than one resource exists with the name '{name}'"
                )));
            }
        };

        let response = client
            .send(ApiRequest::get(meta.create_url(&id)).with_query(query.clone()))
            .await?;
        Self::decode_one(&meta, &response)
    }

    /// List with the query extended by `name`.
    ///
    /// # Errors
    ///
    /// See [`RestfullyAccessible::list`].
    async fn find_by_name(session: &Session, name: &str, query: &Query) -> Result<Vec<Self>> {
        let query = query.clone().with("name", name);
        Self::list(session, &query).await
    }

    /// POST `params` wrapped in the singular envelope to the collection.
    ///
    /// # Errors
    ///
    /// Propagates serialisation, transport and decoding errors.
    async fn create<P>(session: &Session, params: &P) -> Result<Self>
    where
        P: Serialize + Sync + ?Sized,
    {
        let (meta, client) = Self::transport(session)?;
        let body = meta.wrap(serde_json::to_value(params)?);
        let response = client
            .send(ApiRequest::post(meta.create_url("")).with_body(body))
            .await?;
        Self::decode_one(&meta, &response)
    }

    /// PUT `params` wrapped in the singular envelope to the resource URL.
    ///
    /// # Errors
    ///
    /// Propagates serialisation, transport and decoding errors.
    async fn update<P>(session: &Session, id: &str, params: &P) -> Result<Self>
    where
        P: Serialize + Sync + ?Sized,
    {
        let (meta, client) = Self::transport(session)?;
        let body = meta.wrap(serde_json::to_value(params)?);
        let response = client
            .send(ApiRequest::put(meta.create_url(id)).with_body(body))
            .await?;
        Self::decode_one(&meta, &response)
    }

    /// DELETE the resource URL and return the raw response body.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    async fn destroy(session: &Session, id: &str) -> Result<String> {
        let (meta, client) = Self::transport(session)?;
        let response = client.send(ApiRequest::delete(meta.create_url(id))).await?;
        Ok(response.body)
    }
}
