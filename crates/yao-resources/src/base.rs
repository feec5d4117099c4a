//! The attribute map every resource wraps.
//!
//! A [`Base`] holds one decoded JSON object. Accessors are pure reads;
//! unknown or unset attributes read as `None`. Related objects fetched or
//! built from the attributes are memoised per instance, keyed by field name
//! and target type.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;
use yao_core::{Error, Result};

/// Attribute map decoded from one JSON object.
pub type Attributes = Map<String, Value>;

/// A value that can be read out of a JSON attribute.
pub trait AttributeValue<'a>: Sized {
    /// Convert a non-null JSON value, or `None` when it has the wrong shape.
    fn from_value(value: &'a Value) -> Option<Self>;
}

impl<'a> AttributeValue<'a> for &'a str {
    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_str()
    }
}

impl AttributeValue<'_> for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl AttributeValue<'_> for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl AttributeValue<'_> for u64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_u64()
    }
}

impl AttributeValue<'_> for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl<'a> AttributeValue<'a> for &'a Value {
    fn from_value(value: &'a Value) -> Option<Self> {
        Some(value)
    }
}

impl<'a> AttributeValue<'a> for &'a [Value] {
    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_array().map(Vec::as_slice)
    }
}

impl<'a> AttributeValue<'a> for &'a Attributes {
    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object()
    }
}

type RelationKey = (String, TypeId);

#[derive(Default)]
struct RelationCache(Mutex<HashMap<RelationKey, Arc<dyn Any + Send + Sync>>>);

impl RelationCache {
    // Entries are inserted whole, so a poisoned map is still consistent.
    fn entries(&self) -> MutexGuard<'_, HashMap<RelationKey, Arc<dyn Any + Send + Sync>>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup<T>(&self, field: &str) -> Option<T>
    where
        T: Clone + 'static,
    {
        self.entries()
            .get(&(field.to_string(), TypeId::of::<T>()))
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    fn store<T>(&self, field: &str, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.entries()
            .insert((field.to_string(), TypeId::of::<T>()), Arc::new(value));
    }

    fn clear(&self) {
        self.entries().clear();
    }
}

// Clones start with an empty cache.
impl Clone for RelationCache {
    fn clone(&self) -> Self {
        Self::default()
    }
}

/// One decoded resource object.
#[derive(Clone, Default)]
pub struct Base {
    data: Attributes,
    relations: RelationCache,
}

impl Base {
    /// Wrap an attribute map.
    #[must_use]
    pub fn new(data: Attributes) -> Self {
        Self {
            data,
            relations: RelationCache::default(),
        }
    }

    /// Wrap a JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] for any other JSON shape.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(data) => Ok(Self::new(data)),
            other => Err(Error::ParseError(format!(
                "expected a JSON object for a resource, got `{other}`"
            ))),
        }
    }

    /// Raw attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Typed attribute value; JSON `null` and mismatched shapes read as `None`.
    #[must_use]
    pub fn get<'a, T>(&'a self, name: &str) -> Option<T>
    where
        T: AttributeValue<'a>,
    {
        self.data
            .get(name)
            .filter(|value| !value.is_null())
            .and_then(T::from_value)
    }

    /// Write an attribute. The change is local until passed to `update`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(name.into(), value.into());
        self.relations.clear();
    }

    /// Borrow all attributes.
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.data
    }

    /// Consume into the attribute map.
    #[must_use]
    pub fn into_attributes(self) -> Attributes {
        self.data
    }

    /// The `id` attribute. Numeric ids are rendered as strings.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self.data.get("id")? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// The `id` attribute, required.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] when the resource has no id.
    pub fn require_id(&self) -> Result<String> {
        self.id()
            .ok_or_else(|| Error::InvalidRequest("resource has no `id` attribute".to_string()))
    }

    /// The `created` timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the attribute is present but malformed.
    pub fn created(&self) -> Result<Option<DateTime<Utc>>> {
        self.timestamp("created")
    }

    /// The `updated` timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the attribute is present but malformed.
    pub fn updated(&self) -> Result<Option<DateTime<Utc>>> {
        self.timestamp("updated")
    }

    fn timestamp(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        self.get::<&str>(name).map(parse_timestamp).transpose()
    }

    /// Memoise an asynchronously fetched relation.
    ///
    /// The first call for a given `field` and `T` runs `fetch`; later calls
    /// return the stored value without fetching again. Failed fetches are
    /// not stored.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `fetch`.
    pub async fn related<T, F, Fut>(&self, field: &str, fetch: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(cached) = self.relations.lookup::<T>(field) {
            debug!(field, "relation cache hit");
            return Ok(cached);
        }
        let value = fetch().await?;
        self.relations.store(field, value.clone());
        Ok(value)
    }

    /// Memoise a value derived from the attributes.
    pub fn memoized<T, F>(&self, field: &str, build: F) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce(&Self) -> T,
    {
        if let Some(cached) = self.relations.lookup::<T>(field) {
            return cached;
        }
        let value = build(self);
        self.relations.store(field, value.clone());
        value
    }

    /// Build resources from an embedded array of objects, memoised.
    ///
    /// Entries that are not JSON objects are skipped.
    #[must_use]
    pub fn nested_list<R>(&self, field: &str) -> Vec<R>
    where
        R: crate::Resource + Clone,
    {
        self.memoized(field, |base| {
            base.get::<&[Value]>(field)
                .unwrap_or_default()
                .iter()
                .filter_map(|entry| entry.as_object().cloned())
                .map(|data| R::from_base(Self::new(data)))
                .collect()
        })
    }
}

impl PartialEq for Base {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl fmt::Debug for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.data.iter()).finish()
    }
}

impl From<Attributes> for Base {
    fn from(data: Attributes) -> Self {
        Self::new(data)
    }
}

impl Serialize for Base {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.data.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Base {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Attributes::deserialize(deserializer).map(Self::new)
    }
}

/// Parse an OpenStack timestamp.
///
/// Accepts RFC 3339, `+hhmm` offsets, and zone-less
/// `YYYY-MM-DDTHH:MM:SS[.ffffff]` (read as UTC, which is how Nova and
/// Keystone emit them).
///
/// # Errors
///
/// Returns [`Error::ParseError`] if no supported format matches.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    Err(Error::ParseError(format!("invalid timestamp `{raw}`")))
}
