//! Builder for HTTP query parameters.
//!
//! Queries are ordered key/value pairs. Setting a key that is already present
//! replaces its value, which is how name filters are merged into a caller's
//! query.

use std::fmt::Display;

/// Ordered set of query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Create a new, empty query.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Builder form of [`Query::set`].
    #[must_use]
    pub fn with<T>(mut self, key: impl Into<String>, value: T) -> Self
    where
        T: Display,
    {
        self.set(key, value);
        self
    }

    /// Set a key, replacing any earlier value for it.
    pub fn set<T>(&mut self, key: impl Into<String>, value: T)
    where
        T: Display,
    {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Set a key when the value is present.
    pub fn set_opt<T>(&mut self, key: impl Into<String>, value: Option<T>)
    where
        T: Display,
    {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    /// Returns a copy of `self` with every pair of `other` set on it.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in &other.pairs {
            merged.set(key.clone(), value);
        }
        merged
    }

    /// Look up the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Borrow the pairs in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Query
where
    K: Into<String>,
    V: Display,
{
    fn from(pairs: [(K, V); N]) -> Self {
        let mut query = Self::new();
        for (key, value) in pairs {
            query.set(key, value);
        }
        query
    }
}
