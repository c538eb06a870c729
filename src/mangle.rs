//! Translation between internal names and external (wire) names.
//!
//! Internal names are snake_case; the wire sees camelCase. Each compiled
//! field and input object owns a [`NameMap`] built once at compile time,
//! and resolvers receive their arguments back under internal names.

use indexmap::IndexMap;
use std::sync::Arc;

use anyhow::anyhow;

use crate::error::{Result, TypeGraphError};
use crate::value::{FromValue, Value};

/// `some_field_name` → `someFieldName`.
///
/// The first segment is kept as is; every following segment is capitalized
/// (first letter upper, the rest lower). Empty segments, from doubled or
/// trailing underscores, are kept as a single `_`.
pub fn to_camel_case(name: &str) -> String {
    let mut parts = name.split('_');
    let mut out = String::with_capacity(name.len());
    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    for part in parts {
        let mut chars = part.chars();
        match chars.next() {
            None => out.push('_'),
            Some(c) => {
                out.extend(c.to_uppercase());
                out.push_str(&chars.as_str().to_lowercase());
            }
        }
    }
    out
}

/// Bidirectional map between internal names and their external form.
#[derive(Debug, Clone, Default)]
pub struct NameMap {
    by_external: IndexMap<String, String>,
}

impl NameMap {
    /// Map every internal name of `owner`. Two names mangling to the same
    /// external name is an error.
    pub fn build<'a>(owner: &str, names: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut by_external: IndexMap<String, String> = IndexMap::new();
        for internal in names {
            let external = to_camel_case(internal);
            if let Some(first) = by_external.get(&external) {
                return Err(TypeGraphError::NameCollision {
                    owner: owner.to_string(),
                    first: first.clone(),
                    second: internal.to_string(),
                    external,
                });
            }
            by_external.insert(external, internal.to_string());
        }
        Ok(Self { by_external })
    }

    pub fn internal(&self, external: &str) -> Option<&str> {
        self.by_external.get(external).map(String::as_str)
    }

    /// `(external, internal)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_external
            .iter()
            .map(|(external, internal)| (external.as_str(), internal.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_external.is_empty()
    }

    /// Re-key externally named values under their internal names. Unknown
    /// keys are passed through unchanged.
    pub fn translate<I>(&self, values: I) -> IndexMap<String, Value>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        values
            .into_iter()
            .map(|(key, value)| match self.internal(&key) {
                Some(internal) => (internal.to_string(), value),
                None => (key, value),
            })
            .collect()
    }
}

/// Arguments delivered to a resolver.
///
/// Only arguments present in the request are stored; an omitted argument
/// is absent, an explicit `null` is `Value::Null`. Declared defaults are
/// kept apart and only consulted through [`Arguments::value_or_default`]
/// and the typed getters.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    supplied: IndexMap<String, Value>,
    defaults: Arc<IndexMap<String, Value>>,
}

impl Arguments {
    pub(crate) fn new(
        supplied: IndexMap<String, Value>,
        defaults: Arc<IndexMap<String, Value>>,
    ) -> Self {
        Self { supplied, defaults }
    }

    /// Attach declared defaults to a set of supplied arguments.
    pub fn with_defaults<K, V>(mut self, defaults: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.defaults = Arc::new(
            defaults
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// The supplied value, `None` when the argument was omitted.
    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.supplied.get(name)
    }

    /// The supplied value, or the declared default when omitted.
    pub fn value_or_default(&self, name: &str) -> Option<&Value> {
        self.supplied.get(name).or_else(|| self.defaults.get(name))
    }

    pub fn is_supplied(&self, name: &str) -> bool {
        self.supplied.contains_key(name)
    }

    /// Typed access, falling back to the declared default.
    pub fn get<T: FromValue>(&self, name: &str) -> anyhow::Result<T> {
        let value = self
            .value_or_default(name)
            .ok_or_else(|| anyhow!("argument '{}' was not supplied", name))?;
        T::from_value(value)
            .ok_or_else(|| anyhow!("argument '{}' has an unexpected value: {}", name, value))
    }

    /// Like [`Arguments::get`], but omitted and null both read as `None`.
    pub fn get_opt<T: FromValue>(&self, name: &str) -> anyhow::Result<Option<T>> {
        match self.value_or_default(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::from_value(value)
                .map(Some)
                .ok_or_else(|| anyhow!("argument '{}' has an unexpected value: {}", name, value)),
        }
    }

    /// Supplied arguments, internal names, in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.supplied.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.supplied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supplied.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            supplied: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            defaults: Arc::default(),
        }
    }
}
