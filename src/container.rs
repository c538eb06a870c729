//! Container types: one runtime type per Object/InputObject definition.
//!
//! A container type is created once, when its owner is sealed, and is the
//! nominal identity used by the default discriminator: two definitions never
//! share a container type, even when their fields are identical.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::config::Discrimination;
use crate::value::{Value, NULL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Object,
    InputObject,
}

struct ContainerDef {
    name: String,
    kind: ContainerKind,
    fields: Vec<String>,
}

/// Runtime type of one Object/InputObject. Equality is identity.
#[derive(Clone)]
pub struct ContainerType(Arc<ContainerDef>);

impl ContainerType {
    pub(crate) fn new(name: &str, kind: ContainerKind, fields: Vec<String>) -> Self {
        Self(Arc::new(ContainerDef {
            name: name.to_string(),
            kind,
            fields,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> ContainerKind {
        self.0.kind
    }

    /// Field names declared on the owner when it was sealed.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.fields.iter().map(String::as_str)
    }

    pub fn declares(&self, field: &str) -> bool {
        self.0.fields.iter().any(|f| f == field)
    }

    /// Create an instance. Names the owner does not declare are stored too.
    pub fn instantiate<K, V>(&self, fields: impl IntoIterator<Item = (K, V)>) -> Instance
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Instance {
            container: self.clone(),
            values: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn empty(&self) -> Instance {
        Instance {
            container: self.clone(),
            values: IndexMap::new(),
        }
    }

    pub fn is_instance(&self, value: &Value) -> bool {
        matches!(value, Value::Instance(instance) if instance.container == *self)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ContainerType {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ContainerType {}

impl fmt::Debug for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContainerType({})", self.0.name)
    }
}

/// A value constructed from a container type.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    container: ContainerType,
    values: IndexMap<String, Value>,
}

impl Instance {
    pub fn container(&self) -> &ContainerType {
        &self.container
    }

    pub fn is_instance_of(&self, container: &ContainerType) -> bool {
        self.container == *container
    }

    /// Declared fields that were never set read as `Null`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .get(name)
            .or_else(|| self.container.declares(name).then_some(&NULL))
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Explicitly set members, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Default `is_type_of` for an Object without a custom discriminator.
///
/// A container instance must belong to `container`. Anything else is
/// accepted unless the mode is [`Discrimination::Strict`].
pub fn default_is_type_of(container: &ContainerType, value: &Value, mode: Discrimination) -> bool {
    match value {
        Value::Instance(instance) => instance.is_instance_of(container),
        _ => mode == Discrimination::Permissive,
    }
}
