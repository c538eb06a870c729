//! Enum types.
//!
//! Each member has an internal name (`RED`) and an external value (`"red"`).
//! The external value is what appears on the wire.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use super::NodeId;

struct EnumDef {
    name: String,
    description: Option<String>,
    members: IndexMap<String, String>,
}

#[derive(Clone)]
pub struct Enum(Arc<EnumDef>);

impl Enum {
    /// Build an enum from `(member name, external value)` pairs.
    ///
    /// External values are strings and must be valid GraphQL names; numeric
    /// values are not supported and fail at compile time.
    pub fn new<N, V>(name: impl Into<String>, members: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        let mut builder = Self::builder(name);
        for (member, value) in members {
            builder = builder.member(member, value);
        }
        builder.build()
    }

    pub fn builder(name: impl Into<String>) -> EnumBuilder {
        EnumBuilder {
            name: name.into(),
            description: None,
            members: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::of(&self.0)
    }

    /// `(member name, external value)` pairs in declaration order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .members
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// The member called `name`.
    pub fn member(&self, name: &str) -> Option<EnumValue> {
        self.0.members.contains_key(name).then(|| EnumValue {
            enum_type: self.clone(),
            name: name.to_string(),
        })
    }

    /// The member whose external value is `value`.
    pub fn from_external(&self, value: &str) -> Option<EnumValue> {
        self.0
            .members
            .iter()
            .find(|(_, external)| external.as_str() == value)
            .map(|(name, _)| EnumValue {
                enum_type: self.clone(),
                name: name.clone(),
            })
    }
}

impl PartialEq for Enum {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Enum {}

impl fmt::Debug for Enum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Enum({})", self.0.name)
    }
}

pub struct EnumBuilder {
    name: String,
    description: Option<String>,
    members: IndexMap<String, String>,
}

impl EnumBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn member(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.members.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> Enum {
        Enum(Arc::new(EnumDef {
            name: self.name,
            description: self.description,
            members: self.members,
        }))
    }
}

/// One member of an [`Enum`].
#[derive(Clone)]
pub struct EnumValue {
    enum_type: Enum,
    name: String,
}

impl EnumValue {
    pub fn enum_type(&self) -> &Enum {
        &self.enum_type
    }

    /// Internal member name, e.g. `RED`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// External value, e.g. `red`.
    pub fn value(&self) -> &str {
        self.enum_type
            .0
            .members
            .get(&self.name)
            .map(String::as_str)
            .unwrap_or(&self.name)
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.enum_type == other.enum_type && self.name == other.name
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.enum_type.name(), self.name)
    }
}
