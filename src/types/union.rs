use std::fmt;
use std::sync::Arc;

use super::interface::ResolveType;
use super::{NodeId, Object};
use crate::value::Value;

struct UnionDef {
    name: String,
    description: Option<String>,
    members: Vec<Object>,
    resolve_type: Option<ResolveType>,
}

/// A named sum of Objects. Immutable once built.
#[derive(Clone)]
pub struct Union(Arc<UnionDef>);

impl Union {
    pub fn new<'a>(name: impl Into<String>, members: impl IntoIterator<Item = &'a Object>) -> Self {
        Self::builder(name).members(members).build()
    }

    pub fn builder(name: impl Into<String>) -> UnionBuilder {
        UnionBuilder {
            name: name.into(),
            description: None,
            members: Vec::new(),
            resolve_type: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    pub fn members(&self) -> &[Object] {
        &self.0.members
    }

    pub(crate) fn resolve_type(&self) -> Option<&ResolveType> {
        self.0.resolve_type.as_ref()
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::of(&self.0)
    }
}

impl PartialEq for Union {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Union {}

impl fmt::Debug for Union {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Union({})", self.0.name)
    }
}

pub struct UnionBuilder {
    name: String,
    description: Option<String>,
    members: Vec<Object>,
    resolve_type: Option<ResolveType>,
}

impl UnionBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn member(mut self, object: &Object) -> Self {
        self.members.push(object.clone());
        self
    }

    pub fn members<'a>(mut self, objects: impl IntoIterator<Item = &'a Object>) -> Self {
        self.members.extend(objects.into_iter().cloned());
        self
    }

    pub fn resolve_type<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Option<Object> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> Union {
        Union(Arc::new(UnionDef {
            name: self.name,
            description: self.description,
            members: self.members,
            resolve_type: self.resolve_type,
        }))
    }
}
