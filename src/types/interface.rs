//! Interface types.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::field::Field;
use super::lifecycle::Lifecycle;
use super::resolver::Resolver;
use super::{NodeId, Object};
use crate::error::{Result, TypeGraphError};
use crate::introspect::{field_from_resolver, Signature};
use crate::value::Value;

/// Custom type resolution for abstract types: which Object a value is.
pub type ResolveType = Arc<dyn Fn(&Value) -> Option<Object> + Send + Sync>;

struct InterfaceDef {
    name: String,
    description: Option<String>,
    resolve_type: Option<ResolveType>,
    state: RwLock<InterfaceState>,
}

#[derive(Default)]
struct InterfaceState {
    fields: IndexMap<String, Field>,
    lifecycle: Lifecycle<()>,
}

/// A named field contract implemented by Objects.
#[derive(Clone)]
pub struct Interface(Arc<InterfaceDef>);

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    pub fn builder(name: impl Into<String>) -> InterfaceBuilder {
        InterfaceBuilder {
            name: name.into(),
            description: None,
            resolve_type: None,
            fields: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    pub(crate) fn resolve_type(&self) -> Option<&ResolveType> {
        self.0.resolve_type.as_ref()
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::of(&self.0)
    }

    pub fn define_field(&self, name: impl Into<String>, field: impl Into<Field>) -> Result<()> {
        let name = name.into();
        let mut state = self.0.state.write();
        state.lifecycle.ensure_open("interface", &self.0.name)?;
        debug!(interface = %self.0.name, field = %name, "defining field");
        state.fields.insert(name, field.into());
        Ok(())
    }

    pub fn field(
        &self,
        name: impl Into<String>,
        signature: Signature,
        resolver: Resolver,
    ) -> Result<()> {
        let name = name.into();
        self.0
            .state
            .read()
            .lifecycle
            .ensure_open("interface", &self.0.name)?;
        let field = field_from_resolver(&signature, resolver).map_err(|source| {
            TypeGraphError::Signature {
                field: name.clone(),
                source,
            }
        })?;
        self.define_field(name, field)
    }

    pub fn fields(&self) -> Vec<(String, Field)> {
        self.0
            .state
            .read()
            .fields
            .iter()
            .map(|(name, field)| (name.clone(), field.clone()))
            .collect()
    }

    pub fn is_sealed(&self) -> bool {
        self.0.state.read().lifecycle.is_sealed()
    }

    /// Interfaces have no container type; compiling one seals it.
    pub(crate) fn seal(&self) {
        let mut state = self.0.state.write();
        if !state.lifecycle.is_sealed() {
            debug!(interface = %self.0.name, "sealing interface");
        }
        state.lifecycle.seal_with(|| ());
    }
}

impl PartialEq for Interface {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Interface {}

impl fmt::Debug for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interface({})", self.0.name)
    }
}

pub struct InterfaceBuilder {
    name: String,
    description: Option<String>,
    resolve_type: Option<ResolveType>,
    fields: IndexMap<String, Field>,
}

impl InterfaceBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the default "first implementer that accepts the value" lookup.
    pub fn resolve_type<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Option<Object> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(f));
        self
    }

    pub fn field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.fields.insert(name.into(), field.into());
        self
    }

    pub fn build(self) -> Interface {
        Interface(Arc::new(InterfaceDef {
            name: self.name,
            description: self.description,
            resolve_type: self.resolve_type,
            state: RwLock::new(InterfaceState {
                fields: self.fields,
                lifecycle: Lifecycle::Open,
            }),
        }))
    }
}
