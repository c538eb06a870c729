//! Input object types.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::field::InputField;
use super::lifecycle::Lifecycle;
use super::NodeId;
use crate::container::{ContainerKind, ContainerType, Instance};
use crate::error::Result;
use crate::value::Value;

struct InputObjectDef {
    name: String,
    description: Option<String>,
    state: RwLock<InputObjectState>,
}

#[derive(Default)]
struct InputObjectState {
    fields: IndexMap<String, InputField>,
    lifecycle: Lifecycle<ContainerType>,
}

/// A named argument record. Supplied values arrive at resolvers as
/// instances of its container type, keyed by internal field names.
#[derive(Clone)]
pub struct InputObject(Arc<InputObjectDef>);

impl InputObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    pub fn builder(name: impl Into<String>) -> InputObjectBuilder {
        InputObjectBuilder {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
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

    pub fn define_field(
        &self,
        name: impl Into<String>,
        field: impl Into<InputField>,
    ) -> Result<()> {
        let name = name.into();
        let mut state = self.0.state.write();
        state.lifecycle.ensure_open("input object", &self.0.name)?;
        debug!(input_object = %self.0.name, field = %name, "defining input field");
        state.fields.insert(name, field.into());
        Ok(())
    }

    pub fn fields(&self) -> Vec<(String, InputField)> {
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

    /// Seals the input object on first call.
    pub fn container_type(&self) -> ContainerType {
        let mut guard = self.0.state.write();
        let state = &mut *guard;
        let name = &self.0.name;
        let fields = &state.fields;
        state.lifecycle.seal_with(|| {
            debug!(input_object = %name, fields = fields.len(), "sealing input object");
            ContainerType::new(
                name,
                ContainerKind::InputObject,
                fields.keys().cloned().collect(),
            )
        })
    }

    pub fn instantiate<K, V>(&self, fields: impl IntoIterator<Item = (K, V)>) -> Instance
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.container_type().instantiate(fields)
    }
}

impl PartialEq for InputObject {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for InputObject {}

impl fmt::Debug for InputObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputObject({})", self.0.name)
    }
}

pub struct InputObjectBuilder {
    name: String,
    description: Option<String>,
    fields: IndexMap<String, InputField>,
}

impl InputObjectBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, field: impl Into<InputField>) -> Self {
        self.fields.insert(name.into(), field.into());
        self
    }

    pub fn build(self) -> InputObject {
        InputObject(Arc::new(InputObjectDef {
            name: self.name,
            description: self.description,
            state: RwLock::new(InputObjectState {
                fields: self.fields,
                lifecycle: Lifecycle::Open,
            }),
        }))
    }
}
