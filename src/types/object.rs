//! Object types.
//!
//! An `Object` is a cheap, cloneable handle; clones share the same
//! definition and therefore the same identity and container type.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::field::Field;
use super::lifecycle::Lifecycle;
use super::resolver::Resolver;
use super::{Interface, NodeId};
use crate::container::{ContainerKind, ContainerType, Instance};
use crate::error::{Result, TypeGraphError};
use crate::introspect::{field_from_resolver, Signature};
use crate::value::Value;

/// Custom discriminator: does this value belong to the object?
pub type IsTypeOf = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

struct ObjectDef {
    name: String,
    description: Option<String>,
    interfaces: Vec<Interface>,
    is_type_of: Option<IsTypeOf>,
    state: RwLock<ObjectState>,
}

#[derive(Default)]
struct ObjectState {
    fields: IndexMap<String, Field>,
    lifecycle: Lifecycle<ContainerType>,
}

#[derive(Clone)]
pub struct Object(Arc<ObjectDef>);

impl Object {
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    pub fn builder(name: impl Into<String>) -> ObjectBuilder {
        ObjectBuilder {
            name: name.into(),
            description: None,
            interfaces: Vec::new(),
            is_type_of: None,
            fields: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.0.interfaces
    }

    pub(crate) fn is_type_of(&self) -> Option<&IsTypeOf> {
        self.0.is_type_of.as_ref()
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::of(&self.0)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Declare a field with the default resolver.
    pub fn define_field(&self, name: impl Into<String>, field: impl Into<Field>) -> Result<()> {
        let name = name.into();
        let mut state = self.0.state.write();
        state.lifecycle.ensure_open("object", &self.0.name)?;
        debug!(object = %self.0.name, field = %name, "defining field");
        state.fields.insert(name, field.into());
        Ok(())
    }

    /// Register `resolver` as field `name`, deriving the field from `signature`.
    pub fn field(
        &self,
        name: impl Into<String>,
        signature: Signature,
        resolver: Resolver,
    ) -> Result<()> {
        let name = name.into();
        self.0.state.read().lifecycle.ensure_open("object", &self.0.name)?;
        let field = field_from_resolver(&signature, resolver).map_err(|source| {
            TypeGraphError::Signature {
                field: name.clone(),
                source,
            }
        })?;
        self.define_field(name, field)
    }

    /// Zero-argument grouping field whose resolver instantiates `child`.
    pub fn namespace_field(&self, name: impl Into<String>, child: &Object) -> Result<()> {
        let target = child.clone();
        let resolver = Resolver::sync(move |_, _, _| Ok(Value::Instance(target.container_type().empty())));
        self.define_field(name, Field::new(child).resolver(resolver))
    }

    /// Snapshot of the declared fields, in declaration order.
    pub fn fields(&self) -> Vec<(String, Field)> {
        self.0
            .state
            .read()
            .fields
            .iter()
            .map(|(name, field)| (name.clone(), field.clone()))
            .collect()
    }

    pub fn field_count(&self) -> usize {
        self.0.state.read().fields.len()
    }

    pub fn is_sealed(&self) -> bool {
        self.0.state.read().lifecycle.is_sealed()
    }

    /// The object's container type. Seals the object on first call.
    pub fn container_type(&self) -> ContainerType {
        let mut guard = self.0.state.write();
        let state = &mut *guard;
        let name = &self.0.name;
        let fields = &state.fields;
        state.lifecycle.seal_with(|| {
            debug!(object = %name, fields = fields.len(), "sealing object");
            ContainerType::new(
                name,
                ContainerKind::Object,
                fields.keys().cloned().collect(),
            )
        })
    }

    /// Build an instance of the container type.
    pub fn instantiate<K, V>(&self, fields: impl IntoIterator<Item = (K, V)>) -> Instance
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.container_type().instantiate(fields)
    }

    /// Same as [`Object::instantiate`], wrapped as a [`Value`].
    pub fn instance<K, V>(&self, fields: impl IntoIterator<Item = (K, V)>) -> Value
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Instance(self.instantiate(fields))
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Object {}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({})", self.0.name)
    }
}

/// Construction-time options of an [`Object`].
pub struct ObjectBuilder {
    name: String,
    description: Option<String>,
    interfaces: Vec<Interface>,
    is_type_of: Option<IsTypeOf>,
    fields: IndexMap<String, Field>,
}

impl ObjectBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn implements(mut self, interface: &Interface) -> Self {
        self.interfaces.push(interface.clone());
        self
    }

    pub fn is_type_of<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.is_type_of = Some(Arc::new(f));
        self
    }

    pub fn field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.fields.insert(name.into(), field.into());
        self
    }

    pub fn build(self) -> Object {
        Object(Arc::new(ObjectDef {
            name: self.name,
            description: self.description,
            interfaces: self.interfaces,
            is_type_of: self.is_type_of,
            state: RwLock::new(ObjectState {
                fields: self.fields,
                lifecycle: Lifecycle::Open,
            }),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, SignatureError};
    use crate::scalars::Scalar;

    #[test]
    fn test_fields_from_builder_and_definition() {
        let post = Object::builder("Post")
            .field("title", Scalar::String)
            .field("body", Scalar::String)
            .build();
        post.define_field("id", Scalar::Id).unwrap();

        let names: Vec<String> = post.fields().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["title", "body", "id"]);
    }

    #[test]
    fn test_container_type_freezes_object() {
        let obj = Object::builder("MyObject").field("foo", Scalar::String).build();
        let container = obj.container_type();

        let err = obj.define_field("bar", Scalar::String).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Definition);
        assert!(matches!(err, TypeGraphError::Frozen { kind: "object", .. }));

        // Existing fields untouched, container never recreated
        assert_eq!(obj.field_count(), 1);
        assert!(obj.container_type().ptr_eq(&container));
    }

    #[test]
    fn test_frozen_rejects_resolver_registration() {
        let obj = Object::new("Query");
        obj.container_type();

        let err = obj
            .field(
                "hello",
                Signature::resolver().returns(Scalar::String),
                Resolver::sync(|_, _, _| Ok("hi".into())),
            )
            .unwrap_err();
        assert!(matches!(err, TypeGraphError::Frozen { .. }));
    }

    #[test]
    fn test_bad_signature_names_the_field() {
        let obj = Object::new("Query");
        let err = obj
            .field(
                "hello",
                Signature::resolver(),
                Resolver::sync(|_, _, _| Ok(Value::Null)),
            )
            .unwrap_err();

        match err {
            TypeGraphError::Signature { field, source } => {
                assert_eq!(field, "hello");
                assert_eq!(source, SignatureError::MissingReturnType);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(obj.field_count(), 0);
    }

    #[test]
    fn test_instances_belong_to_their_object() {
        let my_object = Object::builder("MyObject").field("foo", Scalar::String).build();
        let value = my_object.instance([("foo", "A")]);

        assert!(my_object.container_type().is_instance(&value));
        assert_eq!(value.field("foo"), Some(&Value::from("A")));
    }

    #[test]
    fn test_handles_share_identity() {
        let a = Object::new("Foo");
        let b = Object::new("Foo");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_ne!(a.node_id(), b.node_id());
    }
}
