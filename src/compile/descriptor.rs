//! Compiled, immutable descriptors.
//!
//! Types refer to each other by name through [`CompiledTypeRef`], which is
//! what lets mutually recursive Objects compile to a finite structure.

use async_graphql::dynamic;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::config::Discrimination;
use crate::container::{default_is_type_of, ContainerType};
use crate::mangle::NameMap;
use crate::scalars::Scalar;
use crate::types::{Enum, IsTypeOf, ResolveType, Resolver};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledTypeRef {
    Named(String),
    NonNull(Box<CompiledTypeRef>),
    List(Box<CompiledTypeRef>),
}

impl CompiledTypeRef {
    pub(crate) fn to_engine(&self) -> dynamic::TypeRef {
        match self {
            CompiledTypeRef::Named(name) => dynamic::TypeRef::named(name.clone()),
            CompiledTypeRef::NonNull(inner) => dynamic::TypeRef::NonNull(Box::new(inner.to_engine())),
            CompiledTypeRef::List(inner) => dynamic::TypeRef::List(Box::new(inner.to_engine())),
        }
    }

    pub(crate) fn from_engine(ty: &dynamic::TypeRef) -> Self {
        match ty {
            dynamic::TypeRef::Named(name) => CompiledTypeRef::Named(name.to_string()),
            dynamic::TypeRef::NonNull(inner) => {
                CompiledTypeRef::NonNull(Box::new(Self::from_engine(inner)))
            }
            dynamic::TypeRef::List(inner) => CompiledTypeRef::List(Box::new(Self::from_engine(inner))),
        }
    }

    /// The named type under all wrappers.
    pub fn base_name(&self) -> &str {
        match self {
            CompiledTypeRef::Named(name) => name,
            CompiledTypeRef::NonNull(inner) | CompiledTypeRef::List(inner) => inner.base_name(),
        }
    }
}

impl fmt::Display for CompiledTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompiledTypeRef::Named(name) => f.write_str(name),
            CompiledTypeRef::NonNull(inner) => write!(f, "{}!", inner),
            CompiledTypeRef::List(inner) => write!(f, "[{}]", inner),
        }
    }
}

pub enum CompiledType {
    Object(CompiledObject),
    Interface(CompiledInterface),
    Union(CompiledUnion),
    InputObject(CompiledInputObject),
    Enum(CompiledEnum),
    Scalar(Scalar),
}

impl CompiledType {
    pub fn name(&self) -> &str {
        match self {
            CompiledType::Object(o) => &o.name,
            CompiledType::Interface(i) => &i.name,
            CompiledType::Union(u) => &u.name,
            CompiledType::InputObject(i) => &i.name,
            CompiledType::Enum(e) => &e.name,
            CompiledType::Scalar(s) => s.name(),
        }
    }

    pub fn as_object(&self) -> Option<&CompiledObject> {
        match self {
            CompiledType::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&CompiledInterface> {
        match self {
            CompiledType::Interface(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_input_object(&self) -> Option<&CompiledInputObject> {
        match self {
            CompiledType::InputObject(i) => Some(i),
            _ => None,
        }
    }
}

/// Decides whether a runtime value belongs to an Object.
#[derive(Clone)]
pub enum Discriminator {
    Custom(IsTypeOf),
    Container {
        container: ContainerType,
        mode: Discrimination,
    },
}

impl Discriminator {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Discriminator::Custom(is_type_of) => is_type_of(value),
            Discriminator::Container { container, mode } => {
                default_is_type_of(container, value, *mode)
            }
        }
    }
}

pub struct CompiledObject {
    pub name: String,
    pub description: Option<String>,
    /// Keyed by external field name.
    pub fields: IndexMap<String, Arc<CompiledField>>,
    pub interfaces: Vec<String>,
    pub discriminator: Discriminator,
}

pub struct CompiledInterface {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, Arc<CompiledField>>,
    /// Objects implementing the interface, in compile order.
    pub implementers: Vec<String>,
    pub resolve_type: Option<ResolveType>,
}

pub struct CompiledUnion {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
    pub resolve_type: Option<ResolveType>,
}

pub struct CompiledInputObject {
    pub name: String,
    pub description: Option<String>,
    /// Keyed by external field name.
    pub fields: IndexMap<String, CompiledInputField>,
    pub container: ContainerType,
}

pub struct CompiledInputField {
    pub internal: String,
    pub ty: CompiledTypeRef,
    pub default: Option<Value>,
    pub description: Option<String>,
}

pub struct CompiledEnum {
    pub name: String,
    pub description: Option<String>,
    pub enum_type: Enum,
}

pub struct CompiledField {
    /// Internal name; what the default resolver reads from the parent.
    pub name: Arc<str>,
    pub external: Arc<str>,
    pub parent: Arc<str>,
    pub ty: CompiledTypeRef,
    /// Keyed by external argument name.
    pub arguments: IndexMap<String, CompiledArgument>,
    pub argument_names: NameMap,
    /// Declared defaults, keyed by internal argument name.
    pub defaults: Arc<IndexMap<String, Value>>,
    pub resolver: Option<Resolver>,
    pub description: Option<String>,
    pub deprecation: Option<String>,
}

/// `default` is applied when the resolver reads an omitted argument. Only
/// non-null arguments pass it on to the engine, so introspection and SDL do
/// not advertise defaults of nullable arguments.
pub struct CompiledArgument {
    pub internal: String,
    pub ty: CompiledTypeRef,
    pub default: Option<Value>,
    pub description: Option<String>,
}
