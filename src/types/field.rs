//! Field, argument and input-field descriptors.

use indexmap::IndexMap;
use std::fmt;

use super::resolver::Resolver;
use super::type_ref::TypeRef;
use super::{Enum, InputObject, Interface, Object, Union};
use crate::scalars::Scalar;
use crate::value::Value;

/// One member of an Object or Interface.
#[derive(Clone)]
pub struct Field {
    ty: TypeRef,
    arguments: IndexMap<String, Argument>,
    resolver: Option<Resolver>,
    description: Option<String>,
    deprecation: Option<String>,
}

impl Field {
    pub fn new(ty: impl Into<TypeRef>) -> Self {
        Self {
            ty: ty.into(),
            arguments: IndexMap::new(),
            resolver: None,
            description: None,
            deprecation: None,
        }
    }

    pub fn argument(mut self, name: impl Into<String>, argument: Argument) -> Self {
        self.arguments.insert(name.into(), argument);
        self
    }

    pub fn resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecation(mut self, reason: impl Into<String>) -> Self {
        self.deprecation = Some(reason.into());
        self
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn arguments(&self) -> &IndexMap<String, Argument> {
        &self.arguments
    }

    /// `None` means the default resolver (read the member from the parent).
    pub fn resolver_fn(&self) -> Option<&Resolver> {
        self.resolver.as_ref()
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn deprecation_reason(&self) -> Option<&str> {
        self.deprecation.as_deref()
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("ty", &self.ty)
            .field("arguments", &self.arguments)
            .field("resolver", &self.resolver)
            .finish()
    }
}


/// A resolver parameter exposed on the wire.
#[derive(Debug, Clone)]
pub struct Argument {
    ty: TypeRef,
    default: Option<Value>,
    description: Option<String>,
}

impl Argument {
    pub fn new(ty: impl Into<TypeRef>) -> Self {
        Self {
            ty: ty.into(),
            default: None,
            description: None,
        }
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// One member of an InputObject.
#[derive(Debug, Clone)]
pub struct InputField {
    ty: TypeRef,
    default: Option<Value>,
    description: Option<String>,
}

impl InputField {
    pub fn new(ty: impl Into<TypeRef>) -> Self {
        Self {
            ty: ty.into(),
            default: None,
            description: None,
        }
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Anything usable as a declared type converts into a field of that type.
macro_rules! field_from_type {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Field {
                fn from(ty: $ty) -> Self {
                    Field::new(ty)
                }
            }

            impl From<$ty> for InputField {
                fn from(ty: $ty) -> Self {
                    InputField::new(ty)
                }
            }
        )*
    };
}

field_from_type!(
    TypeRef,
    Scalar,
    async_graphql::dynamic::TypeRef,
    Object,
    &Object,
    Interface,
    &Interface,
    InputObject,
    &InputObject,
    Union,
    &Union,
    Enum,
    &Enum,
);
