//! Declared types: the closed set of things a field, argument or input field
//! can be typed as.

use async_graphql::dynamic;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use std::fmt;

use super::{Enum, InputObject, Interface, Object, Union};
use crate::scalars::Scalar;

#[derive(Clone)]
pub enum TypeRef {
    Object(Object),
    Interface(Interface),
    InputObject(InputObject),
    Union(Union),
    Enum(Enum),
    NonNull(Box<TypeRef>),
    List(Box<TypeRef>),
    Scalar(Scalar),
    /// A type the engine already knows; passed through unchanged.
    Native(dynamic::TypeRef),
}

impl TypeRef {
    /// Wrap `inner` as non-null. Already non-null types are returned as is.
    pub fn non_null(inner: impl Into<TypeRef>) -> Self {
        match inner.into() {
            non_null @ TypeRef::NonNull(_) => non_null,
            inner => TypeRef::NonNull(Box::new(inner)),
        }
    }

    pub fn list(inner: impl Into<TypeRef>) -> Self {
        TypeRef::List(Box::new(inner.into()))
    }

    /// Reference an engine-native named type.
    pub fn native(name: impl Into<String>) -> Self {
        TypeRef::Native(dynamic::TypeRef::named(name.into()))
    }

    /// Declared type of a Rust value type.
    pub fn of<T: TypeOf>() -> Self {
        T::type_ref()
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Object(o) => f.write_str(o.name()),
            TypeRef::Interface(i) => f.write_str(i.name()),
            TypeRef::InputObject(i) => f.write_str(i.name()),
            TypeRef::Union(u) => f.write_str(u.name()),
            TypeRef::Enum(e) => f.write_str(e.name()),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::Scalar(s) => f.write_str(s.name()),
            TypeRef::Native(t) => write!(f, "{}", t),
        }
    }
}

impl From<Scalar> for TypeRef {
    fn from(s: Scalar) -> Self {
        TypeRef::Scalar(s)
    }
}

impl From<dynamic::TypeRef> for TypeRef {
    fn from(t: dynamic::TypeRef) -> Self {
        TypeRef::Native(t)
    }
}

macro_rules! node_type_ref {
    ($($node:ident),*) => {
        $(
            impl From<$node> for TypeRef {
                fn from(node: $node) -> Self {
                    TypeRef::$node(node)
                }
            }

            impl From<&$node> for TypeRef {
                fn from(node: &$node) -> Self {
                    TypeRef::$node(node.clone())
                }
            }
        )*
    };
}

node_type_ref!(Object, Interface, InputObject, Union, Enum);

/// Maps Rust value types onto declared types. `Vec<T>` becomes a list of
/// `T`; everything else maps through the scalar table.
pub trait TypeOf {
    fn type_ref() -> TypeRef;
}

macro_rules! scalar_type_of {
    ($($ty:ty => $scalar:ident),* $(,)?) => {
        $(
            impl TypeOf for $ty {
                fn type_ref() -> TypeRef {
                    TypeRef::Scalar(Scalar::$scalar)
                }
            }
        )*
    };
}

scalar_type_of!(
    String => String,
    &str => String,
    bool => Boolean,
    i32 => Int,
    i64 => Int,
    f64 => Float,
    NaiveDate => Date,
    DateTime<FixedOffset> => DateTime,
    NaiveTime => Time,
);

impl<T: TypeOf> TypeOf for Vec<T> {
    fn type_ref() -> TypeRef {
        TypeRef::list(T::type_ref())
    }
}
