//! Builder nodes of the type graph.
//!
//! Nodes are shared handles: cloning an [`Object`] yields the same
//! definition, and node identity (not name) is what the compiler caches on.
//! Objects, Interfaces and InputObjects stay mutable until sealed.

mod enum_type;
mod field;
mod input_object;
mod interface;
mod lifecycle;
mod object;
mod resolver;
mod type_ref;
mod union;

use std::sync::Arc;

pub use enum_type::{Enum, EnumBuilder, EnumValue};
pub use field::{Argument, Field, InputField};
pub use input_object::{InputObject, InputObjectBuilder};
pub use interface::{Interface, InterfaceBuilder, ResolveType};
pub use object::{IsTypeOf, Object, ObjectBuilder};
pub use resolver::{ContextValue, ResolveInfo, Resolver};
pub use type_ref::{TypeOf, TypeRef};
pub use union::{Union, UnionBuilder};

pub(crate) use resolver::default_resolve;

/// Identity of a builder node, stable for the node's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn of<T>(node: &Arc<T>) -> Self {
        NodeId(Arc::as_ptr(node) as *const () as usize)
    }
}
