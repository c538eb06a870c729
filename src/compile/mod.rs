//! The compiler: builder graph in, immutable registry out.
//!
//! Compilation walks the graph from the roots. Every Object, Interface,
//! Union, InputObject and Enum is compiled once per run, keyed by node
//! identity; a node's name is recorded before its fields are visited so a
//! reference back to it (directly or through other types) resolves to that
//! name instead of recursing.

mod descriptor;

pub use descriptor::{
    CompiledArgument, CompiledEnum, CompiledField, CompiledInputField, CompiledInputObject,
    CompiledInterface, CompiledObject, CompiledType, CompiledTypeRef, CompiledUnion,
    Discriminator,
};

use async_graphql::dynamic;
use async_graphql::{Request, Response};
use futures::Stream;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::config::CompilerConfig;
use crate::engine;
use crate::error::{Result, TypeGraphError};
use crate::mangle::{to_camel_case, NameMap};
use crate::scalars::Scalar;
use crate::types::{Enum, Field, InputObject, Interface, NodeId, Object, TypeRef, Union};

/// Where a type reference appears. Objects, Interfaces and Unions are
/// output-only; InputObjects are input-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Input,
    Output,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Input => f.write_str("input"),
            Position::Output => f.write_str("output"),
        }
    }
}

/// The result of one compilation: every named type, plus the roots.
pub struct Registry {
    pub(crate) types: IndexMap<String, CompiledType>,
    pub(crate) nodes: HashMap<NodeId, String>,
    pub(crate) query: String,
    pub(crate) mutation: Option<String>,
    pub(crate) subscription: Option<String>,
    pub(crate) config: CompilerConfig,
}

impl Registry {
    pub fn get(&self, name: &str) -> Option<&CompiledType> {
        self.types.get(name)
    }

    /// Compiled name of an Object node, if it took part in compilation.
    pub(crate) fn object_name(&self, object: &Object) -> Option<&str> {
        self.nodes.get(&object.node_id()).map(String::as_str)
    }
}

/// Roots and extra types handed to the compiler.
pub(crate) struct SchemaRoots<'a> {
    pub query: &'a Object,
    pub mutation: &'a Object,
    pub subscription: &'a Object,
    pub types: &'a [TypeRef],
}

/// Compilation state threaded through every recursive call.
struct CompileContext {
    config: CompilerConfig,
    types: IndexMap<String, CompiledType>,
    nodes: HashMap<NodeId, String>,
    /// Which node claimed each type name; `None` for scalars.
    claims: HashMap<String, Option<NodeId>>,
    cache_hits: usize,
}

impl CompileContext {
    fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            types: IndexMap::new(),
            nodes: HashMap::new(),
            claims: HashMap::new(),
            cache_hits: 0,
        }
    }

    /// Cached name of an already (or currently) compiling node.
    fn cached(&mut self, id: NodeId) -> Option<String> {
        let name = self.nodes.get(&id).cloned();
        if let Some(name) = &name {
            self.cache_hits += 1;
            trace!(type_name = %name, "compile cache hit");
        }
        name
    }

    /// Reserve `name` for `id`. Fails when another node already holds it.
    fn claim(&mut self, name: &str, id: Option<NodeId>) -> Result<()> {
        match self.claims.get(name) {
            Some(owner) if *owner != id => Err(TypeGraphError::DuplicateTypeName(name.to_string())),
            Some(_) => Ok(()),
            None => {
                self.claims.insert(name.to_string(), id);
                if let Some(id) = id {
                    self.nodes.insert(id, name.to_string());
                }
                Ok(())
            }
        }
    }

    fn compile_type_ref(&mut self, ty: &TypeRef, position: Position) -> Result<CompiledTypeRef> {
        let name = match ty {
            TypeRef::NonNull(inner) => {
                let inner = self.compile_type_ref(inner, position)?;
                if matches!(inner, CompiledTypeRef::NonNull(_)) {
                    return Err(TypeGraphError::TypeMapping(format!(
                        "NonNull cannot wrap the non-null type {}",
                        inner
                    )));
                }
                return Ok(CompiledTypeRef::NonNull(Box::new(inner)));
            }
            TypeRef::List(inner) => {
                let inner = self.compile_type_ref(inner, position)?;
                return Ok(CompiledTypeRef::List(Box::new(inner)));
            }
            TypeRef::Native(native) => return self.compile_native(native),
            TypeRef::Scalar(scalar) => self.compile_scalar(*scalar)?,
            TypeRef::Enum(e) => self.compile_enum(e)?,
            TypeRef::Object(o) => {
                self.expect_position(position, Position::Output, "Object", o.name())?;
                self.compile_object(o)?
            }
            TypeRef::Interface(i) => {
                self.expect_position(position, Position::Output, "Interface", i.name())?;
                self.compile_interface(i)?
            }
            TypeRef::Union(u) => {
                self.expect_position(position, Position::Output, "Union", u.name())?;
                self.compile_union(u)?
            }
            TypeRef::InputObject(i) => {
                self.expect_position(position, Position::Input, "InputObject", i.name())?;
                self.compile_input_object(i)?
            }
        };
        Ok(CompiledTypeRef::Named(name))
    }

    fn expect_position(
        &self,
        actual: Position,
        expected: Position,
        kind: &str,
        name: &str,
    ) -> Result<()> {
        if actual == expected {
            Ok(())
        } else {
            Err(TypeGraphError::TypeMapping(format!(
                "{} '{}' cannot be used as an {} type",
                kind, name, actual
            )))
        }
    }

    /// Engine-native references pass through. Built-in scalar names are
    /// registered so their values serialize like declared scalars.
    fn compile_native(&mut self, native: &dynamic::TypeRef) -> Result<CompiledTypeRef> {
        let compiled = CompiledTypeRef::from_engine(native);
        let builtin = [Scalar::String, Scalar::Int, Scalar::Float, Scalar::Boolean, Scalar::Id]
            .into_iter()
            .find(|s| s.name() == compiled.base_name());
        if let Some(scalar) = builtin {
            self.compile_scalar(scalar)?;
        }
        Ok(compiled)
    }

    fn compile_scalar(&mut self, scalar: Scalar) -> Result<String> {
        let name = scalar.name();
        if !self.types.contains_key(name) {
            self.claim(name, None)?;
            self.types.insert(name.to_string(), CompiledType::Scalar(scalar));
        }
        Ok(name.to_string())
    }

    fn compile_enum(&mut self, e: &Enum) -> Result<String> {
        if let Some(name) = self.cached(e.node_id()) {
            return Ok(name);
        }
        let name = e.name().to_string();
        self.claim(&name, Some(e.node_id()))?;

        for (member, value) in e.members() {
            if !is_graphql_name(value) {
                return Err(TypeGraphError::TypeMapping(format!(
                    "value '{}' of member '{}' in enum '{}' is not a valid GraphQL name",
                    value, member, name
                )));
            }
        }

        debug!(enum_type = %name, "compiled enum");
        self.types.insert(
            name.clone(),
            CompiledType::Enum(CompiledEnum {
                name: name.clone(),
                description: e.description().map(str::to_string),
                enum_type: e.clone(),
            }),
        );
        Ok(name)
    }

    fn compile_object(&mut self, object: &Object) -> Result<String> {
        if let Some(name) = self.cached(object.node_id()) {
            return Ok(name);
        }
        let name = to_camel_case(object.name());
        self.claim(&name, Some(object.node_id()))?;

        // Sealing happens here, before any field is visited.
        let container = object.container_type();
        let fields = self.compile_fields(&name, &object.fields())?;

        let mut interfaces = Vec::with_capacity(object.interfaces().len());
        for interface in object.interfaces() {
            interfaces.push(self.compile_interface(interface)?);
        }

        let discriminator = match object.is_type_of() {
            Some(is_type_of) => Discriminator::Custom(is_type_of.clone()),
            None => Discriminator::Container {
                container,
                mode: self.config.discrimination,
            },
        };

        debug!(object = %name, fields = fields.len(), "compiled object");
        self.types.insert(
            name.clone(),
            CompiledType::Object(CompiledObject {
                name: name.clone(),
                description: object.description().map(str::to_string),
                fields,
                interfaces,
                discriminator,
            }),
        );
        Ok(name)
    }

    fn compile_interface(&mut self, interface: &Interface) -> Result<String> {
        if let Some(name) = self.cached(interface.node_id()) {
            return Ok(name);
        }
        let name = interface.name().to_string();
        self.claim(&name, Some(interface.node_id()))?;
        interface.seal();

        let fields = self.compile_fields(&name, &interface.fields())?;

        debug!(interface = %name, fields = fields.len(), "compiled interface");
        self.types.insert(
            name.clone(),
            CompiledType::Interface(CompiledInterface {
                name: name.clone(),
                description: interface.description().map(str::to_string),
                fields,
                implementers: Vec::new(),
                resolve_type: interface.resolve_type().cloned(),
            }),
        );
        Ok(name)
    }

    fn compile_union(&mut self, union: &Union) -> Result<String> {
        if let Some(name) = self.cached(union.node_id()) {
            return Ok(name);
        }
        let name = union.name().to_string();
        self.claim(&name, Some(union.node_id()))?;

        if union.members().is_empty() {
            return Err(TypeGraphError::TypeMapping(format!(
                "union '{}' must have at least one member",
                name
            )));
        }
        let mut members = Vec::with_capacity(union.members().len());
        for member in union.members() {
            members.push(self.compile_object(member)?);
        }

        debug!(union = %name, members = members.len(), "compiled union");
        self.types.insert(
            name.clone(),
            CompiledType::Union(CompiledUnion {
                name: name.clone(),
                description: union.description().map(str::to_string),
                members,
                resolve_type: union.resolve_type().cloned(),
            }),
        );
        Ok(name)
    }

    fn compile_input_object(&mut self, input: &InputObject) -> Result<String> {
        if let Some(name) = self.cached(input.node_id()) {
            return Ok(name);
        }
        let name = input.name().to_string();
        self.claim(&name, Some(input.node_id()))?;

        let container = input.container_type();
        let declared = input.fields();
        let names = NameMap::build(&name, declared.iter().map(|(n, _)| n.as_str()))?;

        let mut fields = IndexMap::with_capacity(declared.len());
        for ((external, internal), (_, field)) in names.iter().zip(&declared) {
            let ty = self.compile_type_ref(field.ty(), Position::Input)?;
            fields.insert(
                external.to_string(),
                CompiledInputField {
                    internal: internal.to_string(),
                    ty,
                    default: field.default().cloned(),
                    description: field.description_text().map(str::to_string),
                },
            );
        }

        debug!(input_object = %name, fields = fields.len(), "compiled input object");
        self.types.insert(
            name.clone(),
            CompiledType::InputObject(CompiledInputObject {
                name: name.clone(),
                description: input.description().map(str::to_string),
                fields,
                container,
            }),
        );
        Ok(name)
    }

    fn compile_fields(
        &mut self,
        owner: &str,
        declared: &[(String, Field)],
    ) -> Result<IndexMap<String, Arc<CompiledField>>> {
        let names = NameMap::build(owner, declared.iter().map(|(n, _)| n.as_str()))?;
        let mut fields = IndexMap::with_capacity(declared.len());
        for ((external, internal), (_, field)) in names.iter().zip(declared) {
            let compiled = self.compile_field(owner, internal, external, field)?;
            fields.insert(external.to_string(), Arc::new(compiled));
        }
        Ok(fields)
    }

    fn compile_field(
        &mut self,
        owner: &str,
        internal: &str,
        external: &str,
        field: &Field,
    ) -> Result<CompiledField> {
        let ty = self.compile_type_ref(field.ty(), Position::Output)?;

        let owner_label = format!("{}.{}", owner, external);
        let argument_names =
            NameMap::build(&owner_label, field.arguments().keys().map(String::as_str))?;

        let mut arguments = IndexMap::with_capacity(field.arguments().len());
        let mut defaults = IndexMap::new();
        for ((arg_external, arg_internal), argument) in
            argument_names.iter().zip(field.arguments().values())
        {
            let arg_ty = self.compile_type_ref(argument.ty(), Position::Input)?;
            if let Some(default) = argument.default() {
                defaults.insert(arg_internal.to_string(), default.clone());
            }
            arguments.insert(
                arg_external.to_string(),
                CompiledArgument {
                    internal: arg_internal.to_string(),
                    ty: arg_ty,
                    default: argument.default().cloned(),
                    description: argument.description_text().map(str::to_string),
                },
            );
        }

        Ok(CompiledField {
            name: internal.into(),
            external: external.into(),
            parent: owner.into(),
            ty,
            arguments,
            argument_names,
            defaults: Arc::new(defaults),
            resolver: field.resolver_fn().cloned(),
            description: field.description_text().map(str::to_string),
            deprecation: field.deprecation_reason().map(str::to_string),
        })
    }

    /// Record each Object on the interfaces it implements.
    fn link_implementers(&mut self) {
        let links: Vec<(String, String)> = self
            .types
            .values()
            .filter_map(CompiledType::as_object)
            .flat_map(|o| o.interfaces.iter().map(move |i| (i.clone(), o.name.clone())))
            .collect();
        for (interface, object) in links {
            if let Some(CompiledType::Interface(compiled)) = self.types.get_mut(&interface) {
                compiled.implementers.push(object);
            }
        }
    }

    fn compile_extra_type(&mut self, ty: &TypeRef) -> Result<()> {
        let position = match ty {
            TypeRef::InputObject(_) => Position::Input,
            _ => Position::Output,
        };
        self.compile_type_ref(ty, position).map(|_| ())
    }

    /// Compile a non-query root, or skip it when it has no fields.
    fn compile_optional_root(&mut self, root: &Object, kind: &str) -> Result<Option<String>> {
        if root.field_count() == 0 {
            info!(root = kind, object = %root.name(), "skipping empty root");
            return Ok(None);
        }
        self.compile_object(root).map(Some)
    }
}

fn is_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// Compile the graph reachable from `roots` into a registry.
pub(crate) fn compile_registry(roots: SchemaRoots<'_>, config: CompilerConfig) -> Result<Registry> {
    info!(query = %roots.query.name(), "compiling schema");
    let mut ctx = CompileContext::new(config);

    if roots.query.field_count() == 0 {
        return Err(TypeGraphError::EmptyQueryRoot(roots.query.name().to_string()));
    }
    let query = ctx.compile_object(roots.query)?;
    let mutation = ctx.compile_optional_root(roots.mutation, "mutation")?;
    let subscription = ctx.compile_optional_root(roots.subscription, "subscription")?;
    for ty in roots.types {
        ctx.compile_extra_type(ty)?;
    }
    ctx.link_implementers();

    info!(
        types = ctx.types.len(),
        cache_hits = ctx.cache_hits,
        "schema compiled"
    );
    Ok(Registry {
        types: ctx.types,
        nodes: ctx.nodes,
        query,
        mutation,
        subscription,
        config: ctx.config,
    })
}

/// A compiled schema: the descriptor registry plus the engine schema
/// lowered from it. Immutable and cheap to share.
pub struct CompiledSchema {
    registry: Arc<Registry>,
    engine: dynamic::Schema,
}

impl CompiledSchema {
    pub(crate) fn build(roots: SchemaRoots<'_>, config: CompilerConfig) -> Result<Self> {
        let registry = Arc::new(compile_registry(roots, config)?);
        let engine = engine::build(&registry)?;
        Ok(Self { registry, engine })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn get(&self, name: &str) -> Option<&CompiledType> {
        self.registry.get(name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.registry.types.keys().map(String::as_str)
    }

    pub fn query_type(&self) -> &str {
        &self.registry.query
    }

    pub fn mutation_type(&self) -> Option<&str> {
        self.registry.mutation.as_deref()
    }

    pub fn subscription_type(&self) -> Option<&str> {
        self.registry.subscription.as_deref()
    }

    /// The engine schema, for callers that drive it directly.
    pub fn engine(&self) -> &dynamic::Schema {
        &self.engine
    }

    /// Schema definition language rendering.
    pub fn sdl(&self) -> String {
        self.engine.sdl()
    }

    pub async fn execute(&self, request: impl Into<Request>) -> Response {
        self.engine.execute(request.into()).await
    }

    pub fn execute_stream(
        &self,
        request: impl Into<Request>,
    ) -> impl Stream<Item = Response> + Send + Unpin {
        self.engine.execute_stream(request.into())
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("query", &self.registry.query)
            .field("mutation", &self.registry.mutation)
            .field("subscription", &self.registry.subscription)
            .field("types", &self.registry.types.len())
            .finish()
    }
}
