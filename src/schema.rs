//! The schema root.
//!
//! A [`Schema`] owns the three root Objects and any extra types that are
//! not reachable from them. It compiles on first use and keeps the result:
//! later calls return the very same [`CompiledSchema`].

use async_graphql::{Request, Response, Variables};
use futures::stream::BoxStream;
use futures::StreamExt;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::compile::{CompiledSchema, SchemaRoots};
use crate::config::CompilerConfig;
use crate::error::{Result, TypeGraphError};
use crate::types::{ContextValue, Object, TypeRef};

struct Roots {
    query: Object,
    mutation: Object,
    subscription: Object,
}

pub struct Schema {
    roots: RwLock<Roots>,
    types: Vec<TypeRef>,
    config: CompilerConfig,
    compiled: OnceCell<Arc<CompiledSchema>>,
}

impl Schema {
    /// A schema with empty `Query`, `Mutation` and `Subscription` roots.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn query(&self) -> Object {
        self.roots.read().query.clone()
    }

    pub fn mutation(&self) -> Object {
        self.roots.read().mutation.clone()
    }

    pub fn subscription(&self) -> Object {
        self.roots.read().subscription.clone()
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn set_query(&self, query: Object) -> Result<()> {
        self.ensure_not_compiled("query")?;
        self.roots.write().query = query;
        Ok(())
    }

    pub fn set_mutation(&self, mutation: Object) -> Result<()> {
        self.ensure_not_compiled("mutation")?;
        self.roots.write().mutation = mutation;
        Ok(())
    }

    pub fn set_subscription(&self, subscription: Object) -> Result<()> {
        self.ensure_not_compiled("subscription")?;
        self.roots.write().subscription = subscription;
        Ok(())
    }

    fn ensure_not_compiled(&self, root: &'static str) -> Result<()> {
        if self.compiled.get().is_some() {
            return Err(TypeGraphError::SchemaSealed(root));
        }
        Ok(())
    }

    /// Compile the schema, or return the result of the first compilation.
    pub fn compile(&self) -> Result<Arc<CompiledSchema>> {
        self.compiled
            .get_or_try_init(|| {
                let roots = self.roots.read();
                let compiled = CompiledSchema::build(
                    SchemaRoots {
                        query: &roots.query,
                        mutation: &roots.mutation,
                        subscription: &roots.subscription,
                        types: &self.types,
                    },
                    self.config.clone(),
                )?;
                Ok(Arc::new(compiled))
            })
            .cloned()
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    /// Execute a query without variables or context.
    pub async fn execute(&self, query: &str) -> Result<Response> {
        self.execute_with(query, None, None).await
    }

    /// Execute a query. `variables` is a JSON object; `context` is handed to
    /// every resolver through [`ResolveInfo::context`](crate::ResolveInfo::context).
    pub async fn execute_with(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
        context: Option<ContextValue>,
    ) -> Result<Response> {
        let compiled = self.compile()?;
        debug!(query = %query, "executing");
        Ok(compiled.execute(request(query, variables, context)).await)
    }

    /// Start a subscription; each item of the stream is one response.
    pub fn subscribe(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
        context: Option<ContextValue>,
    ) -> Result<BoxStream<'static, Response>> {
        let compiled = self.compile()?;
        debug!(query = %query, "subscribing");
        Ok(compiled
            .execute_stream(request(query, variables, context))
            .boxed())
    }

    /// Schema definition language of the compiled schema.
    pub fn sdl(&self) -> Result<String> {
        Ok(self.compile()?.sdl())
    }
}

fn request(query: &str, variables: Option<serde_json::Value>, context: Option<ContextValue>) -> Request {
    let mut request = Request::new(query);
    if let Some(variables) = variables {
        request = request.variables(Variables::from_json(variables));
    }
    if let Some(context) = context {
        request = request.data(context);
    }
    request
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roots = self.roots.read();
        f.debug_struct("Schema")
            .field("query", &roots.query)
            .field("mutation", &roots.mutation)
            .field("subscription", &roots.subscription)
            .field("types", &self.types)
            .field("compiled", &self.is_compiled())
            .finish()
    }
}

#[derive(Default)]
pub struct SchemaBuilder {
    query: Option<Object>,
    mutation: Option<Object>,
    subscription: Option<Object>,
    types: Vec<TypeRef>,
    config: CompilerConfig,
}

impl SchemaBuilder {
    pub fn query(mut self, query: &Object) -> Self {
        self.query = Some(query.clone());
        self
    }

    pub fn mutation(mut self, mutation: &Object) -> Self {
        self.mutation = Some(mutation.clone());
        self
    }

    pub fn subscription(mut self, subscription: &Object) -> Self {
        self.subscription = Some(subscription.clone());
        self
    }

    /// Register a type that no root field reaches, e.g. an interface
    /// implementer only ever returned through the interface.
    pub fn register(mut self, ty: impl Into<TypeRef>) -> Self {
        self.types.push(ty.into());
        self
    }

    pub fn config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            roots: RwLock::new(Roots {
                query: self.query.unwrap_or_else(|| Object::new("Query")),
                mutation: self.mutation.unwrap_or_else(|| Object::new("Mutation")),
                subscription: self
                    .subscription
                    .unwrap_or_else(|| Object::new("Subscription")),
            }),
            types: self.types,
            config: self.config,
            compiled: OnceCell::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalars::Scalar;
    use crate::types::Field;

    #[test]
    fn test_default_roots_exist() {
        let schema = Schema::new();
        assert_eq!(schema.query().name(), "Query");
        assert_eq!(schema.mutation().name(), "Mutation");
        assert_eq!(schema.subscription().name(), "Subscription");
    }

    #[test]
    fn test_compile_is_memoized() {
        let schema = Schema::new();
        schema
            .query()
            .define_field("hello", Field::new(Scalar::String))
            .unwrap();

        let first = schema.compile().unwrap();
        let second = schema.compile().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.query_type(), "Query");
        assert_eq!(first.mutation_type(), None);
    }

    #[test]
    fn test_roots_locked_after_compile() {
        let schema = Schema::new();
        schema.query().define_field("hello", Scalar::String).unwrap();
        schema.set_mutation(Object::new("OtherMutation")).unwrap();
        schema.compile().unwrap();

        let err = schema.set_query(Object::new("Other")).unwrap_err();
        assert!(matches!(err, TypeGraphError::SchemaSealed("query")));
        assert!(schema.query().is_sealed());
    }
}
