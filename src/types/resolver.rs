//! Resolver callables and the per-call information handed to them.

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::mangle::Arguments;
use crate::value::Value;

pub type SyncResolveFn =
    dyn Fn(&Value, &ResolveInfo, &Arguments) -> anyhow::Result<Value> + Send + Sync;

pub type FutureResolveFn = dyn Fn(Value, ResolveInfo, Arguments) -> BoxFuture<'static, anyhow::Result<Value>>
    + Send
    + Sync;

pub type StreamResolveFn = dyn Fn(Value, ResolveInfo, Arguments) -> BoxStream<'static, anyhow::Result<Value>>
    + Send
    + Sync;

/// A field resolver. Opaque to the compiler; the engine decides how it runs.
#[derive(Clone)]
pub enum Resolver {
    Sync(Arc<SyncResolveFn>),
    Future(Arc<FutureResolveFn>),
    /// Produces a sequence of values; used by subscription root fields.
    Stream(Arc<StreamResolveFn>),
}

impl Resolver {
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&Value, &ResolveInfo, &Arguments) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Resolver::Sync(Arc::new(f))
    }

    pub fn future<F>(f: F) -> Self
    where
        F: Fn(Value, ResolveInfo, Arguments) -> BoxFuture<'static, anyhow::Result<Value>>
            + Send
            + Sync
            + 'static,
    {
        Resolver::Future(Arc::new(f))
    }

    pub fn stream<F>(f: F) -> Self
    where
        F: Fn(Value, ResolveInfo, Arguments) -> BoxStream<'static, anyhow::Result<Value>>
            + Send
            + Sync
            + 'static,
    {
        Resolver::Stream(Arc::new(f))
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Resolver::Stream(_))
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Resolver::Sync(_) => "sync",
            Resolver::Future(_) => "future",
            Resolver::Stream(_) => "stream",
        };
        write!(f, "Resolver({})", kind)
    }
}

/// Caller-supplied value made available to every resolver of one request.
#[derive(Clone)]
pub struct ContextValue(Arc<dyn Any + Send + Sync>);

impl ContextValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContextValue(..)")
    }
}

/// Execution details for one resolver call.
#[derive(Debug, Clone)]
pub struct ResolveInfo {
    field_name: Arc<str>,
    external_name: Arc<str>,
    parent_type: Arc<str>,
    context: Option<ContextValue>,
}

impl ResolveInfo {
    pub(crate) fn new(
        field_name: Arc<str>,
        external_name: Arc<str>,
        parent_type: Arc<str>,
        context: Option<ContextValue>,
    ) -> Self {
        Self {
            field_name,
            external_name,
            parent_type,
            context,
        }
    }

    /// Internal (declared) name of the field being resolved.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Name of the field on the wire.
    pub fn external_name(&self) -> &str {
        &self.external_name
    }

    pub fn parent_type(&self) -> &str {
        &self.parent_type
    }

    /// The request context, if one of type `T` was supplied.
    pub fn context<T: Any>(&self) -> Option<&T> {
        self.context.as_ref()?.downcast_ref::<T>()
    }
}

/// Resolver used for fields declared without one: read the field's
/// internal name from the parent, `Null` when absent.
pub(crate) fn default_resolve(parent: &Value, field_name: &str) -> Value {
    parent.field(field_name).cloned().unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolve_reads_member() {
        let parent = Value::record([("title", "One")]);
        assert_eq!(default_resolve(&parent, "title"), Value::from("One"));
        assert_eq!(default_resolve(&parent, "body"), Value::Null);
        assert_eq!(default_resolve(&Value::Null, "title"), Value::Null);
    }

    #[test]
    fn test_context_downcast() {
        let info = ResolveInfo::new(
            "hello".into(),
            "hello".into(),
            "Query".into(),
            Some(ContextValue::new(42u32)),
        );
        assert_eq!(info.context::<u32>(), Some(&42));
        assert_eq!(info.context::<String>(), None);
    }
}
