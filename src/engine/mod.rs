//! Lowering of the compiled registry onto `async_graphql::dynamic`.
//!
//! Each compiled field becomes an engine field whose resolver translates
//! argument names back to internal ones, calls the user resolver (or reads
//! the member from the parent) and completes the result against the
//! declared type.

mod convert;

use async_graphql::dynamic::{
    self, FieldFuture, FieldValue, InputValue, InterfaceField, ResolverContext, SubscriptionField,
    SubscriptionFieldFuture,
};
use async_graphql_value::Value as AstValue;
use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::compile::{
    CompiledArgument, CompiledField, CompiledInputObject, CompiledObject, CompiledType,
    CompiledTypeRef, Registry,
};
use crate::error::{Result, TypeGraphError};
use crate::mangle::Arguments;
use crate::types::{default_resolve, ContextValue, ResolveInfo, Resolver};
use crate::value::{Value, NULL};

use convert::{coerce, complete, to_const};

/// Build the engine schema for a compiled registry.
pub(crate) fn build(registry: &Arc<Registry>) -> Result<dynamic::Schema> {
    let mut builder = dynamic::Schema::build(
        &registry.query,
        registry.mutation.as_deref(),
        registry.subscription.as_deref(),
    );

    for ty in registry.types.values() {
        builder = match ty {
            CompiledType::Object(object) if Some(&object.name) == registry.subscription.as_ref() => {
                builder.register(lower_subscription(registry, object))
            }
            CompiledType::Object(object) => builder.register(lower_object(registry, object)?),
            CompiledType::Interface(interface) => {
                let mut lowered = dynamic::Interface::new(&interface.name);
                if let Some(description) = &interface.description {
                    lowered = lowered.description(description);
                }
                for field in interface.fields.values() {
                    lowered = lowered.field(lower_interface_field(field));
                }
                builder.register(lowered)
            }
            CompiledType::Union(union) => {
                let mut lowered = dynamic::Union::new(&union.name);
                if let Some(description) = &union.description {
                    lowered = lowered.description(description);
                }
                for member in &union.members {
                    lowered = lowered.possible_type(member);
                }
                builder.register(lowered)
            }
            CompiledType::InputObject(input) => builder.register(lower_input_object(input)),
            CompiledType::Enum(compiled) => {
                let mut lowered = dynamic::Enum::new(&compiled.name);
                if let Some(description) = &compiled.description {
                    lowered = lowered.description(description);
                }
                for (_, value) in compiled.enum_type.members() {
                    lowered = lowered.item(dynamic::EnumItem::new(value));
                }
                builder.register(lowered)
            }
            CompiledType::Scalar(scalar) if scalar.is_builtin() => builder,
            CompiledType::Scalar(scalar) => builder.register(scalar.to_engine()),
        };
    }

    let config = &registry.config;
    if let Some(depth) = config.limit_depth {
        builder = builder.limit_depth(depth);
    }
    if let Some(complexity) = config.limit_complexity {
        builder = builder.limit_complexity(complexity);
    }
    if !config.introspection {
        builder = builder.disable_introspection();
    }

    let schema = builder
        .finish()
        .map_err(|e| TypeGraphError::Engine(e.to_string()))?;
    info!(types = registry.types.len(), "engine schema built");
    Ok(schema)
}

fn lower_object(registry: &Arc<Registry>, object: &CompiledObject) -> Result<dynamic::Object> {
    let mut lowered = dynamic::Object::new(&object.name);
    if let Some(description) = &object.description {
        lowered = lowered.description(description);
    }
    for interface in &object.interfaces {
        lowered = lowered.implement(interface);
    }
    for field in object.fields.values() {
        if matches!(field.resolver, Some(Resolver::Stream(_))) {
            return Err(TypeGraphError::TypeMapping(format!(
                "field '{}.{}' has a stream resolver but is not a subscription root field",
                object.name, field.external
            )));
        }
        lowered = lowered.field(lower_field(registry, field));
    }
    Ok(lowered)
}

fn lower_field(registry: &Arc<Registry>, field: &Arc<CompiledField>) -> dynamic::Field {
    let registry_for_resolver = registry.clone();
    let field_for_resolver = field.clone();
    let mut lowered = dynamic::Field::new(
        field.external.to_string(),
        field.ty.to_engine(),
        move |ctx| {
            let registry = registry_for_resolver.clone();
            let field = field_for_resolver.clone();
            FieldFuture::new(async move {
                let value = invoke(&registry, &field, &ctx).await?;
                complete(&registry, &field.ty, value)
            })
        },
    );
    if let Some(description) = &field.description {
        lowered = lowered.description(description);
    }
    if let Some(reason) = &field.deprecation {
        lowered = lowered.deprecation(Some(reason.as_str()));
    }
    for argument in lower_arguments(field) {
        lowered = lowered.argument(argument);
    }
    lowered
}

fn lower_interface_field(field: &CompiledField) -> InterfaceField {
    let mut lowered = InterfaceField::new(field.external.to_string(), field.ty.to_engine());
    if let Some(description) = &field.description {
        lowered = lowered.description(description);
    }
    if let Some(reason) = &field.deprecation {
        lowered = lowered.deprecation(Some(reason.as_str()));
    }
    for argument in lower_arguments(field) {
        lowered = lowered.argument(argument);
    }
    lowered
}

/// Argument defaults stay on the compiled field so the resolver can tell an
/// omitted argument from a supplied one. The engine only learns a default
/// when the argument is non-null, since it would reject the omission
/// otherwise.
fn lower_arguments(field: &CompiledField) -> Vec<InputValue> {
    field
        .arguments
        .iter()
        .map(|(external, argument)| lower_argument(external, argument))
        .collect()
}

fn lower_argument(external: &str, argument: &CompiledArgument) -> InputValue {
    let mut lowered = InputValue::new(external, argument.ty.to_engine());
    if let Some(description) = &argument.description {
        lowered = lowered.description(description);
    }
    if let (Some(default), CompiledTypeRef::NonNull(_)) = (&argument.default, &argument.ty) {
        lowered = lowered.default_value(to_const(default));
    }
    lowered
}

fn lower_input_object(input: &CompiledInputObject) -> dynamic::InputObject {
    let mut lowered = dynamic::InputObject::new(&input.name);
    if let Some(description) = &input.description {
        lowered = lowered.description(description);
    }
    for (external, field) in &input.fields {
        let mut value = InputValue::new(external, field.ty.to_engine());
        if let Some(description) = &field.description {
            value = value.description(description);
        }
        if let Some(default) = &field.default {
            value = value.default_value(to_const(default));
        }
        lowered = lowered.field(value);
    }
    lowered
}

fn lower_subscription(registry: &Arc<Registry>, object: &CompiledObject) -> dynamic::Subscription {
    let mut lowered = dynamic::Subscription::new(&object.name);
    if let Some(description) = &object.description {
        lowered = lowered.description(description);
    }
    for field in object.fields.values() {
        let registry_for_resolver = registry.clone();
        let field_for_resolver = field.clone();
        let mut subscription_field = SubscriptionField::new(
            field.external.to_string(),
            field.ty.to_engine(),
            move |ctx| {
                let registry = registry_for_resolver.clone();
                let field = field_for_resolver.clone();
                SubscriptionFieldFuture::new(async move {
                    let (parent, info, args) = prepare(&registry, &field, &ctx)?;
                    let items = match &field.resolver {
                        Some(Resolver::Stream(f)) => f(parent, info, args),
                        Some(Resolver::Sync(f)) => stream::once(std::future::ready(f(
                            &parent, &info, &args,
                        )))
                        .boxed(),
                        Some(Resolver::Future(f)) => stream::once(f(parent, info, args)).boxed(),
                        None => {
                            let value = default_resolve(&parent, &field.name);
                            stream::once(std::future::ready(Ok(value))).boxed()
                        }
                    };
                    debug!(field = %field.external, "subscription started");
                    Ok(items.map(move |item| {
                        item.map_err(resolver_error).and_then(|value| {
                            complete(&registry, &field.ty, value)
                                .map(|completed| completed.unwrap_or(FieldValue::NULL))
                        })
                    }))
                })
            },
        );
        if let Some(description) = &field.description {
            subscription_field = subscription_field.description(description);
        }
        if let Some(reason) = &field.deprecation {
            subscription_field = subscription_field.deprecation(Some(reason.as_str()));
        }
        for argument in lower_arguments(field) {
            subscription_field = subscription_field.argument(argument);
        }
        lowered = lowered.field(subscription_field);
    }
    lowered
}

/// Parent value, resolve info and internally named arguments of one call.
fn prepare(
    registry: &Registry,
    field: &CompiledField,
    ctx: &ResolverContext<'_>,
) -> async_graphql::Result<(Value, ResolveInfo, Arguments)> {
    let parent = ctx
        .parent_value
        .try_downcast_ref::<Value>()
        .unwrap_or(&NULL)
        .clone();
    let info = resolve_info(field, ctx);
    let args = arguments(registry, field, ctx)?;
    Ok((parent, info, args))
}

fn resolve_info(field: &CompiledField, ctx: &ResolverContext<'_>) -> ResolveInfo {
    ResolveInfo::new(
        field.name.clone(),
        field.external.clone(),
        field.parent.clone(),
        ctx.data_opt::<ContextValue>().cloned(),
    )
}

/// Supplied arguments only, re-keyed by internal name.
fn arguments(
    registry: &Registry,
    field: &CompiledField,
    ctx: &ResolverContext<'_>,
) -> async_graphql::Result<Arguments> {
    let mut supplied = IndexMap::with_capacity(field.arguments.len());
    for (name, accessor) in ctx.args.iter() {
        let Some(argument) = field.arguments.get(name.as_str()) else {
            continue;
        };
        if bound_to_missing_variable(ctx, name.as_str()) {
            continue;
        }
        let value = coerce(registry, &argument.ty, accessor.as_value())
            .map_err(async_graphql::Error::new)?;
        supplied.insert(argument.internal.clone(), value);
    }
    trace!(
        field = %field.external,
        supplied = supplied.len(),
        declared = field.argument_names.len(),
        "arguments translated"
    );
    Ok(Arguments::new(supplied, field.defaults.clone()))
}

/// The engine hands a nullable variable the request left out to the resolver
/// as null. Without a variable default that counts as an omitted argument.
fn bound_to_missing_variable(ctx: &ResolverContext<'_>, external: &str) -> bool {
    let Some(argument) = ctx.ctx.item.node.get_argument(external) else {
        return false;
    };
    let AstValue::Variable(variable) = &argument.node else {
        return false;
    };
    let query_env = ctx.ctx.query_env;
    if query_env.variables.contains_key(variable) {
        return false;
    }
    query_env
        .operation
        .node
        .variable_definitions
        .iter()
        .find(|definition| &definition.node.name.node == variable)
        .map_or(true, |definition| definition.node.default_value.is_none())
}

/// Run the field's resolver, or the default one.
async fn invoke(
    registry: &Registry,
    field: &CompiledField,
    ctx: &ResolverContext<'_>,
) -> async_graphql::Result<Value> {
    match &field.resolver {
        None => {
            let parent = ctx.parent_value.try_downcast_ref::<Value>().unwrap_or(&NULL);
            Ok(default_resolve(parent, &field.name))
        }
        Some(Resolver::Sync(f)) => {
            let parent = ctx.parent_value.try_downcast_ref::<Value>().unwrap_or(&NULL);
            let info = resolve_info(field, ctx);
            let args = arguments(registry, field, ctx)?;
            f(parent, &info, &args).map_err(resolver_error)
        }
        Some(Resolver::Future(f)) => {
            let (parent, info, args) = prepare(registry, field, ctx)?;
            f(parent, info, args).await.map_err(resolver_error)
        }
        Some(Resolver::Stream(_)) => Err(async_graphql::Error::new(format!(
            "field '{}' streams values and can only be subscribed to",
            field.external
        ))),
    }
}

fn resolver_error(err: anyhow::Error) -> async_graphql::Error {
    debug!(error = %err, "resolver failed");
    async_graphql::Error::new(err.to_string())
}
