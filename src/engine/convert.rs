//! Value conversion at the engine boundary.
//!
//! `coerce` turns argument values supplied by the engine into [`Value`]s,
//! guided by the declared type. `complete` goes the other way for resolver
//! results and is where runtime discrimination happens.

use async_graphql::dynamic::FieldValue;
use async_graphql::{Error, Name, Number, Value as ConstValue};
use indexmap::IndexMap;

use crate::compile::{CompiledType, CompiledTypeRef, Registry};
use crate::value::Value;

/// Convert an engine value into a [`Value`] for a declared input type.
pub(crate) fn coerce(
    registry: &Registry,
    ty: &CompiledTypeRef,
    value: &ConstValue,
) -> Result<Value, String> {
    match ty {
        CompiledTypeRef::NonNull(inner) => coerce(registry, inner, value),
        _ if matches!(value, ConstValue::Null) => Ok(Value::Null),
        CompiledTypeRef::List(inner) => match value {
            ConstValue::List(items) => items
                .iter()
                .map(|item| coerce(registry, inner, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            single => Ok(Value::List(vec![coerce(registry, inner, single)?])),
        },
        CompiledTypeRef::Named(name) => match registry.get(name) {
            Some(CompiledType::Scalar(scalar)) => scalar.parse(value),
            Some(CompiledType::Enum(compiled)) => {
                let external = match value {
                    ConstValue::Enum(name) => name.as_str(),
                    ConstValue::String(s) => s.as_str(),
                    other => return Err(format!("{} is not a valid {}", other, compiled.name)),
                };
                compiled
                    .enum_type
                    .from_external(external)
                    .map(Value::Enum)
                    .ok_or_else(|| format!("'{}' is not a valid {}", external, compiled.name))
            }
            Some(CompiledType::InputObject(compiled)) => {
                let ConstValue::Object(supplied) = value else {
                    return Err(format!("Expected an object for '{}', got: {}", compiled.name, value));
                };
                let mut values = IndexMap::with_capacity(compiled.fields.len());
                for (external, field) in &compiled.fields {
                    match supplied.get(external.as_str()) {
                        Some(v) => {
                            values.insert(field.internal.clone(), coerce(registry, &field.ty, v)?);
                        }
                        None => {
                            if let Some(default) = &field.default {
                                values.insert(field.internal.clone(), default.clone());
                            }
                        }
                    }
                }
                Ok(Value::Instance(compiled.container.instantiate(values)))
            }
            _ => Ok(from_const(value)),
        },
    }
}

/// Untyped conversion, used for engine-native types.
fn from_const(value: &ConstValue) -> Value {
    match value {
        ConstValue::Null | ConstValue::Binary(_) => Value::Null,
        ConstValue::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .or_else(|| n.as_f64().map(Value::Float))
            .unwrap_or(Value::Null),
        ConstValue::String(s) => Value::String(s.clone()),
        ConstValue::Boolean(b) => Value::Boolean(*b),
        ConstValue::Enum(name) => Value::String(name.to_string()),
        ConstValue::List(items) => Value::List(items.iter().map(from_const).collect()),
        ConstValue::Object(map) => Value::Record(
            map.iter()
                .map(|(k, v)| (k.to_string(), from_const(v)))
                .collect(),
        ),
    }
}

/// Untyped conversion of a [`Value`] into an engine value.
pub(crate) fn to_const(value: &Value) -> ConstValue {
    match value {
        Value::Null => ConstValue::Null,
        Value::Boolean(b) => ConstValue::Boolean(*b),
        Value::Int(i) => ConstValue::Number(Number::from(*i)),
        Value::Float(f) => Number::from_f64(*f).map_or(ConstValue::Null, ConstValue::Number),
        Value::Enum(e) => ConstValue::Enum(Name::new(e.value())),
        Value::List(items) => ConstValue::List(items.iter().map(to_const).collect()),
        Value::Instance(instance) => ConstValue::Object(
            instance
                .iter()
                .map(|(k, v)| (Name::new(k), to_const(v)))
                .collect(),
        ),
        Value::Record(map) => ConstValue::Object(
            map.iter()
                .map(|(k, v)| (Name::new(k), to_const(v)))
                .collect(),
        ),
        Value::String(_) | Value::Date(_) | Value::DateTime(_) | Value::Time(_) => {
            ConstValue::from_json(value.to_json()).unwrap_or(ConstValue::Null)
        }
    }
}

/// Complete a resolved value against its declared output type.
pub(crate) fn complete<'a>(
    registry: &Registry,
    ty: &CompiledTypeRef,
    value: Value,
) -> async_graphql::Result<Option<FieldValue<'a>>> {
    match ty {
        // Null under NonNull is reported by the engine.
        CompiledTypeRef::NonNull(inner) => complete(registry, inner, value),
        _ if value.is_null() => Ok(None),
        CompiledTypeRef::List(inner) => {
            let Value::List(items) = value else {
                return Err(Error::new(format!(
                    "Expected a list for type {} but got: {}.",
                    ty, value
                )));
            };
            let mut completed = Vec::with_capacity(items.len());
            for item in items {
                completed.push(complete(registry, inner, item)?.unwrap_or(FieldValue::NULL));
            }
            Ok(Some(FieldValue::list(completed)))
        }
        CompiledTypeRef::Named(name) => complete_named(registry, name, value),
    }
}

fn complete_named<'a>(
    registry: &Registry,
    name: &str,
    value: Value,
) -> async_graphql::Result<Option<FieldValue<'a>>> {
    match registry.get(name) {
        Some(CompiledType::Scalar(scalar)) => scalar
            .serialize(&value)
            .map(|v| Some(FieldValue::value(v)))
            .map_err(Error::new),
        Some(CompiledType::Enum(compiled)) => match &value {
            Value::Enum(member) if *member.enum_type() == compiled.enum_type => Ok(Some(
                FieldValue::value(ConstValue::Enum(Name::new(member.value()))),
            )),
            _ => Err(Error::new(format!(
                "Enum '{}' cannot represent value: {}",
                compiled.name, value
            ))),
        },
        Some(CompiledType::Object(object)) => {
            if object.discriminator.accepts(&value) {
                Ok(Some(FieldValue::owned_any(value)))
            } else {
                Err(Error::new(format!(
                    "Expected value of type '{}' but got: {}.",
                    object.name, value
                )))
            }
        }
        Some(CompiledType::Interface(interface)) => {
            let object = resolve_abstract(
                registry,
                &interface.name,
                interface.resolve_type.as_ref(),
                &interface.implementers,
                &value,
            )?;
            Ok(Some(FieldValue::owned_any(value).with_type(object)))
        }
        Some(CompiledType::Union(union)) => {
            let object = resolve_abstract(
                registry,
                &union.name,
                union.resolve_type.as_ref(),
                &union.members,
                &value,
            )?;
            Ok(Some(FieldValue::owned_any(value).with_type(object)))
        }
        Some(CompiledType::InputObject(_)) | None => Ok(Some(FieldValue::value(to_const(&value)))),
    }
}

/// Pick the concrete Object for a value of an abstract type.
fn resolve_abstract(
    registry: &Registry,
    abstract_name: &str,
    resolve_type: Option<&crate::types::ResolveType>,
    possible: &[String],
    value: &Value,
) -> async_graphql::Result<String> {
    let chosen = match resolve_type {
        Some(resolve_type) => match resolve_type(value) {
            Some(object) => {
                let name = registry.object_name(&object).ok_or_else(|| {
                    Error::new(format!(
                        "Object '{}' returned for '{}' is not part of the schema.",
                        object.name(),
                        abstract_name
                    ))
                })?;
                if !possible.iter().any(|p| p == name) {
                    return Err(Error::new(format!(
                        "Runtime Object type '{}' is not a possible type for '{}'.",
                        name, abstract_name
                    )));
                }
                Some(name.to_string())
            }
            None => None,
        },
        None => possible
            .iter()
            .find(|candidate| {
                registry
                    .get(candidate)
                    .and_then(CompiledType::as_object)
                    .is_some_and(|object| object.discriminator.accepts(value))
            })
            .cloned(),
    };
    chosen.ok_or_else(|| {
        Error::new(format!(
            "Abstract type '{}' must resolve to an Object type at runtime, got: {}.",
            abstract_name, value
        ))
    })
}
