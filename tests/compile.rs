//! Compilation behaviour visible through the public API.

use chrono::NaiveDate;
use futures::stream;
use futures::StreamExt;
use serde_json::json;
use typegraph::{
    CompilerConfig, ErrorKind, Field, Object, Resolver, Scalar, Schema, Signature,
    TypeGraphError, TypeRef, Value,
};

fn data(response: &async_graphql::Response) -> serde_json::Value {
    response.data.clone().into_json().unwrap()
}

fn name_of(value: &Value) -> String {
    value
        .field("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_mutually_recursive_objects() {
    let foo = Object::builder("Foo").field("name", Scalar::String).build();
    let bar = Object::builder("Bar").field("name", Scalar::String).build();

    let bar_type = bar.clone();
    foo.field(
        "bar",
        Signature::resolver().returns(&bar),
        Resolver::sync(move |root, _, _| {
            Ok(bar_type.instance([("name", format!("{} bar", name_of(root)))]))
        }),
    )
    .unwrap();
    let foo_type = foo.clone();
    bar.field(
        "foo",
        Signature::resolver().returns(&foo),
        Resolver::sync(move |root, _, _| {
            Ok(foo_type.instance([("name", format!("{} foo", name_of(root)))]))
        }),
    )
    .unwrap();

    let schema = Schema::new();
    let foo_type = foo.clone();
    schema
        .query()
        .field(
            "foo",
            Signature::resolver()
                .arg("name", Scalar::String)
                .returns(&foo),
            Resolver::sync(move |_, _, args| {
                let name: String = args.get("name")?;
                Ok(foo_type.instance([("name", name)]))
            }),
        )
        .unwrap();

    let response = schema
        .execute(r#"{ foo(name: "FOO") { name bar { name foo { name } } } }"#)
        .await
        .unwrap();

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        data(&response),
        json!({ "foo": {
            "name": "FOO",
            "bar": { "name": "FOO bar", "foo": { "name": "FOO bar foo" } },
        }})
    );

    let compiled = schema.compile().unwrap();
    let mut names = compiled.type_names().collect::<Vec<_>>();
    names.sort();
    assert!(names.contains(&"Foo") && names.contains(&"Bar"));
}

#[tokio::test]
async fn test_objects_freeze_after_compile() {
    let schema = Schema::new();
    let query = schema.query();
    query.define_field("hello", Scalar::String).unwrap();

    assert!(!query.is_sealed());
    schema.compile().unwrap();
    assert!(query.is_sealed());

    let err = query.define_field("late", Scalar::String).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Definition);
    assert_eq!(err.to_string(), "Cannot make changes to frozen object 'Query'");
}

#[tokio::test]
async fn test_compile_errors_surface_from_execute() {
    let schema = Schema::new();

    let err = schema.execute("{ __typename }").await.unwrap_err();

    assert!(matches!(err, TypeGraphError::EmptyQueryRoot(ref name) if name == "Query"));
    assert!(!schema.is_compiled());
}

#[tokio::test]
async fn test_stream_resolver_outside_subscription_root() {
    let schema = Schema::new();
    schema
        .query()
        .define_field(
            "ticks",
            Field::new(Scalar::Int).resolver(Resolver::stream(|_, _, _| {
                stream::iter(vec![Ok(Value::from(1))]).boxed()
            })),
        )
        .unwrap();

    let err = schema.compile().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TypeMapping);
}

#[tokio::test]
async fn test_sdl_carries_descriptions_and_deprecations() {
    let schema = Schema::new();
    schema
        .query()
        .field(
            "old_hello",
            Signature::resolver()
                .returns(Scalar::String)
                .description("Greets the caller")
                .deprecated("Use greeting"),
            Resolver::sync(|_, _, _| Ok("hi".into())),
        )
        .unwrap();

    let sdl = schema.sdl().unwrap();

    assert!(sdl.contains("Greets the caller"));
    assert!(sdl.contains("oldHello: String @deprecated(reason: \"Use greeting\")"));
}

#[tokio::test]
async fn test_date_scalars() {
    let schema = Schema::new();
    schema
        .query()
        .field(
            "next_day",
            Signature::resolver()
                .arg("date", Scalar::Date)
                .returns(Scalar::Date),
            Resolver::sync(|_, _, args| {
                let date: NaiveDate = args.get("date")?;
                Ok(date.succ_opt().into())
            }),
        )
        .unwrap();

    let response = schema
        .execute(r#"{ nextDay(date: "2018-03-14") }"#)
        .await
        .unwrap();
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(data(&response), json!({ "nextDay": "2018-03-15" }));

    let response = schema
        .execute(r#"{ nextDay(date: "14/03/2018") }"#)
        .await
        .unwrap();
    assert!(!response.errors.is_empty());
    assert!(schema.sdl().unwrap().contains("scalar Date"));
}

fn deep_schema(config: CompilerConfig) -> Schema {
    let node = Object::builder("Node").field("id", Scalar::Int).build();
    let node_type = node.clone();
    node.define_field(
        "child",
        Field::new(&node).resolver(Resolver::sync(move |root, _, _| {
            let id = root.field("id").and_then(Value::as_i64).unwrap_or(0);
            Ok(node_type.instance([("id", id + 1)]))
        })),
    )
    .unwrap();

    let schema = Schema::builder().config(config).build();
    let node_type = node.clone();
    schema
        .query()
        .field(
            "root",
            Signature::resolver().returns(&node),
            Resolver::sync(move |_, _, _| Ok(node_type.instance([("id", 0)]))),
        )
        .unwrap();
    schema
}

#[tokio::test]
async fn test_depth_limit() {
    let query = "{ root { child { child { child { id } } } } }";

    let unlimited = deep_schema(CompilerConfig::default());
    let response = unlimited.execute(query).await.unwrap();
    assert_eq!(
        data(&response),
        json!({ "root": { "child": { "child": { "child": { "id": 3 } } } } })
    );

    let limited = deep_schema(CompilerConfig {
        limit_depth: Some(2),
        ..CompilerConfig::default()
    });
    let response = limited.execute(query).await.unwrap();
    assert!(!response.errors.is_empty());
}

#[tokio::test]
async fn test_introspection_can_be_disabled() {
    let query = "{ __schema { queryType { name } } }";

    let open = deep_schema(CompilerConfig::default());
    let response = open.execute(query).await.unwrap();
    assert_eq!(
        data(&response),
        json!({ "__schema": { "queryType": { "name": "Query" } } })
    );

    let closed = deep_schema(CompilerConfig {
        introspection: false,
        ..CompilerConfig::default()
    });
    let response = closed.execute(query).await.unwrap();
    assert_ne!(
        data(&response),
        json!({ "__schema": { "queryType": { "name": "Query" } } })
    );
}

#[test]
fn test_native_type_refs() {
    let schema = Schema::new();
    schema
        .query()
        .define_field("count", TypeRef::non_null(TypeRef::of::<i64>()))
        .unwrap();
    schema
        .query()
        .define_field("labels", TypeRef::of::<Vec<String>>())
        .unwrap();

    let sdl = schema.sdl().unwrap();

    assert!(sdl.contains("count: Int!"));
    assert!(sdl.contains("labels: [String]"));
}

#[test]
fn test_sdl_lists_only_non_null_argument_defaults() {
    let schema = Schema::new();
    schema
        .query()
        .field(
            "greet",
            Signature::resolver()
                .arg_default("name", TypeRef::non_null(Scalar::String), "world")
                .arg_default("nickname", Scalar::String, "pal")
                .returns(Scalar::String),
            Resolver::sync(|_, _, _| Ok("hi".into())),
        )
        .unwrap();

    let sdl = schema.sdl().unwrap();

    assert!(sdl.contains("name: String! = \"world\""));
    assert!(sdl.contains("nickname: String)"));
    assert!(!sdl.contains("\"pal\""));
}
