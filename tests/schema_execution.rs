//! End-to-end execution: declare, compile and run queries.

use futures::FutureExt;
use serde_json::json;
use typegraph::{
    CompilerConfig, ContextValue, Discrimination, Field, Object, Resolver, Scalar, Schema,
    Signature, TypeRef, Value,
};

fn data(response: &async_graphql::Response) -> serde_json::Value {
    response.data.clone().into_json().unwrap()
}

fn messages(response: &async_graphql::Response) -> Vec<String> {
    response.errors.iter().map(|e| e.message.clone()).collect()
}

#[tokio::test]
async fn test_create_basic_schema() {
    let schema = Schema::new();
    schema
        .query()
        .field(
            "hello",
            Signature::resolver().returns(Scalar::String),
            Resolver::sync(|_, _, _| Ok("Hello world".into())),
        )
        .unwrap();

    let response = schema.execute("{hello}").await.unwrap();

    assert!(response.errors.is_empty());
    assert_eq!(data(&response), json!({ "hello": "Hello world" }));
}

#[tokio::test]
async fn test_simple_query_with_optional_argument() {
    let schema = Schema::new();
    schema
        .query()
        .field(
            "hello",
            Signature::resolver()
                .arg_default("name", Scalar::String, "world")
                .returns(Scalar::String),
            Resolver::sync(|_, _, args| {
                let name: String = args.get("name")?;
                Ok(format!("Hello {}", name).into())
            }),
        )
        .unwrap();

    let response = schema.execute("{hello}").await.unwrap();
    assert_eq!(data(&response), json!({ "hello": "Hello world" }));

    let response = schema
        .execute_with(
            "query hello($name: String!) { hello(name: $name) }",
            Some(json!({ "name": "WROLD!!1" })),
            None,
        )
        .await
        .unwrap();
    assert!(response.errors.is_empty(), "{:?}", messages(&response));
    assert_eq!(data(&response), json!({ "hello": "Hello WROLD!!1" }));
}

#[tokio::test]
async fn test_simple_query_with_mandatory_argument() {
    let schema = Schema::new();
    schema
        .query()
        .field(
            "hello",
            Signature::resolver()
                .arg("name", Scalar::String)
                .returns(Scalar::String),
            Resolver::sync(|_, _, args| {
                let name: String = args.get("name")?;
                Ok(format!("Hello {}", name).into())
            }),
        )
        .unwrap();

    // Rejected by validation, the resolver never runs
    let response = schema.execute("{hello}").await.unwrap();
    assert_eq!(response.errors.len(), 1);
    assert_eq!(data(&response), serde_json::Value::Null);

    let response = schema
        .execute_with(
            "query hello($name: String!) { hello(name: $name) }",
            Some(json!({ "name": "WROLD!!1" })),
            None,
        )
        .await
        .unwrap();
    assert_eq!(data(&response), json!({ "hello": "Hello WROLD!!1" }));
}

#[tokio::test]
async fn test_schema_with_nested_objects() {
    let post = Object::builder("Post")
        .field("title", Scalar::String)
        .field("body", Scalar::String)
        .build();

    let schema = Schema::new();
    let post_type = post.clone();
    schema
        .query()
        .field(
            "post",
            Signature::resolver().returns(&post),
            Resolver::sync(move |_, _, _| {
                Ok(post_type.instance([("title", "One"), ("body", "First post")]))
            }),
        )
        .unwrap();

    let response = schema.execute("{post {title, body}}").await.unwrap();

    assert!(response.errors.is_empty());
    assert_eq!(
        data(&response),
        json!({ "post": { "title": "One", "body": "First post" } })
    );
}

#[tokio::test]
async fn test_schema_with_nested_objects_list() {
    let post = Object::builder("Post")
        .field("title", Scalar::String)
        .field("body", Scalar::String)
        .build();

    let schema = Schema::new();
    let post_type = post.clone();
    schema
        .query()
        .field(
            "posts",
            Signature::resolver().returns(TypeRef::list(&post)),
            Resolver::sync(move |_, _, _| {
                Ok(Value::List(vec![
                    post_type.instance([("title", "One"), ("body", "First post")]),
                    post_type.instance([("title", "Two"), ("body", "Second post")]),
                ]))
            }),
        )
        .unwrap();

    let response = schema.execute("{posts {title, body}}").await.unwrap();

    assert!(response.errors.is_empty());
    assert_eq!(
        data(&response),
        json!({ "posts": [
            { "title": "One", "body": "First post" },
            { "title": "Two", "body": "Second post" },
        ]})
    );
}

#[tokio::test]
async fn test_omitted_fields_are_filled_with_null() {
    let my_obj = Object::builder("MyObj")
        .field("foo", Scalar::String)
        .field("bar", Scalar::String)
        .build();

    let schema = Schema::new();
    let my_obj_type = my_obj.clone();
    schema
        .query()
        .field(
            "my_obj",
            Signature::resolver().returns(&my_obj),
            Resolver::sync(move |_, _, _| Ok(my_obj_type.instance([("foo", "FOO")]))),
        )
        .unwrap();

    let response = schema.execute("{ myObj { foo, bar } }").await.unwrap();

    assert!(response.errors.is_empty());
    assert_eq!(data(&response), json!({ "myObj": { "foo": "FOO", "bar": null } }));
}

/// Query with a single `foo: Foo` field whose resolver returns `value`.
fn foo_schema(foo: &Object, value: Value, config: CompilerConfig) -> Schema {
    let schema = Schema::builder().config(config).build();
    schema
        .query()
        .field(
            "foo",
            Signature::resolver().returns(foo),
            Resolver::sync(move |_, _, _| Ok(value.clone())),
        )
        .unwrap();
    schema
}

#[tokio::test]
async fn test_resolver_can_return_container_instance() {
    let foo = Object::builder("Foo").field("text", Scalar::String).build();
    let schema = foo_schema(&foo, foo.instance([("text", "a")]), CompilerConfig::default());

    let response = schema.execute("{ foo { text } }").await.unwrap();

    assert!(response.errors.is_empty());
    assert_eq!(data(&response), json!({ "foo": { "text": "a" } }));
}

#[tokio::test]
async fn test_resolver_can_return_compatible_record() {
    let foo = Object::builder("Foo").field("text", Scalar::String).build();
    let schema = foo_schema(&foo, Value::record([("text", "a")]), CompilerConfig::default());

    let response = schema.execute("{ foo { text } }").await.unwrap();

    assert!(response.errors.is_empty());
    assert_eq!(data(&response), json!({ "foo": { "text": "a" } }));
}

#[tokio::test]
async fn test_resolver_cannot_return_different_container_instance() {
    let foo = Object::builder("Foo").field("text", Scalar::String).build();
    let bar = Object::builder("Bar").field("text", Scalar::String).build();
    let schema = foo_schema(&foo, bar.instance([("text", "a")]), CompilerConfig::default());

    let response = schema.execute("{ foo { text } }").await.unwrap();

    assert_eq!(data(&response), json!({ "foo": null }));
    assert_eq!(
        messages(&response),
        vec!["Expected value of type 'Foo' but got: <Bar instance>.".to_string()]
    );
}

#[tokio::test]
async fn test_returning_an_incompatible_record_reads_nulls() {
    let foo = Object::builder("Foo").field("text", Scalar::String).build();
    let schema = foo_schema(
        &foo,
        Value::record([("spam", "SPAM".repeat(10))]),
        CompilerConfig::default(),
    );

    let response = schema.execute("{ foo { text } }").await.unwrap();

    assert!(response.errors.is_empty());
    assert_eq!(data(&response), json!({ "foo": { "text": null } }));
}

#[tokio::test]
async fn test_strict_discrimination_rejects_records() {
    let foo = Object::builder("Foo").field("text", Scalar::String).build();
    let config = CompilerConfig::default().with_discrimination(Discrimination::Strict);
    let schema = foo_schema(&foo, Value::record([("text", "a")]), config);

    let response = schema.execute("{ foo { text } }").await.unwrap();

    assert_eq!(data(&response), json!({ "foo": null }));
    assert!(messages(&response)[0].starts_with("Expected value of type 'Foo' but got:"));
}

#[tokio::test]
async fn test_custom_is_type_of() {
    let foo = Object::builder("Foo")
        .field("text", Scalar::String)
        .is_type_of(|value| value.field("text").is_some())
        .build();

    let accepted = foo_schema(&foo, Value::record([("text", "a")]), CompilerConfig::default());
    let response = accepted.execute("{ foo { text } }").await.unwrap();
    assert_eq!(data(&response), json!({ "foo": { "text": "a" } }));

    let other = Object::builder("Foo")
        .field("text", Scalar::String)
        .is_type_of(|value| value.field("text").is_some())
        .build();
    let rejected = foo_schema(&other, Value::record([("spam", 1)]), CompilerConfig::default());
    let response = rejected.execute("{ foo { text } }").await.unwrap();
    assert_eq!(data(&response), json!({ "foo": null }));
}

#[tokio::test]
async fn test_resolver_errors_become_field_errors() {
    let schema = Schema::new();
    let query = schema.query();
    query
        .field(
            "fail",
            Signature::resolver().returns(Scalar::String),
            Resolver::sync(|_, _, _| Err(anyhow::anyhow!("Something went wrong"))),
        )
        .unwrap();
    query
        .field(
            "ok",
            Signature::resolver().returns(Scalar::String),
            Resolver::sync(|_, _, _| Ok("fine".into())),
        )
        .unwrap();

    let response = schema.execute("{ fail ok }").await.unwrap();

    assert_eq!(data(&response), json!({ "fail": null, "ok": "fine" }));
    assert_eq!(messages(&response), vec!["Something went wrong".to_string()]);
}

#[tokio::test]
async fn test_async_resolver() {
    let schema = Schema::new();
    schema
        .query()
        .field(
            "echo",
            Signature::resolver()
                .arg("text", Scalar::String)
                .returns(Scalar::String),
            Resolver::future(|_, _, args| {
                async move {
                    tokio::task::yield_now().await;
                    let text: String = args.get("text")?;
                    Ok::<_, anyhow::Error>(Value::from(text))
                }
                .boxed()
            }),
        )
        .unwrap();

    let response = schema.execute(r#"{ echo(text: "ping") }"#).await.unwrap();

    assert_eq!(data(&response), json!({ "echo": "ping" }));
}

#[tokio::test]
async fn test_context_reaches_resolvers() {
    struct CurrentUser(&'static str);

    let schema = Schema::new();
    schema
        .query()
        .field(
            "whoami",
            Signature::resolver().returns(Scalar::String),
            Resolver::sync(|_, info, _| {
                let user = info
                    .context::<CurrentUser>()
                    .ok_or_else(|| anyhow::anyhow!("not logged in"))?;
                Ok(format!("{} ({})", user.0, info.parent_type()).into())
            }),
        )
        .unwrap();

    let response = schema
        .execute_with("{ whoami }", None, Some(ContextValue::new(CurrentUser("alice"))))
        .await
        .unwrap();
    assert_eq!(data(&response), json!({ "whoami": "alice (Query)" }));

    let response = schema.execute("{ whoami }").await.unwrap();
    assert_eq!(messages(&response), vec!["not logged in".to_string()]);
}

#[tokio::test]
async fn test_namespace_fields() {
    let admin = Object::new("Admin");
    admin
        .field(
            "version",
            Signature::resolver().returns(Scalar::String),
            Resolver::sync(|root, _, _| {
                Ok(format!("1.0 from {}", root).into())
            }),
        )
        .unwrap();

    let schema = Schema::new();
    schema.query().namespace_field("admin", &admin).unwrap();

    let response = schema.execute("{ admin { version } }").await.unwrap();

    assert!(response.errors.is_empty(), "{:?}", messages(&response));
    assert_eq!(
        data(&response),
        json!({ "admin": { "version": "1.0 from <Admin instance>" } })
    );
}

#[tokio::test]
async fn test_declared_fields_with_explicit_resolvers() {
    let schema = Schema::new();
    schema
        .query()
        .define_field(
            "answer",
            Field::new(TypeRef::non_null(Scalar::Int))
                .description("The answer")
                .resolver(Resolver::sync(|_, info, _| {
                    assert_eq!(info.field_name(), "answer");
                    Ok(42.into())
                })),
        )
        .unwrap();

    let response = schema.execute("{ answer }").await.unwrap();

    assert_eq!(data(&response), json!({ "answer": 42 }));
}

#[tokio::test]
async fn test_non_null_field_returning_null() {
    let schema = Schema::new();
    schema
        .query()
        .define_field(
            "required",
            Field::new(TypeRef::non_null(Scalar::String))
                .resolver(Resolver::sync(|_, _, _| Ok(Value::Null))),
        )
        .unwrap();

    let response = schema.execute("{ required }").await.unwrap();

    assert_eq!(response.errors.len(), 1);
    assert_eq!(data(&response), serde_json::Value::Null);
}
