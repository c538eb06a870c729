//! Subscription root fields backed by stream resolvers.

use futures::{stream, StreamExt};
use serde_json::json;
use typegraph::{Resolver, Scalar, Schema, Signature, Value};

fn counting_schema() -> Schema {
    let schema = Schema::new();
    schema
        .query()
        .field(
            "ping",
            Signature::resolver().returns(Scalar::String),
            Resolver::sync(|_, _, _| Ok("pong".into())),
        )
        .unwrap();

    let subscription = schema.subscription();
    subscription
        .field(
            "count_to",
            Signature::resolver()
                .arg("up_to", Scalar::Int)
                .returns(Scalar::Int),
            Resolver::stream(|_, _, args| match args.get::<i64>("up_to") {
                Ok(up_to) => stream::iter((1..=up_to).map(|i| Ok(Value::from(i)))).boxed(),
                Err(err) => stream::once(async move { Err(err) }).boxed(),
            }),
        )
        .unwrap();
    subscription
        .field(
            "greeting",
            Signature::resolver().returns(Scalar::String),
            Resolver::sync(|_, _, _| Ok("hello".into())),
        )
        .unwrap();
    schema
}

#[tokio::test]
async fn test_stream_resolver_yields_each_item() {
    let schema = counting_schema();

    let responses = schema
        .subscribe("subscription { countTo(upTo: 3) }", None, None)
        .unwrap()
        .collect::<Vec<_>>()
        .await;

    let values: Vec<serde_json::Value> = responses
        .into_iter()
        .map(|r| r.data.into_json().unwrap())
        .collect();
    assert_eq!(
        values,
        vec![
            json!({ "countTo": 1 }),
            json!({ "countTo": 2 }),
            json!({ "countTo": 3 }),
        ]
    );
}

#[tokio::test]
async fn test_plain_resolver_yields_once() {
    let schema = counting_schema();

    let responses = schema
        .subscribe("subscription { greeting }", None, None)
        .unwrap()
        .collect::<Vec<_>>()
        .await;

    assert_eq!(responses.len(), 1);
    assert_eq!(
        responses[0].data.clone().into_json().unwrap(),
        json!({ "greeting": "hello" })
    );
}

#[tokio::test]
async fn test_subscription_type_is_exposed() {
    let schema = counting_schema();

    let compiled = schema.compile().unwrap();

    assert_eq!(compiled.subscription_type(), Some("Subscription"));
    assert_eq!(compiled.mutation_type(), None);
    assert!(compiled.sdl().contains("countTo(upTo: Int!): Int"));
}
