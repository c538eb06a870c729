//! # typegraph
//!
//! Declare a GraphQL API as a graph of mutable Rust values, then compile it
//! into an immutable, executable schema.
//!
//! ## Key Features
//!
//! - **Builder graph**: Objects, Interfaces, Unions, InputObjects and Enums
//!   that stay open for new fields until they are compiled
//! - **Resolver-first fields**: derive a field's arguments and type from a
//!   resolver signature
//! - **Name mangling**: `snake_case` inside, `camelCase` on the wire, with
//!   omitted arguments kept distinct from explicit nulls
//! - **Cycle safe**: mutually referencing types compile once
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use typegraph::{Resolver, Scalar, Schema, Signature};
//!
//! # async fn run() -> typegraph::Result<()> {
//! let schema = Schema::new();
//! schema.query().field(
//!     "hello",
//!     Signature::resolver()
//!         .arg_default("name", Scalar::String, "stranger")
//!         .returns(Scalar::String),
//!     Resolver::sync(|_, _, args| {
//!         let name: String = args.get("name")?;
//!         Ok(format!("Hello {}", name).into())
//!     }),
//! )?;
//!
//! let response = schema.execute(r#"{ hello(name: "world") }"#).await?;
//! // {"hello": "Hello world"}
//! # Ok(())
//! # }
//! ```

pub mod compile;
pub mod config;
pub mod container;
mod engine;
pub mod error;
pub mod introspect;
pub mod mangle;
pub mod scalars;
pub mod schema;
pub mod types;
pub mod value;

// Re-exports for convenience
pub use error::{ErrorKind, Result, SignatureError, TypeGraphError};

pub use compile::{CompiledSchema, CompiledType, CompiledTypeRef};
pub use config::{CompilerConfig, Discrimination};
pub use container::{ContainerType, Instance};
pub use introspect::{Parameter, ParameterKind, Signature};
pub use mangle::{to_camel_case, Arguments};
pub use scalars::Scalar;
pub use schema::{Schema, SchemaBuilder};
pub use types::{
    Argument, ContextValue, Enum, EnumValue, Field, InputField, InputObject, Interface, Object,
    ResolveInfo, Resolver, TypeRef, Union,
};
pub use value::{FromValue, Value};
