//! Error types for typegraph.
//!
//! Definition and type-mapping errors abort schema construction. Resolver
//! failures never show up here: they are forwarded to the execution engine
//! and reported per field.

use std::fmt;

use thiserror::Error;

/// Errors raised while declaring, compiling or configuring a schema.
#[derive(Debug, Error)]
pub enum TypeGraphError {
    #[error("Cannot make changes to frozen {kind} '{name}'")]
    Frozen { kind: &'static str, name: String },

    #[error("Cannot replace the {0} root of a schema that has already been compiled")]
    SchemaSealed(&'static str),

    #[error("Invalid resolver for field '{field}': {source}")]
    Signature {
        field: String,
        #[source]
        source: SignatureError,
    },

    #[error("'{first}' and '{second}' on '{owner}' both map to the external name '{external}'")]
    NameCollision {
        owner: String,
        first: String,
        second: String,
        external: String,
    },

    #[error("Unable to map type to GraphQL: {0}")]
    TypeMapping(String),

    #[error("Type name '{0}' is declared by more than one definition")]
    DuplicateTypeName(String),

    #[error("Query root '{0}' must declare at least one field")]
    EmptyQueryRoot(String),

    #[error("GraphQL engine rejected the schema: {0}")]
    Engine(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a resolver signature cannot be turned into a field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("resolver must accept \"root\" and \"info\" as its first two positional parameters")]
    MissingReservedParameters,

    #[error("variable positional parameter '{0}' is not supported")]
    VarPositional(String),

    #[error("variable keyword parameter '{0}' is not supported")]
    VarKeyword(String),

    #[error("positional-only parameter '{0}' is not supported")]
    PositionalOnly(String),

    #[error("parameter '{0}' must have a type annotation")]
    MissingAnnotation(String),

    #[error("resolver return type must be declared")]
    MissingReturnType,
}

/// Coarse classification of [`TypeGraphError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised while building the type graph.
    Definition,
    /// Raised while mapping declared types during compilation.
    TypeMapping,
    /// The engine refused the lowered schema.
    Engine,
    /// Configuration could not be read or parsed.
    Config,
}

impl TypeGraphError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TypeGraphError::Frozen { .. }
            | TypeGraphError::SchemaSealed(_)
            | TypeGraphError::Signature { .. }
            | TypeGraphError::NameCollision { .. } => ErrorKind::Definition,
            TypeGraphError::TypeMapping(_)
            | TypeGraphError::DuplicateTypeName(_)
            | TypeGraphError::EmptyQueryRoot(_) => ErrorKind::TypeMapping,
            TypeGraphError::Engine(_) => ErrorKind::Engine,
            TypeGraphError::Config(_) | TypeGraphError::Io(_) => ErrorKind::Config,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Definition => "definition",
            ErrorKind::TypeMapping => "type mapping",
            ErrorKind::Engine => "engine",
            ErrorKind::Config => "config",
        };
        f.write_str(label)
    }
}

pub type Result<T> = std::result::Result<T, TypeGraphError>;
