//! Deriving fields from resolver signatures.
//!
//! A [`Signature`] describes a resolver's parameter list the way it was
//! written: the reserved `root` and `info` parameters first, then one
//! parameter per argument. [`field_from_resolver`] turns it into a
//! [`Field`] once, at registration time; the compiler never looks at
//! signatures.
//!
//! ```
//! use typegraph::{Resolver, Scalar, Signature, Value};
//! use typegraph::introspect::field_from_resolver;
//!
//! let signature = Signature::resolver()
//!     .arg("name", Scalar::String)
//!     .arg_default("greeting", Scalar::String, "Hello")
//!     .returns(Scalar::String);
//! let field = field_from_resolver(&signature, Resolver::sync(|_, _, _| Ok(Value::Null))).unwrap();
//!
//! assert_eq!(field.arguments()["name"].ty().to_string(), "String!");
//! assert_eq!(field.arguments()["greeting"].ty().to_string(), "String");
//! ```

use crate::error::SignatureError;
use crate::types::{Argument, Field, Resolver, TypeRef};
use crate::value::Value;

/// How a parameter may be passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    PositionalOnly,
    PositionalOrKeyword,
    KeywordOnly,
    VarPositional,
    VarKeyword,
}

impl ParameterKind {
    fn is_positional(self) -> bool {
        matches!(
            self,
            ParameterKind::PositionalOnly | ParameterKind::PositionalOrKeyword
        )
    }
}

#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    kind: ParameterKind,
    annotation: Option<TypeRef>,
    default: Option<Value>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            annotation: None,
            default: None,
        }
    }

    pub fn positional(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::PositionalOrKeyword)
    }

    pub fn keyword(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::KeywordOnly)
    }

    pub fn annotated(mut self, ty: impl Into<TypeRef>) -> Self {
        self.annotation = Some(ty.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }
}

/// Parameter list and return type of a resolver.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    parameters: Vec<Parameter>,
    returns: Option<TypeRef>,
    description: Option<String>,
    deprecation: Option<String>,
}

impl Signature {
    /// An empty signature, not even the reserved parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// A signature starting with the reserved `root` and `info` parameters.
    pub fn resolver() -> Self {
        Self::new()
            .param(Parameter::positional("root"))
            .param(Parameter::positional("info"))
    }

    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Required argument.
    pub fn arg(self, name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        self.param(Parameter::positional(name).annotated(ty))
    }

    /// Optional argument with a default.
    pub fn arg_default(
        self,
        name: impl Into<String>,
        ty: impl Into<TypeRef>,
        default: impl Into<Value>,
    ) -> Self {
        self.param(Parameter::positional(name).annotated(ty).default_value(default))
    }

    pub fn returns(mut self, ty: impl Into<TypeRef>) -> Self {
        self.returns = Some(ty.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation = Some(reason.into());
        self
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

/// Build a [`Field`] from a resolver and its signature.
///
/// Parameters without a default become non-null arguments; parameters with
/// a default keep their declared type and carry the default.
pub fn field_from_resolver(
    signature: &Signature,
    resolver: Resolver,
) -> Result<Field, SignatureError> {
    let params = &signature.parameters;
    if params.len() < 2 || !params[..2].iter().all(|p| p.kind.is_positional()) {
        return Err(SignatureError::MissingReservedParameters);
    }

    let mut arguments = Vec::with_capacity(params.len() - 2);
    for param in &params[2..] {
        match param.kind {
            ParameterKind::VarPositional => {
                return Err(SignatureError::VarPositional(param.name.clone()))
            }
            ParameterKind::VarKeyword => {
                return Err(SignatureError::VarKeyword(param.name.clone()))
            }
            ParameterKind::PositionalOnly => {
                return Err(SignatureError::PositionalOnly(param.name.clone()))
            }
            ParameterKind::PositionalOrKeyword | ParameterKind::KeywordOnly => {}
        }

        let ty = param
            .annotation
            .clone()
            .ok_or_else(|| SignatureError::MissingAnnotation(param.name.clone()))?;
        let argument = match &param.default {
            None => Argument::new(TypeRef::non_null(ty)),
            Some(default) => Argument::new(ty).default_value(default.clone()),
        };
        arguments.push((param.name.clone(), argument));
    }

    let returns = signature
        .returns
        .clone()
        .ok_or(SignatureError::MissingReturnType)?;

    let mut field = Field::new(returns).resolver(resolver);
    for (name, argument) in arguments {
        field = field.argument(name, argument);
    }
    if let Some(description) = &signature.description {
        field = field.description(description.clone());
    }
    if let Some(reason) = &signature.deprecation {
        field = field.deprecation(reason.clone());
    }
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalars::Scalar;

    fn noop() -> Resolver {
        Resolver::sync(|_, _, _| Ok(Value::Null))
    }

    #[test]
    fn test_required_and_defaulted_arguments() {
        let sig = Signature::resolver()
            .arg("some_arg", Scalar::String)
            .arg_default("other_arg", Scalar::String, "DEFAULT")
            .returns(Scalar::String);
        let field = field_from_resolver(&sig, noop()).unwrap();

        let args = field.arguments();
        assert_eq!(args.len(), 2);
        assert_eq!(args["some_arg"].ty().to_string(), "String!");
        assert!(args["some_arg"].default().is_none());
        assert_eq!(args["other_arg"].ty().to_string(), "String");
        assert_eq!(args["other_arg"].default(), Some(&Value::from("DEFAULT")));
        assert_eq!(field.ty().to_string(), "String");
        assert!(field.resolver_fn().is_some());
    }

    #[test]
    fn test_keyword_only_argument_is_allowed() {
        let sig = Signature::resolver()
            .param(Parameter::keyword("limit").annotated(Scalar::Int))
            .returns(Scalar::Int);
        let field = field_from_resolver(&sig, noop()).unwrap();
        assert_eq!(field.arguments()["limit"].ty().to_string(), "Int!");
    }

    #[test]
    fn test_missing_reserved_parameters() {
        let sig = Signature::new()
            .param(Parameter::positional("root"))
            .returns(Scalar::String);
        assert_eq!(
            field_from_resolver(&sig, noop()).unwrap_err(),
            SignatureError::MissingReservedParameters
        );

        let sig = Signature::new()
            .param(Parameter::keyword("root"))
            .param(Parameter::keyword("info"))
            .returns(Scalar::String);
        assert_eq!(
            field_from_resolver(&sig, noop()).unwrap_err(),
            SignatureError::MissingReservedParameters
        );
    }

    #[test]
    fn test_rejected_parameter_kinds() {
        let cases = [
            (ParameterKind::VarPositional, SignatureError::VarPositional("x".into())),
            (ParameterKind::VarKeyword, SignatureError::VarKeyword("x".into())),
            (ParameterKind::PositionalOnly, SignatureError::PositionalOnly("x".into())),
        ];
        for (kind, expected) in cases {
            let sig = Signature::resolver()
                .param(Parameter::new("x", kind).annotated(Scalar::Int))
                .returns(Scalar::Int);
            assert_eq!(field_from_resolver(&sig, noop()).unwrap_err(), expected);
        }
    }

    #[test]
    fn test_missing_annotation_and_return_type() {
        let sig = Signature::resolver()
            .param(Parameter::positional("name"))
            .returns(Scalar::String);
        assert_eq!(
            field_from_resolver(&sig, noop()).unwrap_err(),
            SignatureError::MissingAnnotation("name".into())
        );

        let sig = Signature::resolver().arg("name", Scalar::String);
        assert_eq!(
            field_from_resolver(&sig, noop()).unwrap_err(),
            SignatureError::MissingReturnType
        );
    }

    #[test]
    fn test_description_and_deprecation_carry_over() {
        let sig = Signature::resolver()
            .returns(Scalar::Int)
            .description("The answer")
            .deprecated("Use answer2");
        let field = field_from_resolver(&sig, noop()).unwrap();
        assert_eq!(field.description_text(), Some("The answer"));
        assert_eq!(field.deprecation_reason(), Some("Use answer2"));
    }
}
