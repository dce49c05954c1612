//! Declarative argument type specs.
//!
//! Operations declare the accepted shape of each positional argument as a
//! [`TypeSpec`]. Arguments are checked before any domain logic runs, so
//! handlers only ever see well-shaped values.

use std::fmt;

use serde_json::Value;

use crate::error::ArgumentTypeError;

/// The accepted shape of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    /// Any value, including an omitted one
    Any,
    /// An omitted value
    Undefined,
    /// A JSON string
    String,
    /// A JSON number
    Number,
    /// A JSON boolean
    Boolean,
    /// A JSON array of any values
    Array,
    /// An object with known fields; unknown fields are allowed
    Object(Vec<(&'static str, TypeSpec)>),
    /// An object whose every value matches the inner spec
    IndefiniteObjectOf(Box<TypeSpec>),
    /// Any one of the listed specs
    OneOf(Vec<TypeSpec>),
}

/// A failed check, with the dotted path to the offending nested field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    /// Path segments below the checked value; empty for the value itself
    pub path: Vec<String>,
    /// The spec that was not satisfied
    pub expected: String,
    /// Kind of the value found
    pub found: &'static str,
}

impl TypeSpec {
    /// Shorthand for `OneOf([inner, Undefined])`.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::OneOf(vec![inner, Self::Undefined])
    }

    /// Shorthand for `IndefiniteObjectOf(inner)`.
    #[must_use]
    pub fn object_of(inner: Self) -> Self {
        Self::IndefiniteObjectOf(Box::new(inner))
    }

    /// Checks a possibly omitted value against this spec.
    ///
    /// # Errors
    ///
    /// Returns a `TypeMismatch` describing the first violation found.
    pub fn check(&self, value: Option<&Value>) -> Result<(), TypeMismatch> {
        let mismatch = || TypeMismatch {
            path: Vec::new(),
            expected: self.to_string(),
            found: kind_of(value),
        };

        match self {
            Self::Any => Ok(()),
            Self::Undefined => value.is_none().then_some(()).ok_or_else(mismatch),
            Self::String => matches!(value, Some(Value::String(_)))
                .then_some(())
                .ok_or_else(mismatch),
            Self::Number => matches!(value, Some(Value::Number(_)))
                .then_some(())
                .ok_or_else(mismatch),
            Self::Boolean => matches!(value, Some(Value::Bool(_)))
                .then_some(())
                .ok_or_else(mismatch),
            Self::Array => matches!(value, Some(Value::Array(_)))
                .then_some(())
                .ok_or_else(mismatch),
            Self::Object(fields) => {
                let Some(Value::Object(object)) = value else {
                    return Err(mismatch());
                };
                for (name, spec) in fields {
                    spec.check(object.get(*name))
                        .map_err(|e| e.nested(name))?;
                }
                Ok(())
            }
            Self::IndefiniteObjectOf(spec) => {
                let Some(Value::Object(object)) = value else {
                    return Err(mismatch());
                };
                for (name, item) in object {
                    spec.check(Some(item)).map_err(|e| e.nested(name))?;
                }
                Ok(())
            }
            Self::OneOf(specs) => {
                let mut deepest: Option<TypeMismatch> = None;
                for spec in specs {
                    match spec.check(value) {
                        Ok(()) => return Ok(()),
                        Err(e) if !e.path.is_empty() && deepest.is_none() => deepest = Some(e),
                        Err(_) => {}
                    }
                }
                Err(deepest.unwrap_or_else(mismatch))
            }
        }
    }

    /// Checks an operation argument, naming the operation and parameter in
    /// the error.
    ///
    /// # Errors
    ///
    /// Returns `ArgumentTypeError` if the argument does not match.
    pub fn check_argument(
        &self,
        operation: &str,
        parameter: &str,
        value: Option<&Value>,
    ) -> Result<(), ArgumentTypeError> {
        self.check(value).map_err(|m| {
            let mut name = parameter.to_string();
            for segment in &m.path {
                name.push('.');
                name.push_str(segment);
            }
            ArgumentTypeError {
                operation: operation.to_string(),
                parameter: name,
                expected: m.expected,
                found: m.found,
            }
        })
    }
}

impl TypeMismatch {
    fn nested(mut self, field: &str) -> Self {
        self.path.insert(0, field.to_string());
        self
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Undefined => write!(f, "undefined"),
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Array => write!(f, "array"),
            Self::Object(_) => write!(f, "object"),
            Self::IndefiniteObjectOf(inner) => write!(f, "object<{inner}>"),
            Self::OneOf(specs) => {
                for (i, spec) in specs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{spec}")?;
                }
                Ok(())
            }
        }
    }
}

/// Returns the kind name of a possibly omitted value.
#[must_use]
pub const fn kind_of(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn port_spec() -> TypeSpec {
        TypeSpec::OneOf(vec![TypeSpec::String, TypeSpec::Number, TypeSpec::Undefined])
    }

    #[test]
    fn union_accepts_each_member() {
        let spec = port_spec();
        assert!(spec.check(Some(&json!("80"))).is_ok());
        assert!(spec.check(Some(&json!(80))).is_ok());
        assert!(spec.check(None).is_ok());
    }

    #[test]
    fn union_rejects_other_kinds() {
        let err = port_spec().check(Some(&json!(true))).unwrap_err();
        assert_eq!(err.expected, "string | number | undefined");
        assert_eq!(err.found, "boolean");
        assert!(err.path.is_empty());
    }

    #[test]
    fn null_is_not_undefined() {
        let spec = TypeSpec::optional(TypeSpec::String);
        assert_eq!(spec.check(Some(&Value::Null)).unwrap_err().found, "null");
    }

    #[test]
    fn object_reports_field_path() {
        let spec = TypeSpec::Object(vec![("port", port_spec())]);
        let err = spec.check(Some(&json!({ "port": [] }))).unwrap_err();
        assert_eq!(err.path, vec!["port".to_string()]);
        assert_eq!(err.found, "array");
    }

    #[test]
    fn object_allows_unknown_fields() {
        let spec = TypeSpec::Object(vec![("host", TypeSpec::optional(TypeSpec::String))]);
        assert!(spec.check(Some(&json!({ "other": 1 }))).is_ok());
    }

    #[test]
    fn indefinite_object_checks_every_value() {
        let spec = TypeSpec::object_of(TypeSpec::String);
        assert!(spec.check(Some(&json!({ "a": "1", "b": "2" }))).is_ok());

        let err = spec.check(Some(&json!({ "a": "1", "b": 2 }))).unwrap_err();
        assert_eq!(err.path, vec!["b".to_string()]);
        assert_eq!(err.expected, "string");
    }

    #[test]
    fn union_prefers_nested_error() {
        let spec = TypeSpec::OneOf(vec![
            TypeSpec::String,
            TypeSpec::Object(vec![("port", port_spec())]),
        ]);
        let err = spec
            .check_argument("$url", "input", Some(&json!({ "port": false })))
            .unwrap_err();
        assert_eq!(err.parameter, "input.port");
        assert_eq!(err.operation, "$url");
        assert_eq!(err.found, "boolean");
    }

    #[test]
    fn display_nested_specs() {
        let spec = TypeSpec::OneOf(vec![
            TypeSpec::object_of(TypeSpec::String),
            TypeSpec::Undefined,
        ]);
        assert_eq!(spec.to_string(), "object<string> | undefined");
    }
}
