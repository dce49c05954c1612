//! Built-in operators of the host engine.
//!
//! A deliberately small set: enough to express literal and predicate
//! criteria for `$objectMatches` and `$urlMatches`.

// Handlers share the `Handler` signature even when they cannot fail.
#![allow(clippy::unnecessary_wraps)]

use serde_json::Value;

use crate::constants::{OP_LITERAL, OP_OBJECT_MATCHES};
use crate::context::EvaluationContext;
use crate::error::Error;
use crate::operation::{OperationSpec, ParamSpec, arg, str_arg};
use crate::path::resolve_path;
use crate::traits::Evaluator;
use crate::type_spec::TypeSpec;

/// Returns the built-in operator registrations.
#[must_use]
pub fn builtin_operations() -> Vec<OperationSpec> {
    let any = || ParamSpec::new("value", TypeSpec::Any);

    vec![
        OperationSpec::new(
            "$value",
            vec![ParamSpec::new("path", TypeSpec::optional(TypeSpec::String))],
            op_value,
        )
        .with_default_param(None),
        OperationSpec::new(OP_LITERAL, vec![any()], op_literal)
            .with_default_param(None)
            .with_raw_args(),
        OperationSpec::new("$eq", vec![ParamSpec::new("compare", TypeSpec::Any), any()], op_eq),
        OperationSpec::new("$ne", vec![ParamSpec::new("compare", TypeSpec::Any), any()], op_ne),
        OperationSpec::new("$in", vec![ParamSpec::new("array", TypeSpec::Array), any()], op_in),
        OperationSpec::new("$not", vec![any()], op_not),
        OperationSpec::new("$exists", vec![any()], op_exists),
        OperationSpec::new(
            "$and",
            vec![ParamSpec::new("expressions", TypeSpec::Array)],
            op_and,
        )
        .with_default_param(None),
        OperationSpec::new(
            "$or",
            vec![ParamSpec::new("expressions", TypeSpec::Array)],
            op_or,
        )
        .with_default_param(None),
        OperationSpec::new(
            "$stringStartsWith",
            vec![ParamSpec::new("search", TypeSpec::String), any()],
            op_string_starts_with,
        ),
        OperationSpec::new(
            "$stringEndsWith",
            vec![ParamSpec::new("search", TypeSpec::String), any()],
            op_string_ends_with,
        ),
        OperationSpec::new(
            "$stringIncludes",
            vec![ParamSpec::new("search", TypeSpec::String), any()],
            op_string_includes,
        ),
        OperationSpec::new(
            OP_OBJECT_MATCHES,
            vec![
                ParamSpec::new("criteria", TypeSpec::object_of(TypeSpec::Any)),
                any(),
            ],
            op_object_matches,
        ),
    ]
}

/// Returns false for `null`, `false`, `0`, and `""`; true otherwise.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Tests `subject` against every `path -> expectation` pair of `criteria`.
///
/// Each path is resolved into `subject`; unresolvable paths yield `null`.
/// Expectations that are expressions are evaluated with the resolved value
/// as their subject and must be truthy. `["$literal", value]` and any other
/// non-expression expectation must equal the resolved value.
///
/// # Errors
///
/// Propagates evaluation errors of predicate expectations.
pub fn object_matches(
    criteria: &serde_json::Map<String, Value>,
    subject: &Value,
    context: &EvaluationContext,
    evaluator: &dyn Evaluator,
) -> Result<bool, Error> {
    for (path, expected) in criteria {
        let resolved = resolve_path(subject, path).cloned().unwrap_or(Value::Null);
        tracing::trace!(path = %path, resolved = %resolved, "resolved criteria path");

        let matched = if let Some(literal) = literal_operand(expected) {
            resolved == *literal
        } else if evaluator.is_expression(expected) {
            let inner = context.with_subject(resolved);
            is_truthy(&evaluator.evaluate(&inner, expected)?)
        } else {
            resolved == *expected
        };

        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn literal_operand(value: &Value) -> Option<&Value> {
    match value.as_array()?.as_slice() {
        [Value::String(head), rest @ ..] if head == OP_LITERAL => {
            Some(rest.first().unwrap_or(&Value::Null))
        }
        _ => None,
    }
}

fn value_arg(args: &[Option<Value>], index: usize) -> Value {
    arg(args, index).cloned().unwrap_or(Value::Null)
}

fn op_value(
    args: &[Option<Value>],
    context: &EvaluationContext,
    _: &dyn Evaluator,
) -> Result<Value, Error> {
    let subject = context.subject();
    Ok(match str_arg(args, 0) {
        Some(path) => resolve_path(subject, path).cloned().unwrap_or(Value::Null),
        None => subject.clone(),
    })
}

fn op_literal(
    args: &[Option<Value>],
    _: &EvaluationContext,
    _: &dyn Evaluator,
) -> Result<Value, Error> {
    Ok(value_arg(args, 0))
}

fn op_eq(args: &[Option<Value>], _: &EvaluationContext, _: &dyn Evaluator) -> Result<Value, Error> {
    Ok(Value::Bool(value_arg(args, 0) == value_arg(args, 1)))
}

fn op_ne(args: &[Option<Value>], _: &EvaluationContext, _: &dyn Evaluator) -> Result<Value, Error> {
    Ok(Value::Bool(value_arg(args, 0) != value_arg(args, 1)))
}

fn op_in(args: &[Option<Value>], _: &EvaluationContext, _: &dyn Evaluator) -> Result<Value, Error> {
    let value = value_arg(args, 1);
    let found = arg(args, 0)
        .and_then(Value::as_array)
        .is_some_and(|items| items.contains(&value));
    Ok(Value::Bool(found))
}

fn op_not(args: &[Option<Value>], _: &EvaluationContext, _: &dyn Evaluator) -> Result<Value, Error> {
    Ok(Value::Bool(!is_truthy(&value_arg(args, 0))))
}

fn op_exists(
    args: &[Option<Value>],
    _: &EvaluationContext,
    _: &dyn Evaluator,
) -> Result<Value, Error> {
    Ok(Value::Bool(!value_arg(args, 0).is_null()))
}

fn op_and(
    args: &[Option<Value>],
    context: &EvaluationContext,
    evaluator: &dyn Evaluator,
) -> Result<Value, Error> {
    let inner = context.descend();
    for expression in arg(args, 0).and_then(Value::as_array).into_iter().flatten() {
        if !is_truthy(&evaluator.evaluate(&inner, expression)?) {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

fn op_or(
    args: &[Option<Value>],
    context: &EvaluationContext,
    evaluator: &dyn Evaluator,
) -> Result<Value, Error> {
    let inner = context.descend();
    for expression in arg(args, 0).and_then(Value::as_array).into_iter().flatten() {
        if is_truthy(&evaluator.evaluate(&inner, expression)?) {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

fn string_test(args: &[Option<Value>], test: fn(&str, &str) -> bool) -> Value {
    let matched = match (str_arg(args, 0), str_arg(args, 1)) {
        (Some(search), Some(value)) => test(value, search),
        _ => false,
    };
    Value::Bool(matched)
}

fn op_string_starts_with(
    args: &[Option<Value>],
    _: &EvaluationContext,
    _: &dyn Evaluator,
) -> Result<Value, Error> {
    Ok(string_test(args, |value, search| value.starts_with(search)))
}

fn op_string_ends_with(
    args: &[Option<Value>],
    _: &EvaluationContext,
    _: &dyn Evaluator,
) -> Result<Value, Error> {
    Ok(string_test(args, |value, search| value.ends_with(search)))
}

fn op_string_includes(
    args: &[Option<Value>],
    _: &EvaluationContext,
    _: &dyn Evaluator,
) -> Result<Value, Error> {
    Ok(string_test(args, |value, search| value.contains(search)))
}

fn op_object_matches(
    args: &[Option<Value>],
    context: &EvaluationContext,
    evaluator: &dyn Evaluator,
) -> Result<Value, Error> {
    let Some(Value::Object(criteria)) = arg(args, 0) else {
        return Err(Error::invalid_expression("$objectMatches criteria must be an object"));
    };
    let subject = value_arg(args, 1);
    object_matches(criteria, &subject, context, evaluator).map(Value::Bool)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Engine;

    fn eval(subject: Value, expression: Value) -> Result<Value, Error> {
        Engine::new().evaluate(&EvaluationContext::new(subject), &expression)
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn value_resolves_subject_path() {
        let subject = json!({ "a": { "b": 1 } });
        assert_eq!(eval(subject.clone(), json!(["$value"])).unwrap(), subject);
        assert_eq!(eval(subject.clone(), json!(["$value", "a.b"])).unwrap(), json!(1));
        assert_eq!(eval(subject, json!(["$value", "a.c"])).unwrap(), json!(null));
    }

    #[test]
    fn eq_uses_subject_by_default() {
        assert_eq!(eval(json!("x"), json!(["$eq", "x"])).unwrap(), json!(true));
        assert_eq!(eval(json!("x"), json!(["$ne", "x"])).unwrap(), json!(false));
    }

    #[test]
    fn in_checks_membership() {
        assert_eq!(eval(json!("b"), json!(["$in", ["a", "b"]])).unwrap(), json!(true));
        assert_eq!(eval(json!("c"), json!(["$in", ["a", "b"]])).unwrap(), json!(false));
    }

    #[test]
    fn string_predicates() {
        let subject = json!("sub.example.com");
        assert_eq!(eval(subject.clone(), json!(["$stringEndsWith", ".com"])).unwrap(), json!(true));
        assert_eq!(eval(subject.clone(), json!(["$stringStartsWith", "sub."])).unwrap(), json!(true));
        assert_eq!(eval(subject.clone(), json!(["$stringIncludes", "example"])).unwrap(), json!(true));
        assert_eq!(eval(subject, json!(["$stringEndsWith", ".org"])).unwrap(), json!(false));
    }

    #[test]
    fn string_predicate_on_non_string_is_false() {
        assert_eq!(eval(json!(null), json!(["$stringEndsWith", ".com"])).unwrap(), json!(false));
    }

    #[test]
    fn logical_operators() {
        let subject = json!("example.com");
        let both = json!(["$and", [["$stringEndsWith", ".com"], ["$stringStartsWith", "ex"]]]);
        assert_eq!(eval(subject.clone(), both).unwrap(), json!(true));

        let either = json!(["$or", [["$eq", "a"], ["$eq", "example.com"]]]);
        assert_eq!(eval(subject.clone(), either).unwrap(), json!(true));

        let negated = json!(["$not", ["$eq", "example.com"]]);
        assert_eq!(eval(subject, negated).unwrap(), json!(false));
    }

    #[test]
    fn exists_tests_absence() {
        assert_eq!(eval(json!(null), json!(["$exists"])).unwrap(), json!(false));
        assert_eq!(eval(json!(""), json!(["$exists"])).unwrap(), json!(true));
    }

    #[test]
    fn object_matches_literals_and_predicates() {
        let subject = json!({ "hostname": "example.com", "searchParams": { "q": "v" } });

        let criteria = json!(["$objectMatches", {
            "hostname": ["$stringEndsWith", ".com"],
            "searchParams.q": "v"
        }]);
        assert_eq!(eval(subject.clone(), criteria).unwrap(), json!(true));

        let mismatch = json!(["$objectMatches", { "searchParams.q": "other" }]);
        assert_eq!(eval(subject.clone(), mismatch).unwrap(), json!(false));

        let absent = json!(["$objectMatches", { "searchParams.missing": ["$exists"] }]);
        assert_eq!(eval(subject.clone(), absent).unwrap(), json!(false));

        let absent_null = json!(["$objectMatches", { "searchParams.missing": null }]);
        assert_eq!(eval(subject, absent_null).unwrap(), json!(true));
    }

    #[test]
    fn object_matches_compares_unknown_calls_literally() {
        let subject = json!({ "tag": ["$custom"] });
        let criteria = json!(["$objectMatches", { "tag": ["$custom"] }]);
        assert_eq!(eval(subject.clone(), criteria).unwrap(), json!(true));

        let criteria = json!(["$objectMatches", { "tag": ["$other"] }]);
        assert_eq!(eval(subject, criteria).unwrap(), json!(false));
    }

    #[test]
    fn object_matches_literal_escape() {
        let subject = json!({ "rule": ["$eq", 1] });

        let escaped = json!(["$objectMatches", { "rule": ["$literal", ["$eq", 1]] }]);
        assert_eq!(eval(subject.clone(), escaped).unwrap(), json!(true));

        let evaluated = json!(["$objectMatches", { "rule": ["$eq", 1] }]);
        assert_eq!(eval(subject, evaluated).unwrap(), json!(false));
    }

    #[test]
    fn literal_omitted_is_null() {
        assert_eq!(eval(json!("subject"), json!(["$literal"])).unwrap(), json!(null));
    }

    #[test]
    fn object_matches_rejects_non_object_criteria() {
        let err = eval(json!({}), json!(["$objectMatches", "nope"])).unwrap_err();
        assert!(err.is_type_error());
    }
}
