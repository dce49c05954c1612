//! Minimal expression engine hosting the URL operators.

use std::collections::HashMap;

use serde_json::Value;

use crate::builtins::builtin_operations;
use crate::config::EngineConfig;
use crate::context::EvaluationContext;
use crate::error::Error;
use crate::operation::OperationSpec;
use crate::operations::url_operations;
use crate::traits::Evaluator;

/// An expression engine over `serde_json::Value`.
///
/// An expression is a JSON array whose first element names a registered
/// operator, followed by its positional arguments:
///
/// ```text
/// ["$urlMatches", { "hostname": ["$stringEndsWith", ".com"] }]
/// ```
///
/// Every other value is a literal, including arrays headed by a name the
/// engine does not know. `["$literal", value]` yields `value` unevaluated.
///
/// Arguments that are themselves expressions are evaluated before the call.
/// Objects are never descended into, so predicate values inside a criteria
/// object stay unevaluated until the matcher applies them.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use url_expression::{Engine, EvaluationContext, Evaluator};
///
/// let engine = Engine::new();
/// let context = EvaluationContext::new(json!("https://example.com/?q=rust"));
///
/// let matched = engine
///     .evaluate(&context, &json!(["$urlMatches", { "searchParams.q": "rust" }]))
///     .unwrap();
/// assert_eq!(matched, json!(true));
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    operations: HashMap<&'static str, OperationSpec>,
}

impl Engine {
    /// Creates an engine with the built-in and URL operators.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates an engine with the built-in and URL operators and the given
    /// configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let mut engine = Self::empty(config);
        for operation in builtin_operations().into_iter().chain(url_operations()) {
            engine.register(operation);
        }
        engine
    }

    /// Creates an engine with no operators registered.
    #[must_use]
    pub fn empty(config: EngineConfig) -> Self {
        Self {
            config,
            operations: HashMap::new(),
        }
    }

    /// Registers an operator, returning the one it replaced, if any.
    pub fn register(&mut self, operation: OperationSpec) -> Option<OperationSpec> {
        self.operations.insert(operation.name, operation)
    }

    /// Returns true if an operator with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluates an expression with `subject` as the implicit value.
    ///
    /// # Errors
    ///
    /// See [`Evaluator::evaluate`].
    pub fn eval(&self, subject: Value, expression: &Value) -> Result<Value, Error> {
        self.evaluate(&EvaluationContext::new(subject), expression)
    }

    fn as_call<'v>(&self, value: &'v Value) -> Option<(&OperationSpec, &'v [Value])> {
        let Value::Array(items) = value else {
            return None;
        };
        let (head, args) = items.split_first()?;
        let operation = self.operations.get(head.as_str()?)?;
        Some((operation, args))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for Engine {
    fn evaluate(&self, context: &EvaluationContext, expression: &Value) -> Result<Value, Error> {
        let Some((operation, raw_args)) = self.as_call(expression) else {
            return Ok(expression.clone());
        };

        if context.depth() >= self.config.max_depth {
            return Err(Error::DepthExceeded {
                max: self.config.max_depth,
            });
        }

        tracing::debug!(operator = operation.name, args = raw_args.len(), "evaluating");

        let args = if operation.evaluate_args {
            let inner = context.descend();
            raw_args
                .iter()
                .map(|arg| self.evaluate(&inner, arg).map(Some))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            raw_args.iter().cloned().map(Some).collect()
        };

        operation.invoke(args, context, self)
    }

    fn is_expression(&self, value: &Value) -> bool {
        self.as_call(value).is_some()
    }

    fn default_base_url(&self) -> &str {
        &self.config.default_base_url
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::constants::{OP_LITERAL, OP_OBJECT_MATCHES, OP_URL, OP_URL_MATCHES, OP_URL_PARSE, OP_URL_SET};

    #[test]
    fn registers_url_operators() {
        let engine = Engine::new();
        for name in [OP_LITERAL, OP_URL, OP_URL_PARSE, OP_URL_MATCHES, OP_URL_SET, OP_OBJECT_MATCHES] {
            assert!(engine.contains(name), "{name} should be registered");
        }
    }

    #[test]
    fn literals_evaluate_to_themselves() {
        let engine = Engine::new();
        for literal in [json!(1), json!("x"), json!({ "a": ["$eq", 1] }), json!(["a", "b"]), json!([])] {
            assert_eq!(engine.eval(Value::Null, &literal).unwrap(), literal);
        }
    }

    #[test]
    fn unregistered_head_is_literal() {
        let engine = Engine::new();
        assert!(!engine.is_expression(&json!(["$nope"])));
        assert_eq!(engine.eval(Value::Null, &json!(["$nope", 1])).unwrap(), json!(["$nope", 1]));
    }

    #[test]
    fn literal_is_not_evaluated() {
        let engine = Engine::new();
        let out = engine.eval(Value::Null, &json!(["$literal", ["$eq", 1]])).unwrap();
        assert_eq!(out, json!(["$eq", 1]));

        let out = engine.eval(Value::Null, &json!(["$eq", ["$literal", ["$not"]], ["$literal", ["$not"]]])).unwrap();
        assert_eq!(out, json!(true));
    }

    #[test]
    fn empty_engine_knows_nothing() {
        let mut engine = Engine::empty(EngineConfig::default());
        assert!(!engine.contains(OP_URL));
        assert!(!engine.is_expression(&json!(["$url"])));

        for operation in url_operations() {
            engine.register(operation);
        }
        assert!(!engine.is_expression(&json!("$url")));
        assert!(engine.is_expression(&json!(["$url"])));
    }

    #[test]
    fn nested_arguments_are_evaluated() {
        let engine = Engine::new();
        let out = engine
            .eval(json!({ "a": "x" }), &json!(["$eq", ["$value", "a"], "x"]))
            .unwrap();
        assert_eq!(out, json!(true));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let engine = Engine::with_config(EngineConfig::new().with_max_depth(2));
        let deep = json!(["$not", ["$not", ["$not", true]]]);
        assert_eq!(engine.eval(Value::Null, &deep), Err(Error::DepthExceeded { max: 2 }));

        let shallow = json!(["$not", true]);
        assert_eq!(engine.eval(Value::Null, &shallow).unwrap(), json!(false));
    }

    #[test]
    fn config_base_url_is_exposed() {
        let engine = Engine::with_config(EngineConfig::new().with_default_base_url("http://x/"));
        assert_eq!(engine.default_base_url(), "http://x/");
        assert_eq!(engine.config().max_depth, 64);
    }
}
