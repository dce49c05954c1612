//! Evaluator trait consumed by the URL operations.

use serde_json::Value;

use crate::constants::DEFAULT_BASE_URL;
use crate::context::EvaluationContext;
use crate::error::Error;

/// The host engine contract.
///
/// Operations receive the evaluator that invoked them so they can evaluate
/// nested expressions, such as the predicate values of a criteria object.
/// [`Engine`](crate::Engine) is the implementation shipped with this crate;
/// any other engine that honours the same contract can host the URL
/// operations from [`url_operations`](crate::url_operations).
pub trait Evaluator: Send + Sync {
    /// Evaluates an expression against a context.
    ///
    /// Values that are not expressions evaluate to themselves.
    ///
    /// # Errors
    ///
    /// Returns `Error` if an operator is unknown, an argument fails its type
    /// spec, or an operator itself fails.
    fn evaluate(&self, context: &EvaluationContext, expression: &Value) -> Result<Value, Error>;

    /// Returns true if the value is an operator call rather than a literal.
    fn is_expression(&self, value: &Value) -> bool;

    /// Base URL that field-sets are applied to when no URL is given.
    fn default_base_url(&self) -> &str {
        DEFAULT_BASE_URL
    }
}
