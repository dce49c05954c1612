//! Operator registrations.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::context::EvaluationContext;
use crate::error::{ArgumentTypeError, Error};
use crate::traits::Evaluator;
use crate::type_spec::{TypeSpec, kind_of};

/// Signature of an operator implementation.
///
/// Arguments arrive already evaluated and validated against the operator's
/// parameter specs. `None` marks an omitted ("undefined") argument.
pub type Handler =
    fn(&[Option<Value>], &EvaluationContext, &dyn Evaluator) -> Result<Value, Error>;

/// A named positional parameter with its accepted shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name used in error messages
    pub name: &'static str,
    /// Accepted shape
    pub spec: TypeSpec,
}

impl ParamSpec {
    /// Creates a parameter spec.
    #[must_use]
    pub const fn new(name: &'static str, spec: TypeSpec) -> Self {
        Self { name, spec }
    }
}

/// An operator as registered with an engine: implementation, parameter
/// specs and the index of the parameter that defaults to the subject.
#[derive(Clone)]
pub struct OperationSpec {
    /// Operator name, e.g. `$urlParse`
    pub name: &'static str,
    /// Positional parameters
    pub params: Vec<ParamSpec>,
    /// Parameter that falls back to the context subject when omitted
    pub default_param: Option<usize>,
    /// Implementation
    pub handler: Handler,
    /// Whether argument expressions are evaluated before the call
    pub evaluate_args: bool,
}

impl OperationSpec {
    /// Creates an operation whose last parameter defaults to the subject.
    #[must_use]
    pub fn new(name: &'static str, params: Vec<ParamSpec>, handler: Handler) -> Self {
        let default_param = params.len().checked_sub(1);
        Self {
            name,
            params,
            default_param,
            handler,
            evaluate_args: true,
        }
    }

    /// Overrides which parameter defaults to the subject.
    #[must_use]
    pub fn with_default_param(mut self, index: Option<usize>) -> Self {
        self.default_param = index;
        self
    }

    /// Passes arguments to the handler exactly as written.
    #[must_use]
    pub fn with_raw_args(mut self) -> Self {
        self.evaluate_args = false;
        self
    }

    /// Fills omitted arguments, validates them and calls the handler.
    ///
    /// # Errors
    ///
    /// Returns `Error::Type` if an argument fails its spec, otherwise
    /// whatever the handler returns.
    pub fn invoke(
        &self,
        mut args: Vec<Option<Value>>,
        context: &EvaluationContext,
        evaluator: &dyn Evaluator,
    ) -> Result<Value, Error> {
        if args.len() < self.params.len() {
            args.resize(self.params.len(), None);
        }

        if let Some(slot) = self
            .default_param
            .and_then(|index| args.get_mut(index))
            .filter(|slot| slot.is_none())
        {
            *slot = Some(context.subject().clone());
        }

        for (param, arg) in self.params.iter().zip(&args) {
            param
                .spec
                .check_argument(self.name, param.name, arg.as_ref())?;
        }

        (self.handler)(&args, context, evaluator)
    }
}

impl fmt::Debug for OperationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationSpec")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("default_param", &self.default_param)
            .field("evaluate_args", &self.evaluate_args)
            .finish_non_exhaustive()
    }
}

/// Returns the argument at `index`, if supplied.
#[must_use]
pub fn arg(args: &[Option<Value>], index: usize) -> Option<&Value> {
    args.get(index).and_then(Option::as_ref)
}

/// Returns a string argument, if supplied as a string.
#[must_use]
pub fn str_arg(args: &[Option<Value>], index: usize) -> Option<&str> {
    arg(args, index).and_then(Value::as_str)
}

/// Deserializes an argument into a typed value.
///
/// # Errors
///
/// Returns `Error::Type` naming the parameter if the value does not
/// deserialize.
pub fn decode_arg<T: DeserializeOwned>(
    operation: &str,
    parameter: &str,
    value: Option<&Value>,
) -> Result<T, Error> {
    let found = kind_of(value);
    serde_json::from_value(value.cloned().unwrap_or(Value::Null)).map_err(|e| {
        Error::Type(ArgumentTypeError {
            operation: operation.to_string(),
            parameter: parameter.to_string(),
            expected: e.to_string(),
            found,
        })
    })
}
