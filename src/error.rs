//! Error types for URL operations and expression evaluation.

use std::fmt;

/// Errors returned by the URL operations and the host engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An argument did not match its declared type spec
    Type(ArgumentTypeError),
    /// A field-set could not be applied to a URL
    InvalidInput(InputError),
    /// The URL primitive rejected a URL string; carried unchanged
    Url(url::ParseError),
    /// An expression was structurally invalid
    InvalidExpression {
        /// Reason for invalidity
        reason: String,
    },
    /// Expression nesting exceeded the configured limit
    DepthExceeded {
        /// Maximum allowed depth
        max: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(e) => write!(f, "{e}"),
            Self::InvalidInput(e) => write!(f, "{e}"),
            Self::Url(e) => write!(f, "invalid URL: {e}"),
            Self::InvalidExpression { reason } => write!(f, "invalid expression: {reason}"),
            Self::DepthExceeded { max } => {
                write!(f, "expression nesting exceeds maximum depth {max}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Type(e) => Some(e),
            Self::InvalidInput(e) => Some(e),
            Self::Url(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArgumentTypeError> for Error {
    fn from(e: ArgumentTypeError) -> Self {
        Self::Type(e)
    }
}

impl From<InputError> for Error {
    fn from(e: InputError) -> Self {
        Self::InvalidInput(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Self::Url(e)
    }
}

impl Error {
    /// Creates an `InvalidExpression` error.
    #[must_use]
    pub fn invalid_expression(reason: impl Into<String>) -> Self {
        Self::InvalidExpression {
            reason: reason.into(),
        }
    }

    /// Returns true if this error came from argument shape validation.
    #[must_use]
    pub const fn is_type_error(&self) -> bool {
        matches!(self, Self::Type(_))
    }
}

/// An operation argument that does not match its declared type spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentTypeError {
    /// Name of the operation being invoked
    pub operation: String,
    /// The offending parameter, with a dotted field path for nested values
    pub parameter: String,
    /// The accepted type union, e.g. `string | number | undefined`
    pub expected: String,
    /// The kind of value actually supplied
    pub found: &'static str,
}

impl fmt::Display for ArgumentTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid argument '{}' for {}: expected {}, found {}",
            self.parameter, self.operation, self.expected, self.found
        )
    }
}

impl std::error::Error for ArgumentTypeError {}

/// Errors for applying a field-set to a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// Neither `host` nor `hostname` was supplied
    MissingHost,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHost => write!(f, "Either host or hostname must be provided"),
        }
    }
}

impl std::error::Error for InputError {}
