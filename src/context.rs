//! Evaluation context threaded through operator calls.

use serde_json::Value;

/// The context an expression is evaluated in.
///
/// Carries the implicit subject that operators fall back to when their
/// default parameter is omitted, plus the current nesting depth.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvaluationContext {
    subject: Value,
    depth: usize,
}

impl EvaluationContext {
    /// Creates a root context with the given subject.
    #[must_use]
    pub const fn new(subject: Value) -> Self {
        Self { subject, depth: 0 }
    }

    /// Returns the implicit subject.
    #[must_use]
    pub const fn subject(&self) -> &Value {
        &self.subject
    }

    /// Returns the nesting depth of this context.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Returns a nested context with the same subject.
    #[must_use]
    pub fn descend(&self) -> Self {
        Self {
            subject: self.subject.clone(),
            depth: self.depth + 1,
        }
    }

    /// Returns a nested context evaluating against a new subject.
    #[must_use]
    pub const fn with_subject(&self, subject: Value) -> Self {
        Self {
            subject,
            depth: self.depth + 1,
        }
    }
}
