//! Configuration for the expression engine.

use crate::constants::{DEFAULT_BASE_URL, DEFAULT_MAX_DEPTH};

/// Configuration for [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Base URL that `$url` applies field-sets to.
    ///
    /// Default: `https://host/`
    pub default_base_url: String,

    /// Maximum nesting depth of evaluated expressions.
    ///
    /// Default: 64
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_base_url: DEFAULT_BASE_URL.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default base URL.
    #[must_use]
    pub fn with_default_base_url(mut self, base: impl Into<String>) -> Self {
        self.default_base_url = base.into();
        self
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
