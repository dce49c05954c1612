//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use url_expression::prelude::*;
//!
//! let record = SerializableUrl::parse("https://example.com").unwrap();
//! assert_eq!(record.hostname, "example.com");
//! ```

pub use crate::{
    // Records and inputs
    Port, SearchParams, SerializableUrl, UrlInput, UrlSource,
    // Operations
    apply_url_input, build_url, parse_url, resolve_url, update_url, url_matches,
    // Engine
    Engine, EngineConfig, EvaluationContext, Evaluator, OperationSpec,
    // Errors
    ArgumentTypeError, Error, InputError,
};
