//! Constants shared by the URL operations and the host engine.

/// Base URL used when a URL is built from a field-set alone.
///
/// Protocol defaults to `https:`; every other component is overwritten or
/// left at the URL standard's empty value.
pub const DEFAULT_BASE_URL: &str = "https://host/";

/// Default maximum nesting depth of evaluated expressions.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Separator used by dot-paths such as `searchParams.query`.
pub const PATH_SEPARATOR: char = '.';

/// Operator name: return the argument without evaluating it.
pub const OP_LITERAL: &str = "$literal";

/// Operator name: build or normalize a URL.
pub const OP_URL: &str = "$url";

/// Operator name: parse a URL into its serializable record.
pub const OP_URL_PARSE: &str = "$urlParse";

/// Operator name: match a URL against path criteria.
pub const OP_URL_MATCHES: &str = "$urlMatches";

/// Operator name: update fields of an existing URL.
pub const OP_URL_SET: &str = "$urlSet";

/// Operator name: structural object matching.
pub const OP_OBJECT_MATCHES: &str = "$objectMatches";
