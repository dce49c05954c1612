//! Field-set input for building and updating URLs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A port given either as text or as a number.
///
/// Numbers are stringified before they reach the URL port setter, so
/// `Port::from(8080_u16)` and `Port::from("8080")` behave the same. An empty
/// text port clears the URL's port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Port {
    /// Numeric port
    Number(serde_json::Number),
    /// Textual port
    Text(String),
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u16> for Port {
    fn from(port: u16) -> Self {
        Self::Number(port.into())
    }
}

impl From<&str> for Port {
    fn from(port: &str) -> Self {
        Self::Text(port.to_string())
    }
}

impl From<String> for Port {
    fn from(port: String) -> Self {
        Self::Text(port)
    }
}

/// A partial description of URL components.
///
/// Every field is optional. Absent fields leave the base URL untouched when
/// the input is applied; see [`apply_url_input`](crate::apply_url_input) for
/// the precedence rules between overlapping fields.
///
/// # Examples
///
/// ```
/// use url_expression::{UrlInput, build_url};
///
/// let input = UrlInput::new()
///     .with_hostname("localhost")
///     .with_port(9000_u16)
///     .with_search_param("key", "value");
///
/// assert_eq!(build_url(&input).unwrap(), "https://localhost:9000/?key=value");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlInput {
    /// Scheme, with or without the trailing colon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Host, optionally with `:port`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Hostname; takes precedence over `host`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Port, applied after the host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<Port>,
    /// Path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathname: Option<String>,
    /// Raw query, with or without the leading `?`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Query pairs in order; replaces `search` when present
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "search_pairs"
    )]
    pub search_params: Option<Vec<(String, String)>>,
    /// Fragment, with or without the leading `#`; ignored when empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl UrlInput {
    /// Creates an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the protocol.
    #[must_use]
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Sets the username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the hostname.
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Sets the port.
    #[must_use]
    pub fn with_port(mut self, port: impl Into<Port>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Sets the pathname.
    #[must_use]
    pub fn with_pathname(mut self, pathname: impl Into<String>) -> Self {
        self.pathname = Some(pathname.into());
        self
    }

    /// Sets the raw search string.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Appends a query pair, creating the pair list if needed.
    #[must_use]
    pub fn with_search_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.search_params
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// Sets the hash.
    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Returns the value the URL host setter receives: a non-empty
    /// `hostname`, else a non-empty `host`.
    #[must_use]
    pub fn resolved_host(&self) -> Option<&str> {
        self.hostname
            .as_deref()
            .filter(|h| !h.is_empty())
            .or_else(|| self.host.as_deref().filter(|h| !h.is_empty()))
    }
}

/// Either a ready-made URL string or a field-set to build one from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UrlSource {
    /// A URL string, possibly relative to a base
    Raw(String),
    /// A field-set applied to the default base URL
    Fields(UrlInput),
}

impl From<&str> for UrlSource {
    fn from(s: &str) -> Self {
        Self::Raw(s.to_string())
    }
}

impl From<String> for UrlSource {
    fn from(s: String) -> Self {
        Self::Raw(s)
    }
}

impl From<UrlInput> for UrlSource {
    fn from(input: UrlInput) -> Self {
        Self::Fields(input)
    }
}

/// (De)serializes query pairs as a JSON object, keeping key order.
///
/// Scalar values are coerced to strings the way a query serializer would
/// (`1` becomes `"1"`, `true` becomes `"true"`).
mod search_pairs {
    use serde::de::{self, Deserializer, MapAccess, Visitor};
    use serde::ser::{SerializeMap, Serializer};
    use serde_json::Value;
    use std::fmt;

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(pairs: &Option<Vec<(String, String)>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match pairs {
            Some(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (k, v) in pairs {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<(String, String)>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(OptionVisitor)
    }

    struct OptionVisitor;

    impl<'de> Visitor<'de> for OptionVisitor {
        type Value = Option<Vec<(String, String)>>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of query parameters")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_map(PairsVisitor).map(Some)
        }
    }

    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of query parameters")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, Value>()? {
                let value = match value {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => "null".to_string(),
                    Value::Array(_) | Value::Object(_) => {
                        return Err(de::Error::custom(format!(
                            "query parameter '{key}' must be a scalar value"
                        )));
                    }
                };
                pairs.push((key, value));
            }
            Ok(pairs)
        }
    }
}
