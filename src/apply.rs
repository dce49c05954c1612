//! Building and updating URLs from field-sets.

use url::{Url, form_urlencoded, quirks};

use crate::constants::DEFAULT_BASE_URL;
use crate::error::{Error, InputError};
use crate::input::{UrlInput, UrlSource};

/// Applies a field-set to a base URL and returns the resulting `href`.
///
/// Fields are applied in a fixed order, each only when present:
///
/// 1. `protocol`
/// 2. `username`, then `password`, independently of each other
/// 3. the host, set to `hostname` when given and to `host` otherwise
/// 4. `port`, after the host so a `host:port` value cannot clobber it
/// 5. `pathname`
/// 6. `searchParams`, which replaces the query and wins over `search`;
///    otherwise `search`
/// 7. `hash`, skipped when empty
///
/// Values go through the WHATWG URL setters. A setter that rejects its value
/// leaves the URL unchanged, as the URL standard specifies.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if neither `host` nor `hostname` is a
/// non-empty string; this is checked before `base` is parsed. Returns
/// `Error::Url` if `base` is not a valid absolute URL.
///
/// # Examples
///
/// ```
/// use url_expression::{UrlInput, apply_url_input};
///
/// let input = UrlInput::new().with_host("test.org").with_port("");
/// let href = apply_url_input("https://sub.example.com:8080/p?q=1", &input).unwrap();
/// assert_eq!(href, "https://test.org/p?q=1");
/// ```
pub fn apply_url_input(base: &str, input: &UrlInput) -> Result<String, Error> {
    let host = input.resolved_host().ok_or(InputError::MissingHost)?;

    let mut url = Url::parse(base)?;

    if let Some(protocol) = &input.protocol {
        setter("protocol", protocol, quirks::set_protocol(&mut url, protocol));
    }

    if let Some(username) = &input.username {
        setter("username", username, quirks::set_username(&mut url, username));
    }

    if let Some(password) = &input.password {
        setter("password", password, quirks::set_password(&mut url, password));
    }

    setter("host", host, quirks::set_host(&mut url, host));

    if let Some(port) = &input.port {
        let port = port.to_string();
        setter("port", &port, quirks::set_port(&mut url, &port));
    }

    if let Some(pathname) = &input.pathname {
        quirks::set_pathname(&mut url, pathname);
    }

    if let Some(pairs) = &input.search_params {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        quirks::set_search(&mut url, &query);
    } else if let Some(search) = &input.search {
        quirks::set_search(&mut url, search);
    }

    if let Some(hash) = input.hash.as_deref().filter(|h| !h.is_empty()) {
        quirks::set_hash(&mut url, hash);
    }

    Ok(url.into())
}

/// Builds a URL from scratch against the default base `https://host/`.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if neither `host` nor `hostname` is given.
pub fn build_url(input: &UrlInput) -> Result<String, Error> {
    apply_url_input(DEFAULT_BASE_URL, input)
}

/// Updates an existing URL; fields absent from `input` are preserved.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if neither `host` nor `hostname` is given,
/// or `Error::Url` if `url` does not parse.
pub fn update_url(url: &str, input: &UrlInput) -> Result<String, Error> {
    apply_url_input(url, input)
}

/// Parses a URL string, resolving it against `base` when given, and returns
/// its normalized serialization.
///
/// # Errors
///
/// Returns `Error::Url` if `base` or `input` is rejected by the URL parser.
///
/// # Examples
///
/// ```
/// use url_expression::resolve_url;
///
/// assert_eq!(resolve_url("HTTPS://Example.com", None).unwrap(), "https://example.com/");
/// assert_eq!(
///     resolve_url("../c?x=1", Some("https://example.com/a/b/")).unwrap(),
///     "https://example.com/a/c?x=1"
/// );
/// ```
pub fn resolve_url(input: &str, base: Option<&str>) -> Result<String, Error> {
    let url = match base {
        Some(base) => {
            let base = Url::parse(base)?;
            Url::options().base_url(Some(&base)).parse(input)?
        }
        None => Url::parse(input)?,
    };
    Ok(url.into())
}

/// Produces a URL string from either branch of a [`UrlSource`].
///
/// Raw strings are resolved against `base`; field-sets are applied to
/// `default_base` and ignore `base`.
///
/// # Errors
///
/// Propagates the errors of [`resolve_url`] and [`apply_url_input`].
pub fn url_from_source(
    source: &UrlSource,
    base: Option<&str>,
    default_base: &str,
) -> Result<String, Error> {
    match source {
        UrlSource::Raw(input) => resolve_url(input, base),
        UrlSource::Fields(input) => apply_url_input(default_base, input),
    }
}

fn setter(component: &'static str, value: &str, result: Result<(), ()>) {
    if result.is_err() {
        tracing::debug!(component, value, "URL setter rejected value; component left unchanged");
    }
}
