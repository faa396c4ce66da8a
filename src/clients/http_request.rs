//! HTTP request types for the Clarityboard API client.
//!
//! This module provides [`HttpMethod`], the per-call [`RequestOptions`], the
//! [`RequestRecord`] captured for every executed request, and the form
//! encoder used for request data.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// HTTP methods used by the Clarityboard API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating and updating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the wire name of the method, e.g. `"POST"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Returns `true` if request data travels in the query string rather
    /// than the body for this method.
    #[must_use]
    pub const fn sends_data_as_query(&self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HttpMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// Per-call request options.
///
/// Headers set here are merged last and override the defaults, matching
/// header names case-insensitively.
///
/// # Example
///
/// ```rust
/// use clarityboard::RequestOptions;
///
/// let options = RequestOptions::new()
///     .header("Clarityboard-Account", "acct_123")
///     .header("Idempotency-Key", "abc");
///
/// assert_eq!(options.headers().len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    headers: BTreeMap<String, String>,
}

impl RequestOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an extra header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert_header(&mut self.headers, name.into(), value.into());
        self
    }

    /// Returns the extra headers.
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Returns `true` if no options are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

/// A snapshot of an executed request, captured before it is sent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequestRecord {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The host override, if the call supplied one.
    pub host: Option<String>,
    /// The full request path.
    pub path: String,
    /// The request data before encoding.
    pub data: Value,
    /// The call-supplied auth key, if any.
    pub auth: Option<String>,
    /// The extra headers supplied with the call.
    pub headers: BTreeMap<String, String>,
}

/// Inserts a header, replacing any existing header with the same name
/// regardless of case.
pub(crate) fn insert_header(headers: &mut BTreeMap<String, String>, name: String, value: String) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}

/// Looks up a header by name, ignoring case.
pub(crate) fn find_header<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Form-encodes request data.
///
/// Nested objects use bracket notation (`metadata[key]=value`), scalar arrays
/// repeat the key (`tags[]=a&tags[]=b`), and arrays of objects are indexed
/// (`lines[0][amount]=1`). `null` values are skipped. Anything other than an
/// object encodes to an empty string.
///
/// # Example
///
/// ```rust
/// use clarityboard::clients::stringify_request_data;
/// use serde_json::json;
///
/// let encoded = stringify_request_data(&json!({
///     "dashboard": {"owner": "ops"},
///     "name": "Sales",
/// }));
/// assert_eq!(encoded, "dashboard[owner]=ops&name=Sales");
/// ```
#[must_use]
pub fn stringify_request_data(data: &Value) -> String {
    let mut pairs = Vec::new();
    if let Value::Object(map) = data {
        for (key, value) in map {
            flatten(key, value, &mut pairs);
        }
    }

    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode_key(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn flatten(prefix: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((prefix.to_string(), b.to_string())),
        Value::Number(n) => pairs.push((prefix.to_string(), n.to_string())),
        Value::String(s) => pairs.push((prefix.to_string(), s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if item.is_object() || item.is_array() {
                    flatten(&format!("{prefix}[{index}]"), item, pairs);
                } else {
                    flatten(&format!("{prefix}[]"), item, pairs);
                }
            }
        }
        Value::Object(map) => {
            for (key, nested) in map {
                flatten(&format!("{prefix}[{key}]"), nested, pairs);
            }
        }
    }
}

// Brackets stay readable in keys.
fn encode_key(key: &str) -> String {
    urlencoding::encode(key)
        .replace("%5B", "[")
        .replace("%5D", "]")
}
