//! HTTP response types for the Clarityboard API client.
//!
//! A successful call resolves to an [`ApiResponse`]: the parsed JSON body
//! plus the [`RawResponse`] it came from. Serializing an `ApiResponse`
//! reproduces the body alone; the raw response is reachable only through
//! [`ApiResponse::last_response`].

use std::collections::BTreeMap;
use std::ops::Deref;
use std::time::Duration;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Low-level details of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status_code: u16,
    /// Response headers, with lowercase names. Repeated headers are joined
    /// with `", "`.
    pub headers: BTreeMap<String, String>,
    /// The `request-id` header, if present.
    pub request_id: Option<String>,
    /// Time from issuing the request to receiving the full body.
    pub elapsed: Duration,
}

impl RawResponse {
    /// Collects response metadata from a `reqwest` header map.
    pub(crate) fn new(status_code: u16, headers: &reqwest::header::HeaderMap, elapsed: Duration) -> Self {
        let headers = parse_response_headers(headers);
        let request_id = headers.get("request-id").cloned();
        Self {
            status_code,
            headers,
            request_id,
            elapsed,
        }
    }

    /// Returns a header by its lowercase name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status_code >= 200 && self.status_code <= 299
    }
}

/// A parsed API response.
///
/// Dereferences to the JSON body, so fields can be read directly:
///
/// ```rust,ignore
/// let dashboard = client.dashboards().retrieve("abc123").await?;
/// println!("{}", dashboard["name"]);
/// println!("request id: {:?}", dashboard.last_response().request_id);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    body: Value,
    last_response: RawResponse,
}

impl ApiResponse {
    /// Creates a response from a parsed body and its raw response.
    #[must_use]
    pub const fn new(body: Value, last_response: RawResponse) -> Self {
        Self {
            body,
            last_response,
        }
    }

    /// Returns the parsed body.
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Consumes the response, returning the parsed body.
    #[must_use]
    pub fn into_body(self) -> Value {
        self.body
    }

    /// Returns the raw response this body was read from.
    #[must_use]
    pub const fn last_response(&self) -> &RawResponse {
        &self.last_response
    }
}

impl Deref for ApiResponse {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.body
    }
}

impl Serialize for ApiResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}

/// Flattens a `reqwest` header map into lowercase names.
pub(crate) fn parse_response_headers(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    let mut result: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let key = name.as_str().to_lowercase();
        let value = value.to_str().unwrap_or_default();
        result
            .entry(key)
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    result
}
