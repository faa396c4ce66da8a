//! The resource base.
//!
//! A [`Resource`] is one API collection (such as `dashboards`) bound to a
//! client. It owns the generic request primitive, [`Resource::execute`],
//! which every [`Operation`] ends in:
//!
//! 1. encode the data (form encoding, or the resource's [`DataProcessor`])
//! 2. build the headers, with call-supplied headers merged last
//! 3. emit the `request` event and send, under the configured timeout
//! 4. emit the `response` event and parse the JSON body
//! 5. classify an `error` envelope, or resolve with the parsed body
//!
//! Business resources wrap a `Resource` and implement [`ApiResource`].
//!
//! # Example
//!
//! ```rust,ignore
//! use clarityboard::rest::{ApiResource, RequestParams};
//! use clarityboard::{Clarityboard, HttpMethod, RequestOptions};
//! use serde_json::json;
//!
//! let client = Clarityboard::new("sk_test")?;
//! let dashboards = client.dashboards();
//!
//! // Through a named operation
//! let created = dashboards.invoke("create", RequestParams::new().data(json!({"name": "Sales"}))).await?;
//!
//! // Through the raw primitive
//! let raw = dashboards
//!     .resource()
//!     .execute(HttpMethod::Get, None, "/v/dashboards", &json!({}), None, &RequestOptions::new())
//!     .await?;
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::client::{Clarityboard, ClientState};
use crate::clients::http_request::{find_header, insert_header};
use crate::clients::{
    stringify_request_data, ApiResponse, ClarityboardError, ClientEvent, ErrorDetails,
    HttpMethod, RawResponse, RequestEvent, RequestOptions, RequestRecord, ResponseEvent,
};
use crate::rest::method::{MethodSpec, Operation, RequestParams};
use crate::rest::path::{interpolate, join_path};

/// Header carrying the JSON client user agent.
pub const CLIENT_USER_AGENT_HEADER: &str = "X-Clarityboard-Client-User-Agent";

/// Message of the error returned for unparseable response bodies.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON received from the Clarityboard API";

/// Message of the error returned for transport failures.
pub const CONNECTION_ERROR_MESSAGE: &str = "An error occurred with our connection to Clarityboard";

/// Replaces form encoding for a resource.
///
/// Receives the method, the request data and the call options, and returns
/// the encoded request data.
pub type DataProcessor =
    Arc<dyn Fn(HttpMethod, &Value, &RequestOptions) -> Result<String, ClarityboardError> + Send + Sync>;

/// One API collection bound to a client.
#[derive(Clone)]
pub struct Resource {
    state: Arc<ClientState>,
    path: String,
    url_data: BTreeMap<String, String>,
    data_processor: Option<DataProcessor>,
}

// Verify Resource is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource>();
};

impl Resource {
    /// Creates a resource at `path` (relative to the base path) for `client`.
    #[must_use]
    pub fn new(client: &Clarityboard, path: impl Into<String>) -> Self {
        Self::from_state(Arc::clone(client.state()), path)
    }

    pub(crate) fn from_state(state: Arc<ClientState>, path: impl Into<String>) -> Self {
        Self {
            state,
            path: path.into(),
            url_data: BTreeMap::new(),
            data_processor: None,
        }
    }

    /// Sets URL data used to fill path placeholders, such as a parent ID
    /// for nested resources.
    #[must_use]
    pub fn with_url_data(mut self, url_data: BTreeMap<String, String>) -> Self {
        self.url_data = url_data;
        self
    }

    /// Replaces form encoding with a custom data processor.
    #[must_use]
    pub fn with_data_processor<F>(mut self, processor: F) -> Self
    where
        F: Fn(HttpMethod, &Value, &RequestOptions) -> Result<String, ClarityboardError>
            + Send
            + Sync
            + 'static,
    {
        self.data_processor = Some(Arc::new(processor));
        self
    }

    /// Returns the resource path template.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the resource's own URL data.
    #[must_use]
    pub const fn url_data(&self) -> &BTreeMap<String, String> {
        &self.url_data
    }

    /// Binds a method spec to this resource.
    #[must_use]
    pub const fn method(&self, spec: MethodSpec) -> Operation<'_> {
        Operation::new(self, spec)
    }

    /// Joins the base path, the resource path and `command_path`, filling
    /// placeholders in all three from `url_data`.
    #[must_use]
    #[allow(clippy::implicit_hasher)]
    pub fn create_full_path(&self, command_path: &str, url_data: &BTreeMap<String, String>) -> String {
        let base_path = self.state.base_path();
        join_path(&[
            &interpolate(&base_path, url_data),
            &interpolate(&self.path, url_data),
            &interpolate(command_path, url_data),
        ])
    }

    /// Returns the resource-relative path with placeholders left in, e.g.
    /// `/dashboards/{id}`.
    #[must_use]
    pub fn create_resource_path_with_symbols(&self, path_with_symbols: &str) -> String {
        join_path(&[&self.path, path_with_symbols])
    }

    /// Builds the default request headers.
    ///
    /// `auth` overrides the client's API key. The `Authorization` header is
    /// left out when neither is set.
    #[must_use]
    pub fn default_headers(&self, auth: Option<&str>, content_length: usize) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();

        let authorization = auth
            .map(|key| format!("Bearer {key}"))
            .or_else(|| self.state.auth());
        if let Some(authorization) = authorization {
            headers.insert("Authorization".to_string(), authorization);
        }
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        headers.insert("Content-Length".to_string(), content_length.to_string());
        headers.insert("User-Agent".to_string(), self.state.user_agent());

        headers
    }

    /// Executes one request against the API.
    ///
    /// For `GET` and `DELETE` the encoded data is sent as the query string,
    /// otherwise as the body. `host` and `auth` override the configured host
    /// and API key for this call only.
    ///
    /// # Errors
    ///
    /// - [`ClarityboardError::Connection`] on transport failure, or with code
    ///   `ETIMEDOUT` when the configured timeout elapses
    /// - [`ClarityboardError::Api`] when the body is not valid JSON
    /// - the classified error when the body carries an `error` envelope
    pub async fn execute(
        &self,
        method: HttpMethod,
        host: Option<&str>,
        path: &str,
        data: &Value,
        auth: Option<&str>,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ClarityboardError> {
        self.state.record_request(RequestRecord {
            method,
            host: host.map(ToString::to_string),
            path: path.to_string(),
            data: data.clone(),
            auth: auth.map(ToString::to_string),
            headers: options.headers().clone(),
        });

        let encoded = match &self.data_processor {
            Some(processor) => processor(method, data, options)?,
            None => stringify_request_data(data),
        };
        let (query, body) = if method.sends_data_as_query() {
            (encoded, String::new())
        } else {
            (String::new(), encoded)
        };

        let mut headers = self.default_headers(auth, body.len());
        insert_header(
            &mut headers,
            CLIENT_USER_AGENT_HEADER.to_string(),
            self.state.client_user_agent().await,
        );
        for (name, value) in options.headers() {
            insert_header(&mut headers, name.clone(), value.clone());
        }

        let settings = self.state.settings();
        let mut url = format!(
            "{}://{}:{}{}",
            settings.protocol,
            host.unwrap_or(&settings.host),
            settings.port,
            path
        );
        if !query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }

        let http = self.state.http_client(settings.http_client.as_ref())?;
        let mut request = http.request(method.into(), &url);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        let request_event = RequestEvent {
            account: find_header(&headers, "Clarityboard-Account").map(ToString::to_string),
            method,
            path: path.to_string(),
        };

        tracing::debug!(method = %method, path, "Issuing Clarityboard request");
        self.state.emit(&ClientEvent::Request(request_event));
        let started = Instant::now();

        let exchange = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, headers, text))
        };

        let (status, response_headers, text) =
            match tokio::time::timeout(settings.timeout, exchange).await {
                Err(_) => {
                    let timeout_ms = settings.timeout.as_millis();
                    tracing::warn!(method = %method, path, "Request aborted after {timeout_ms}ms timeout");
                    return Err(ClarityboardError::Connection {
                        details: ErrorDetails::new(format!(
                            "Request aborted due to timeout being reached ({timeout_ms}ms)"
                        ))
                        .with_code("ETIMEDOUT"),
                        source: None,
                    });
                }
                Ok(Err(error)) => {
                    tracing::warn!(method = %method, path, "Connection to Clarityboard failed: {error}");
                    return Err(ClarityboardError::connection(
                        CONNECTION_ERROR_MESSAGE,
                        Some(error),
                    ));
                }
                Ok(Ok(exchange)) => exchange,
            };

        let raw = RawResponse::new(status, &response_headers, started.elapsed());
        tracing::debug!(
            method = %method,
            path,
            status,
            elapsed = ?raw.elapsed,
            "Received Clarityboard response"
        );
        self.state.emit(&ClientEvent::Response(response_event(method, path, &raw)));

        handle_response(raw, &text)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path)
            .field("url_data", &self.url_data)
            .field("data_processor", &self.data_processor.is_some())
            .finish_non_exhaustive()
    }
}

fn response_event(method: HttpMethod, path: &str, raw: &RawResponse) -> ResponseEvent {
    let header = |name: &str| raw.header(name).map(ToString::to_string);
    ResponseEvent {
        api_version: header("clarityboard-version"),
        account: header("clarityboard-account"),
        idempotency_key: header("idempotency-key"),
        method,
        path: path.to_string(),
        status: raw.status_code,
        request_id: raw.request_id.clone(),
        elapsed: u64::try_from(raw.elapsed.as_millis()).unwrap_or(u64::MAX),
    }
}

/// Turns a received body into the call's outcome.
fn handle_response(raw: RawResponse, body: &str) -> Result<ApiResponse, ClarityboardError> {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::warn!(status = raw.status_code, "Invalid JSON received: {error}");
            return Err(ClarityboardError::Api(ErrorDetails {
                message: INVALID_JSON_MESSAGE.to_string(),
                detail: Some(error.to_string()),
                raw: Value::String(body.to_string()),
                request_id: raw.request_id,
                ..ErrorDetails::default()
            }));
        }
    };

    match parsed.get("error") {
        Some(error) if is_truthy(error) => {
            let mut details = ErrorDetails::from_raw(error);
            if let Value::String(message) = error {
                details.message.clone_from(message);
            }
            let details = details.with_response(raw.status_code, raw.headers, raw.request_id);
            Err(ClarityboardError::from_response(raw.status_code, details))
        }
        _ => Ok(ApiResponse::new(parsed, raw)),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A business resource: a named [`Resource`] with a fixed set of methods.
///
/// Implementors declare their path and methods; [`operation`](Self::operation)
/// and [`invoke`](Self::invoke) look methods up by name.
#[allow(async_fn_in_trait)]
pub trait ApiResource: Sized {
    /// The resource name, e.g. `"Dashboards"`.
    const NAME: &'static str;

    /// The resource path relative to the base path, e.g. `"dashboards"`.
    const PATH: &'static str;

    /// The named methods this resource supports.
    const METHODS: &'static [(&'static str, MethodSpec)];

    /// Wraps a resource already set up at [`PATH`](Self::PATH).
    fn from_resource(resource: Resource) -> Self;

    /// Returns the underlying resource.
    fn resource(&self) -> &Resource;

    /// Looks up a named operation.
    fn operation(&self, name: &str) -> Option<Operation<'_>> {
        Self::METHODS
            .iter()
            .find(|(method_name, _)| *method_name == name)
            .map(|(_, spec)| self.resource().method(*spec))
    }

    /// Invokes a named operation.
    ///
    /// # Errors
    ///
    /// Returns [`ClarityboardError::InvalidRequest`] if the resource has no
    /// method called `name`, and any error of the operation otherwise.
    async fn invoke(&self, name: &str, params: RequestParams) -> Result<ApiResponse, ClarityboardError> {
        let operation = self.operation(name).ok_or_else(|| {
            ClarityboardError::invalid_request(
                format!("{} has no method named \"{name}\"", Self::NAME),
                None,
            )
        })?;
        operation.call(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};
    use serde_json::json;
    use std::time::Duration;

    fn raw(status: u16, request_id: Option<&'static str>) -> RawResponse {
        let mut headers = HeaderMap::new();
        if let Some(request_id) = request_id {
            headers.insert("request-id", HeaderValue::from_static(request_id));
        }
        RawResponse::new(status, &headers, Duration::from_millis(3))
    }

    fn resource() -> Resource {
        let client = Clarityboard::new("fakeAuthToken").unwrap();
        Resource::new(&client, "dashboards")
    }

    #[test]
    fn test_create_resource_path_with_symbols() {
        assert_eq!(
            resource().create_resource_path_with_symbols("{id}"),
            "/dashboards/{id}"
        );
    }

    #[test]
    fn test_create_full_path() {
        let mut url_data = BTreeMap::new();
        url_data.insert("id".to_string(), "abc123".to_string());
        assert_eq!(
            resource().create_full_path("/{id}", &url_data),
            "/v/dashboards/abc123"
        );
        assert_eq!(
            resource().create_full_path("", &BTreeMap::new()),
            "/v/dashboards"
        );
    }

    #[test]
    fn test_default_headers_use_global_key() {
        let headers = resource().default_headers(None, 0);
        assert_eq!(
            headers.get("Authorization").map(String::as_str),
            Some("Bearer fakeAuthToken")
        );
        assert_eq!(headers.get("Content-Length").map(String::as_str), Some("0"));
        assert_eq!(
            headers.get("Content-Type").map(String::as_str),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(headers.get("Accept").map(String::as_str), Some("application/json"));
        assert!(headers
            .get("User-Agent")
            .is_some_and(|ua| ua.starts_with("Clarityboard/v1 RustBindings/")));
    }

    #[test]
    fn test_default_headers_use_specified_key() {
        let headers = resource().default_headers(Some("anotherFakeAuthToken"), 12);
        assert_eq!(
            headers.get("Authorization").map(String::as_str),
            Some("Bearer anotherFakeAuthToken")
        );
        assert_eq!(headers.get("Content-Length").map(String::as_str), Some("12"));
    }

    #[test]
    fn test_handle_response_success_keeps_body() {
        let body = json!({"id": "abc123", "object": "dashboard"});
        let response = handle_response(raw(200, Some("req_1")), &body.to_string()).unwrap();
        assert_eq!(response.body(), &body);
        assert_eq!(response.last_response().status_code, 200);
        assert_eq!(response.last_response().request_id.as_deref(), Some("req_1"));
    }

    #[test]
    fn test_handle_response_invalid_json() {
        let error = handle_response(raw(200, Some("req_bad")), "not json").unwrap_err();
        match &error {
            ClarityboardError::Api(details) => {
                assert_eq!(details.message, INVALID_JSON_MESSAGE);
                assert_eq!(details.request_id.as_deref(), Some("req_bad"));
                assert_eq!(details.raw, json!("not json"));
                assert!(details.detail.is_some());
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_handle_response_classifies_by_status_first() {
        let body = json!({"error": {"type": "api_error", "message": "x"}}).to_string();
        let error = handle_response(raw(401, Some("req_401")), &body).unwrap_err();

        assert!(matches!(error, ClarityboardError::Authentication(_)));
        assert_eq!(error.to_string(), "x");
        assert_eq!(error.status_code(), Some(401));
        assert_eq!(error.request_id(), Some("req_401"));
    }

    #[test]
    fn test_handle_response_classifies_by_type() {
        let body = json!({"error": {"type": "invalid_request_error", "message": "bad", "param": "name"}})
            .to_string();
        let error = handle_response(raw(400, None), &body).unwrap_err();

        assert!(matches!(error, ClarityboardError::InvalidRequest(_)));
        assert_eq!(error.details().param.as_deref(), Some("name"));
        assert_eq!(error.status_code(), Some(400));
    }

    #[test]
    fn test_handle_response_null_error_is_success() {
        let response = handle_response(raw(200, None), r#"{"error": null, "ok": true}"#).unwrap();
        assert_eq!(response["ok"], true);
    }

    #[test]
    fn test_response_event_omits_missing_headers() {
        let event = response_event(HttpMethod::Post, "/v/dashboards", &raw(200, None));
        let value = serde_json::to_value(event).unwrap();
        let object = value.as_object().unwrap();

        assert!(!object.contains_key("request_id"));
        assert!(!object.contains_key("api_version"));
        assert_eq!(object["method"], "POST");
        assert_eq!(object["status"], 200);
        assert_eq!(object["elapsed"], 3);
    }
}
