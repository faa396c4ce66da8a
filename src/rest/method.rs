//! The method factory.
//!
//! A [`MethodSpec`] declares one API operation: its HTTP verb, its path
//! suffix and the URL parameters the suffix needs. Binding a spec to a
//! [`Resource`] yields an [`Operation`], which resolves call arguments into
//! a request and hands it to [`Resource::execute`].
//!
//! Arguments come in two shapes:
//!
//! - [`RequestParams`], an explicit builder, via [`Operation::call`]
//! - a positional argument list, via [`Operation::call_args`], resolved by
//!   the pure function [`resolve_args`]
//!
//! # Example
//!
//! ```rust,ignore
//! use clarityboard::rest::{RequestParams, BASIC_METHODS};
//! use serde_json::json;
//!
//! let retrieve = client.dashboards().resource().method(BASIC_METHODS.retrieve);
//!
//! // Explicit
//! let dashboard = retrieve.call(RequestParams::new().url_param("abc123")).await?;
//!
//! // Positional: id, then an auth key
//! let dashboard = retrieve.call_args(vec![json!("abc123"), json!("sk_other")]).await?;
//! ```

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::clients::{
    stringify_request_data, ApiResponse, ClarityboardError, HttpMethod, RequestOptions,
};
use crate::rest::path::placeholders;
use crate::rest::resource::Resource;

/// Keys that configure a call rather than belong to its data.
pub const OPTIONS_KEYS: &[&str] = &["api_key"];

/// How an operation treats its data argument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MethodType {
    /// Data is the request payload.
    #[default]
    Standard,
    /// Data is a flat set of query parameters.
    List,
}

/// Declarative description of one API operation.
///
/// This is a `const fn`-constructible descriptor, so operations can be
/// declared as constants.
///
/// # Example
///
/// ```rust
/// use clarityboard::rest::{MethodSpec, MethodType};
/// use clarityboard::HttpMethod;
///
/// const ARCHIVE: MethodSpec = MethodSpec::new(HttpMethod::Post, "{id}/archive", &["id"]);
/// const SEARCH: MethodSpec = MethodSpec::list(HttpMethod::Get, "search");
///
/// assert_eq!(ARCHIVE.url_params, &["id"]);
/// assert_eq!(SEARCH.method_type, MethodType::List);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodSpec {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The path suffix, relative to the resource path. May contain `{name}`
    /// placeholders.
    pub path: &'static str,
    /// Names of the positional URL parameters, in call order.
    pub url_params: &'static [&'static str],
    /// How the data argument is treated.
    pub method_type: MethodType,
}

impl MethodSpec {
    /// Creates a standard method spec.
    #[must_use]
    pub const fn new(
        method: HttpMethod,
        path: &'static str,
        url_params: &'static [&'static str],
    ) -> Self {
        Self {
            method,
            path,
            url_params,
            method_type: MethodType::Standard,
        }
    }

    /// Creates a list method spec without URL parameters.
    #[must_use]
    pub const fn list(method: HttpMethod, path: &'static str) -> Self {
        Self {
            method,
            path,
            url_params: &[],
            method_type: MethodType::List,
        }
    }

    /// Returns the number of positional URL parameters.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.url_params.len()
    }
}

/// The five basic methods shared by resources.
#[derive(Clone, Copy, Debug)]
pub struct BasicMethods {
    /// `POST <resource>`
    pub create: MethodSpec,
    /// `GET <resource>`, data as query parameters
    pub list: MethodSpec,
    /// `GET <resource>/{id}`
    pub retrieve: MethodSpec,
    /// `POST <resource>/{id}`
    pub update: MethodSpec,
    /// `DELETE <resource>/{id}`
    pub del: MethodSpec,
}

/// The prepared basic methods.
pub const BASIC_METHODS: BasicMethods = BasicMethods {
    create: MethodSpec::new(HttpMethod::Post, "", &[]),
    list: MethodSpec::list(HttpMethod::Get, ""),
    retrieve: MethodSpec::new(HttpMethod::Get, "/{id}", &["id"]),
    update: MethodSpec::new(HttpMethod::Post, "{id}", &["id"]),
    del: MethodSpec::new(HttpMethod::Delete, "{id}", &["id"]),
};

/// Explicit arguments for one call.
///
/// # Example
///
/// ```rust
/// use clarityboard::rest::RequestParams;
/// use serde_json::json;
///
/// let params = RequestParams::new()
///     .url_param("abc123")
///     .data(json!({"name": "Sales"}))
///     .api_key("sk_other")
///     .header("Clarityboard-Account", "acct_1");
///
/// assert_eq!(params.url_params(), &["abc123".to_string()]);
/// assert_eq!(params.auth(), Some("sk_other"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestParams {
    url_params: Vec<String>,
    data: Option<Value>,
    api_key: Option<String>,
    options: RequestOptions,
    host: Option<String>,
}

impl RequestParams {
    /// Creates empty params.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next positional URL parameter.
    #[must_use]
    pub fn url_param(mut self, value: impl Into<String>) -> Self {
        self.url_params.push(value.into());
        self
    }

    /// Sets the request data.
    #[must_use]
    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Overrides the client's API key for this call.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Adds an extra request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options = self.options.header(name, value);
        self
    }

    /// Replaces the request options.
    #[must_use]
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Overrides the configured host for this call.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Returns the positional URL parameters.
    #[must_use]
    pub fn url_params(&self) -> &[String] {
        &self.url_params
    }

    /// Returns the request data, if any.
    #[must_use]
    pub const fn data_value(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Returns the per-call API key, if any.
    #[must_use]
    pub fn auth(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns the request options.
    #[must_use]
    pub const fn request_options(&self) -> &RequestOptions {
        &self.options
    }

    /// Returns the host override, if any.
    #[must_use]
    pub fn host_override(&self) -> Option<&str> {
        self.host.as_deref()
    }
}

/// Returns `true` for a non-empty object whose keys are all option keys.
fn is_options_map(object: &Map<String, Value>) -> bool {
    !object.is_empty() && object.keys().all(|key| OPTIONS_KEYS.contains(&key.as_str()))
}

fn url_param_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn api_key_from(object: &Map<String, Value>) -> Option<String> {
    object
        .get("api_key")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

/// Resolves a positional argument list into [`RequestParams`].
///
/// The list is read in this order:
///
/// 1. exactly `spec.arity()` URL parameters, each a non-empty string or a number
/// 2. optionally a data object, unless it holds option keys only; option
///    keys found in it (such as `api_key`) are removed and applied
/// 3. optionally a trailing auth key string, or a trailing options object
///    such as `{"api_key": "..."}`
///
/// # Errors
///
/// Returns [`ClarityboardError::InvalidRequest`] naming the parameter when a
/// URL parameter is missing or has the wrong type, and when arguments are
/// left over after resolution.
///
/// # Example
///
/// ```rust
/// use clarityboard::rest::{resolve_args, BASIC_METHODS};
/// use serde_json::json;
///
/// let params = resolve_args(
///     &BASIC_METHODS.retrieve,
///     vec![json!("abc123"), json!({"api_key": "sk_other"})],
/// )
/// .unwrap();
///
/// assert_eq!(params.url_params(), &["abc123".to_string()]);
/// assert_eq!(params.auth(), Some("sk_other"));
/// assert!(params.data_value().is_none());
/// ```
pub fn resolve_args(spec: &MethodSpec, args: Vec<Value>) -> Result<RequestParams, ClarityboardError> {
    let mut args = args.into_iter().peekable();
    let mut params = RequestParams::new();

    for &name in spec.url_params {
        let arg = args.next().unwrap_or(Value::Null);
        let value = url_param_value(&arg).ok_or_else(|| {
            ClarityboardError::invalid_request(
                format!("Clarityboard: Argument \"{name}\" required, but got: {arg}"),
                Some(name),
            )
        })?;
        params = params.url_param(value);
    }

    let takes_data = matches!(args.peek(), Some(Value::Object(object)) if !is_options_map(object));
    if takes_data {
        if let Some(Value::Object(mut data)) = args.next() {
            let found: Vec<&str> = OPTIONS_KEYS
                .iter()
                .copied()
                .filter(|key| data.contains_key(*key))
                .collect();
            if !found.is_empty() {
                tracing::warn!(
                    "Clarityboard: options found in arguments ({}). Did you mean to pass an options object?",
                    found.join(", ")
                );
                if let Some(key) = api_key_from(&data) {
                    params = params.api_key(key);
                }
                for key in found {
                    data.remove(key);
                }
            }
            params = params.data(Value::Object(data));
        }
    }

    let remaining: Vec<Value> = args.collect();
    let mut remaining = remaining.into_iter();
    match (remaining.next(), remaining.len()) {
        (None, _) => {}
        (Some(Value::String(key)), 0) if !key.is_empty() => params = params.api_key(key),
        (Some(Value::Object(options)), 0) if is_options_map(&options) => {
            if let Some(key) = api_key_from(&options) {
                params = params.api_key(key);
            }
        }
        (Some(first), _) => {
            let leftover: Vec<String> = std::iter::once(first)
                .chain(remaining)
                .map(|arg| arg.to_string())
                .collect();
            return Err(ClarityboardError::invalid_request(
                format!(
                    "Clarityboard: Unknown arguments ({}). Did you mean to pass an options object?",
                    leftover.join(", ")
                ),
                None,
            ));
        }
    }

    Ok(params)
}

/// A method spec bound to a resource.
#[derive(Clone, Copy, Debug)]
pub struct Operation<'a> {
    resource: &'a Resource,
    spec: MethodSpec,
}

impl<'a> Operation<'a> {
    pub(crate) const fn new(resource: &'a Resource, spec: MethodSpec) -> Self {
        Self { resource, spec }
    }

    /// Returns the bound method spec.
    #[must_use]
    pub const fn spec(&self) -> &MethodSpec {
        &self.spec
    }

    /// Returns the full path this operation requests for the given URL
    /// parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ClarityboardError::InvalidRequest`] if the number of URL
    /// parameters does not match the spec.
    pub fn full_path(&self, url_params: &[String]) -> Result<String, ClarityboardError> {
        if let Some(missing) = self.spec.url_params.get(url_params.len()) {
            return Err(ClarityboardError::invalid_request(
                format!("Clarityboard: Argument \"{missing}\" required, but got: undefined"),
                Some(*missing),
            ));
        }
        if url_params.len() > self.spec.arity() {
            return Err(ClarityboardError::invalid_request(
                format!(
                    "Clarityboard: Unknown arguments ({}). Expected {} URL parameter(s).",
                    url_params[self.spec.arity()..].join(", "),
                    self.spec.arity()
                ),
                None,
            ));
        }

        let mut url_data: BTreeMap<String, String> = self.resource.url_data().clone();
        for (name, value) in self.spec.url_params.iter().zip(url_params) {
            url_data.insert((*name).to_string(), value.clone());
        }

        let unfilled = placeholders(self.resource.path())
            .into_iter()
            .chain(placeholders(self.spec.path))
            .find(|name| !url_data.contains_key(*name));
        if let Some(name) = unfilled {
            return Err(ClarityboardError::invalid_request(
                format!("Clarityboard: Argument \"{name}\" required, but got: undefined"),
                Some(name),
            ));
        }

        Ok(self.resource.create_full_path(self.spec.path, &url_data))
    }

    /// Executes the operation with explicit params.
    ///
    /// # Errors
    ///
    /// Returns [`ClarityboardError::InvalidRequest`] for bad URL parameters,
    /// and any error of [`Resource::execute`].
    pub async fn call(&self, params: RequestParams) -> Result<ApiResponse, ClarityboardError> {
        let mut path = self.full_path(&params.url_params)?;
        let mut data = params.data.unwrap_or_else(|| Value::Object(Map::new()));

        if self.spec.method_type == MethodType::List && !self.spec.method.sends_data_as_query() {
            let query = stringify_request_data(&data);
            if !query.is_empty() {
                path = format!("{path}?{query}");
            }
            data = Value::Object(Map::new());
        }

        self.resource
            .execute(
                self.spec.method,
                params.host.as_deref(),
                &path,
                &data,
                params.api_key.as_deref(),
                &params.options,
            )
            .await
    }

    /// Resolves a positional argument list with [`resolve_args`] and executes
    /// the operation.
    ///
    /// # Errors
    ///
    /// Returns any error of [`resolve_args`] or [`Operation::call`].
    pub async fn call_args(&self, args: Vec<Value>) -> Result<ApiResponse, ClarityboardError> {
        let params = resolve_args(&self.spec, args)?;
        self.call(params).await
    }

    /// Executes the operation and reports the outcome to `callback` before
    /// returning it.
    ///
    /// The callback runs exactly once, with the same outcome the returned
    /// future resolves to.
    ///
    /// # Errors
    ///
    /// Returns any error of [`Operation::call`].
    pub async fn call_with_callback<F>(
        &self,
        params: RequestParams,
        callback: F,
    ) -> Result<ApiResponse, ClarityboardError>
    where
        F: FnOnce(Result<&ApiResponse, &ClarityboardError>),
    {
        let result = self.call(params).await;
        callback(result.as_ref());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_basic_methods_shape() {
        assert_eq!(BASIC_METHODS.create.method, HttpMethod::Post);
        assert_eq!(BASIC_METHODS.create.path, "");
        assert_eq!(BASIC_METHODS.list.method_type, MethodType::List);
        assert_eq!(BASIC_METHODS.retrieve.path, "/{id}");
        assert_eq!(BASIC_METHODS.retrieve.url_params, &["id"]);
        assert_eq!(BASIC_METHODS.update.method, HttpMethod::Post);
        assert_eq!(BASIC_METHODS.del.method, HttpMethod::Delete);
    }

    #[test]
    fn test_resolve_url_param_then_auth_string() {
        let params =
            resolve_args(&BASIC_METHODS.retrieve, vec![json!("abc123"), json!("sk_key")]).unwrap();
        assert_eq!(params.url_params(), &["abc123".to_string()]);
        assert_eq!(params.auth(), Some("sk_key"));
        assert!(params.data_value().is_none());
    }

    #[test]
    fn test_resolve_numeric_url_param() {
        let params = resolve_args(&BASIC_METHODS.retrieve, vec![json!(42)]).unwrap();
        assert_eq!(params.url_params(), &["42".to_string()]);
    }

    #[test]
    fn test_resolve_missing_url_param_fails() {
        let error = resolve_args(&BASIC_METHODS.retrieve, vec![]).unwrap_err();
        assert!(matches!(error, ClarityboardError::InvalidRequest(_)));
        assert_eq!(error.details().param.as_deref(), Some("id"));
    }

    #[test]
    fn test_resolve_object_in_url_param_position_fails() {
        let error =
            resolve_args(&BASIC_METHODS.retrieve, vec![json!({"name": "x"})]).unwrap_err();
        assert_eq!(error.details().param.as_deref(), Some("id"));
    }

    #[test]
    fn test_resolve_data_and_auth() {
        let params = resolve_args(
            &BASIC_METHODS.create,
            vec![json!({"name": "Sales"}), json!("sk_key")],
        )
        .unwrap();
        assert_eq!(params.data_value(), Some(&json!({"name": "Sales"})));
        assert_eq!(params.auth(), Some("sk_key"));
    }

    #[test]
    fn test_resolve_options_hash_alone_is_not_data() {
        let params =
            resolve_args(&BASIC_METHODS.create, vec![json!({"api_key": "sk_key"})]).unwrap();
        assert!(params.data_value().is_none());
        assert_eq!(params.auth(), Some("sk_key"));
    }

    #[test]
    fn test_resolve_extracts_api_key_mixed_into_data() {
        let params = resolve_args(
            &BASIC_METHODS.create,
            vec![json!({"name": "Sales", "api_key": "sk_key"})],
        )
        .unwrap();
        assert_eq!(params.data_value(), Some(&json!({"name": "Sales"})));
        assert_eq!(params.auth(), Some("sk_key"));
    }

    #[test]
    fn test_resolve_data_then_options_hash() {
        let params = resolve_args(
            &BASIC_METHODS.create,
            vec![json!({"name": "Sales"}), json!({"api_key": "sk_key"})],
        )
        .unwrap();
        assert_eq!(params.data_value(), Some(&json!({"name": "Sales"})));
        assert_eq!(params.auth(), Some("sk_key"));
    }

    #[test]
    fn test_resolve_unknown_arguments_fail() {
        let error = resolve_args(
            &BASIC_METHODS.create,
            vec![json!("something random"), json!({"name": "Some name"})],
        )
        .unwrap_err();
        assert!(matches!(error, ClarityboardError::InvalidRequest(_)));
        assert!(error.to_string().contains("Unknown arguments"));
    }

    #[test]
    fn test_resolve_extra_url_like_argument_fails() {
        let error = resolve_args(
            &BASIC_METHODS.retrieve,
            vec![json!("abc"), json!("def"), json!("ghi")],
        )
        .unwrap_err();
        assert!(error.to_string().contains("Unknown arguments"));
    }

    #[test]
    fn test_resolve_empty_object_is_data() {
        let params = resolve_args(&BASIC_METHODS.list, vec![json!({})]).unwrap();
        assert_eq!(params.data_value(), Some(&json!({})));
    }

    fn nested_widgets() -> Resource {
        let client = crate::Clarityboard::new("fakeAuthToken").unwrap();
        Resource::new(&client, "dashboards/{dashboard}/widgets")
    }

    #[test]
    fn test_full_path_fills_resource_url_data() {
        let mut url_data = BTreeMap::new();
        url_data.insert("dashboard".to_string(), "d1".to_string());
        let widgets = nested_widgets().with_url_data(url_data);

        let path = widgets
            .method(BASIC_METHODS.retrieve)
            .full_path(&["w2".to_string()])
            .unwrap();
        assert_eq!(path, "/v/dashboards/d1/widgets/w2");
    }

    #[test]
    fn test_full_path_rejects_unfilled_placeholder() {
        let widgets = nested_widgets();

        let error = widgets
            .method(BASIC_METHODS.retrieve)
            .full_path(&["w2".to_string()])
            .unwrap_err();
        assert!(matches!(error, ClarityboardError::InvalidRequest(_)));
        assert_eq!(error.details().param.as_deref(), Some("dashboard"));
        assert!(error.to_string().contains("\"dashboard\" required"));
    }

    #[test]
    fn test_missing_url_param_names_the_param() {
        let error = resolve_args(&BASIC_METHODS.retrieve, vec![]).unwrap_err();
        assert_eq!(error.details().param.as_deref(), Some("id"));
        assert_eq!(error.details().status_code, None);
    }
}
