//! Error taxonomy for the Clarityboard API client.
//!
//! Every failure on a request path is classified into exactly one
//! [`ClarityboardError`] variant before it reaches the caller. Raw transport
//! and parse failures never escape unclassified.
//!
//! # Error Handling
//!
//! - [`ClarityboardError::Connection`]: transport failures and timeouts
//! - [`ClarityboardError::Api`]: malformed responses and generic server faults
//! - [`ClarityboardError::InvalidRequest`]: bad input, as reported by the server
//!   or detected while resolving call arguments
//! - [`ClarityboardError::Authentication`], [`ClarityboardError::Permission`],
//!   [`ClarityboardError::RateLimit`]: status-code driven API errors
//! - [`ClarityboardError::SignatureVerification`]: webhook signature failures
//! - [`ClarityboardError::Generic`]: server error types this client does not know
//!
//! # Example
//!
//! ```rust,ignore
//! use clarityboard::{Clarityboard, ClarityboardError};
//!
//! match client.dashboards().retrieve("abc123").await {
//!     Ok(dashboard) => println!("{}", dashboard["name"]),
//!     Err(ClarityboardError::Authentication(details)) => {
//!         println!("bad key ({:?}): {}", details.status_code, details.message);
//!     }
//!     Err(ClarityboardError::Connection { details, .. }) => {
//!         println!("connection failed: {}", details.message);
//!     }
//!     Err(e) => println!("{} {}", e.type_name(), e),
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Message used for unrecognized server error types.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown Error";

/// Context attached to a classified error.
///
/// Carries enough of the wire response (status, headers, request ID and raw
/// payload) to act on the error without re-inspecting the response.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ErrorDetails {
    /// Human readable message.
    pub message: String,
    /// The server-reported error `type` string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_type: Option<String>,
    /// Machine readable error code (`ETIMEDOUT` for timeouts).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// The request parameter implicated in the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    /// Additional detail text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// The raw server payload (or raw body for unparseable responses).
    pub raw: Value,
    /// Response headers, with lowercase names.
    pub headers: BTreeMap<String, String>,
    /// The `request-id` response header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// The HTTP status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ErrorDetails {
    /// Creates details carrying only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Extracts details from a server error envelope such as
    /// `{"type": "api_error", "message": "...", "code": "...", "param": "..."}`.
    ///
    /// Numeric codes are kept in their decimal string form.
    #[must_use]
    pub fn from_raw(raw: &Value) -> Self {
        let text = |key: &str| match raw.get(key) {
            Some(Value::String(value)) => Some(value.clone()),
            Some(Value::Number(value)) => Some(value.to_string()),
            _ => None,
        };

        Self {
            message: text("message").unwrap_or_default(),
            raw_type: text("type"),
            code: text("code"),
            param: text("param"),
            detail: text("detail"),
            raw: raw.clone(),
            ..Self::default()
        }
    }

    /// Sets the machine readable code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the implicated parameter.
    #[must_use]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    /// Attaches the response context: headers, request ID and status code.
    #[must_use]
    pub fn with_response(
        mut self,
        status_code: u16,
        headers: BTreeMap<String, String>,
        request_id: Option<String>,
    ) -> Self {
        self.status_code = Some(status_code);
        self.headers = headers;
        self.request_id = request_id;
        self
    }
}

/// The kind of a [`ClarityboardError`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport failure or timeout.
    Connection,
    /// Malformed response or generic server fault.
    Api,
    /// Bad input.
    InvalidRequest,
    /// HTTP 401.
    Authentication,
    /// HTTP 403.
    Permission,
    /// HTTP 429.
    RateLimit,
    /// Webhook signature failure.
    SignatureVerification,
    /// Unrecognized server error type.
    Generic,
}

impl ErrorKind {
    /// Returns the stable type name of this kind.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Connection => "ClarityboardConnectionError",
            Self::Api => "ClarityboardAPIError",
            Self::InvalidRequest => "ClarityboardInvalidRequestError",
            Self::Authentication => "ClarityboardAuthenticationError",
            Self::Permission => "ClarityboardPermissionError",
            Self::RateLimit => "ClarityboardRateLimitError",
            Self::SignatureVerification => "ClarityboardSignatureVerificationError",
            Self::Generic => "GenericError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Unified error type for every Clarityboard request.
#[derive(Debug, Error)]
pub enum ClarityboardError {
    /// The connection failed or the request timed out.
    #[error("{}", .details.message)]
    Connection {
        /// Error context. Timeouts carry the code `ETIMEDOUT`.
        details: ErrorDetails,
        /// The underlying transport error, when there is one.
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The API returned an invalid response or reported a server fault.
    #[error("{}", .0.message)]
    Api(ErrorDetails),

    /// The request was rejected as invalid.
    #[error("{}", .0.message)]
    InvalidRequest(ErrorDetails),

    /// The API key was rejected (HTTP 401).
    #[error("{}", .0.message)]
    Authentication(ErrorDetails),

    /// The API key lacks permission (HTTP 403).
    #[error("{}", .0.message)]
    Permission(ErrorDetails),

    /// Too many requests (HTTP 429).
    #[error("{}", .0.message)]
    RateLimit(ErrorDetails),

    /// A webhook signature could not be verified.
    #[error("{}", .0.message)]
    SignatureVerification(ErrorDetails),

    /// The server reported an error type this client does not recognize.
    #[error("{}", .details.message)]
    Generic {
        /// Always `"Generic"`.
        error_type: String,
        /// Error context.
        details: ErrorDetails,
    },
}

// Verify ClarityboardError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClarityboardError>();
};

impl ClarityboardError {
    /// Classifies a server error envelope by its `type` string.
    ///
    /// `invalid_request_error` becomes [`InvalidRequest`](Self::InvalidRequest),
    /// `api_error` becomes [`Api`](Self::Api), and anything else becomes
    /// [`Generic`](Self::Generic) with the message `Unknown Error`.
    #[must_use]
    pub fn generate(details: ErrorDetails) -> Self {
        match details.raw_type.as_deref() {
            Some("invalid_request_error") => Self::InvalidRequest(details),
            Some("api_error") => Self::Api(details),
            _ => Self::Generic {
                error_type: "Generic".to_string(),
                details: ErrorDetails {
                    message: UNKNOWN_ERROR_MESSAGE.to_string(),
                    ..details
                },
            },
        }
    }

    /// Classifies an error response, giving the status code precedence over
    /// the server-reported type.
    #[must_use]
    pub fn from_response(status_code: u16, details: ErrorDetails) -> Self {
        match status_code {
            401 => Self::Authentication(details),
            403 => Self::Permission(details),
            429 => Self::RateLimit(details),
            _ => Self::generate(details),
        }
    }

    /// Creates a connection error from a transport failure.
    #[must_use]
    pub fn connection(message: impl Into<String>, source: Option<reqwest::Error>) -> Self {
        Self::Connection {
            details: ErrorDetails::new(message),
            source,
        }
    }

    /// Creates an invalid request error naming the offending parameter.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>, param: Option<&str>) -> Self {
        let details = ErrorDetails::new(message);
        Self::InvalidRequest(match param {
            Some(param) => details.with_param(param),
            None => details,
        })
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection { .. } => ErrorKind::Connection,
            Self::Api(_) => ErrorKind::Api,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::Permission(_) => ErrorKind::Permission,
            Self::RateLimit(_) => ErrorKind::RateLimit,
            Self::SignatureVerification(_) => ErrorKind::SignatureVerification,
            Self::Generic { .. } => ErrorKind::Generic,
        }
    }

    /// Returns the stable type name, e.g. `ClarityboardInvalidRequestError`.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    /// Returns the error context.
    #[must_use]
    pub const fn details(&self) -> &ErrorDetails {
        match self {
            Self::Connection { details, .. } | Self::Generic { details, .. } => details,
            Self::Api(details)
            | Self::InvalidRequest(details)
            | Self::Authentication(details)
            | Self::Permission(details)
            | Self::RateLimit(details)
            | Self::SignatureVerification(details) => details,
        }
    }

    /// Returns the HTTP status code, if the error came from a response.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        self.details().status_code
    }

    /// Returns the `request-id` header of the failed response, if any.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.details().request_id.as_deref()
    }

    /// Returns the machine readable error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.details().code.as_deref()
    }
}
