//! Request plumbing shared by all Clarityboard resources.
//!
//! This module holds the pieces a request passes through on its way to the
//! API and back:
//!
//! - [`HttpMethod`], [`RequestOptions`] and form encoding via
//!   [`stringify_request_data`]
//! - [`ApiResponse`], the parsed body with its [`RawResponse`] attached
//! - [`ClarityboardError`], the error taxonomy every request path returns
//! - [`ClientEvent`] and [`EventEmitter`], the `request`/`response` events
//! - the `User-Agent` and `X-Clarityboard-Client-User-Agent` values
//!
//! # Error Handling
//!
//! ```rust,ignore
//! use clarityboard::{ClarityboardError, ErrorKind};
//!
//! match client.dashboards().retrieve("abc123").await {
//!     Ok(dashboard) => println!("{}", dashboard["name"]),
//!     Err(ClarityboardError::Authentication(details)) => {
//!         println!("Bad API key: {}", details.message);
//!     }
//!     Err(ClarityboardError::RateLimit(_)) => println!("Slow down"),
//!     Err(error) => println!("{}: {error}", error.type_name()),
//! }
//! ```

mod errors;
mod events;
pub(crate) mod http_request;
mod http_response;
mod user_agent;

pub use errors::{ClarityboardError, ErrorDetails, ErrorKind, UNKNOWN_ERROR_MESSAGE};
pub use events::{
    ClientEvent, EventEmitter, EventKind, ListenerId, RequestEvent, ResponseEvent,
};
pub use http_request::{stringify_request_data, HttpMethod, RequestOptions, RequestRecord};
pub use http_response::{ApiResponse, RawResponse};
pub use user_agent::{
    build_client_user_agent, default_seed, read_uname, user_agent_string, UserAgentCache,
    SDK_VERSION, UNKNOWN_UNAME,
};
