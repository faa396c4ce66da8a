//! REST resource infrastructure for the Clarityboard API.
//!
//! This module provides:
//!
//! - **[`MethodSpec`]**: declarative, `const`-constructible operation
//!   descriptors, with the prepared [`BASIC_METHODS`]
//! - **[`Operation`]**: a spec bound to a resource, callable with
//!   [`RequestParams`] or a positional argument list
//! - **[`Resource`]**: one API collection and the generic request primitive
//!   [`Resource::execute`]
//! - **[`ApiResource`] trait**: named business resources and method lookup
//! - **Path building**: [`interpolate`] and [`join_path`]
//!
//! Individual resources (Dashboards, Records, ...) are implemented in the
//! [`resources`] submodule.
//!
//! # Example: Declaring a Custom Method
//!
//! ```rust,ignore
//! use clarityboard::rest::{MethodSpec, RequestParams, Resource};
//! use clarityboard::{Clarityboard, HttpMethod};
//!
//! const SHARE: MethodSpec = MethodSpec::new(HttpMethod::Post, "{id}/share", &["id"]);
//!
//! let client = Clarityboard::new("sk_test")?;
//! let dashboards = Resource::new(&client, "dashboards");
//!
//! // POST /v/dashboards/abc123/share
//! let shared = dashboards
//!     .method(SHARE)
//!     .call(RequestParams::new().url_param("abc123"))
//!     .await?;
//! ```
//!
//! # Example: Positional Arguments
//!
//! ```rust,ignore
//! use clarityboard::rest::{ApiResource, BASIC_METHODS};
//! use serde_json::json;
//!
//! let retrieve = client.dashboards().resource().method(BASIC_METHODS.retrieve);
//!
//! // id, then an options hash carrying a per-call key
//! let dashboard = retrieve
//!     .call_args(vec![json!("abc123"), json!({"api_key": "sk_other"})])
//!     .await?;
//! ```

mod method;
mod path;
mod resource;

pub mod resources;

pub use method::{
    resolve_args, BasicMethods, MethodSpec, MethodType, Operation, RequestParams, BASIC_METHODS,
    OPTIONS_KEYS,
};
pub use path::{interpolate, join_path, placeholders};
pub use resource::{
    ApiResource, DataProcessor, Resource, CLIENT_USER_AGENT_HEADER, CONNECTION_ERROR_MESSAGE,
    INVALID_JSON_MESSAGE,
};
