//! # Clarityboard API Rust Client
//!
//! A Rust client for the Clarityboard REST API, covering dashboards,
//! records, record groups and reports.
//!
//! ## Overview
//!
//! This crate provides:
//! - A client façade, [`Clarityboard`], with live configuration setters
//! - Typed configuration via [`ClarityboardConfig`] and [`ClarityboardConfigBuilder`]
//! - Declarative resource methods ([`rest::MethodSpec`]) over a generic
//!   request primitive ([`rest::Resource::execute`])
//! - A single error taxonomy, [`ClarityboardError`], for every request path
//! - `request` and `response` events for observing traffic
//! - Webhook signature verification via [`webhooks`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clarityboard::Clarityboard;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Clarityboard::new("your-api-key")?;
//!
//! let dashboard = client.dashboards().create(json!({"name": "Sales"})).await?;
//! let fetched = client
//!     .dashboards()
//!     .retrieve(dashboard["id"].as_str().unwrap_or_default())
//!     .await?;
//! println!("{}", fetched["name"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use std::time::Duration;
//! use clarityboard::{ApiKey, AppInfo, Clarityboard, ClarityboardConfig};
//!
//! let config = ClarityboardConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .timeout(Duration::from_secs(30))
//!     .app_info(AppInfo::new("MyApp", Some("https://myapp.example".to_string())).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let client = Clarityboard::with_config(config);
//! assert_eq!(client.timeout(), Duration::from_secs(30));
//!
//! // Settings can still change after construction
//! client.set_timeout(None);
//! assert_eq!(client.timeout(), clarityboard::DEFAULT_TIMEOUT);
//! ```
//!
//! ## Per-call Options
//!
//! ```rust,ignore
//! use clarityboard::rest::RequestParams;
//!
//! let report = client
//!     .reports()
//!     .create_with(
//!         RequestParams::new()
//!             .data(json!({"dashboard": "abc123"}))
//!             .api_key("sk_other_account")
//!             .header("Idempotency-Key", "report-2024-01"),
//!     )
//!     .await?;
//! ```
//!
//! ## Logging
//!
//! The crate logs through [`tracing`]: requests and responses at `debug`,
//! timeouts and transport failures at `warn`. API keys are never logged.
//!
//! ## Design Principles
//!
//! - **No global state**: every client owns its configuration, listeners and caches
//! - **Fail-fast validation**: newtypes validate on construction
//! - **Thread-safe**: all public types are `Send + Sync`
//! - **Async-first**: designed for the Tokio runtime

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;
pub mod webhooks;

mod client;

pub use client::Clarityboard;
pub use config::{
    ApiKey, AppInfo, ClarityboardConfig, ClarityboardConfigBuilder, Protocol, DEFAULT_BASE_PATH,
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT,
};
pub use error::ConfigError;

// Re-export request types
pub use clients::{
    ApiResponse, ClarityboardError, ClientEvent, ErrorDetails, ErrorKind, EventKind, HttpMethod,
    ListenerId, RawResponse, RequestEvent, RequestOptions, RequestRecord, ResponseEvent,
};
