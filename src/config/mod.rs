//! Configuration types for the Clarityboard client.
//!
//! # Overview
//!
//! - [`ClarityboardConfig`]: initial settings for a [`Clarityboard`](crate::Clarityboard) client
//! - [`ClarityboardConfigBuilder`]: a builder for [`ClarityboardConfig`]
//! - [`ApiKey`], [`AppInfo`], [`Protocol`]: validated value types
//!
//! A config only seeds a client. After construction the client's own setters
//! change the live settings, and every request reads them at call time.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use clarityboard::{ApiKey, ClarityboardConfig, Protocol};
//!
//! let config = ClarityboardConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .host("localhost")
//!     .port(9001)
//!     .protocol(Protocol::Http)
//!     .timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.port(), 9001);
//! ```

mod newtypes;

use std::time::Duration;

pub use newtypes::{ApiKey, AppInfo, Protocol};

use crate::error::ConfigError;

/// Default API host.
pub const DEFAULT_HOST: &str = "api.clarityboard.com";

/// Default API port.
pub const DEFAULT_PORT: u16 = 443;

/// Default base path prepended to every resource path.
pub const DEFAULT_BASE_PATH: &str = "/v/";

/// Default request timeout (two minutes, the usual HTTP server default).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Initial configuration for a Clarityboard client.
#[derive(Clone, Debug)]
pub struct ClarityboardConfig {
    api_key: Option<ApiKey>,
    host: String,
    port: u16,
    protocol: Protocol,
    base_path: String,
    timeout: Duration,
    app_info: Option<AppInfo>,
    http_client: Option<reqwest::Client>,
}

impl ClarityboardConfig {
    /// Creates a new builder for constructing a `ClarityboardConfig`.
    #[must_use]
    pub fn builder() -> ClarityboardConfigBuilder {
        ClarityboardConfigBuilder::new()
    }

    /// Returns the API key, if configured.
    #[must_use]
    pub const fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// Returns the API host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the API port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the transport protocol.
    #[must_use]
    pub const fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the app info, if configured.
    #[must_use]
    pub const fn app_info(&self) -> Option<&AppInfo> {
        self.app_info.as_ref()
    }

    /// Returns the custom HTTP client, if configured.
    #[must_use]
    pub const fn http_client(&self) -> Option<&reqwest::Client> {
        self.http_client.as_ref()
    }

    pub(crate) fn into_parts(self) -> ClarityboardConfigParts {
        ClarityboardConfigParts {
            api_key: self.api_key,
            host: self.host,
            port: self.port,
            protocol: self.protocol,
            base_path: self.base_path,
            timeout: self.timeout,
            app_info: self.app_info,
            http_client: self.http_client,
        }
    }
}

impl Default for ClarityboardConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            protocol: Protocol::default(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
            app_info: None,
            http_client: None,
        }
    }
}

/// Owned pieces of a config, handed to the client on construction.
pub(crate) struct ClarityboardConfigParts {
    pub api_key: Option<ApiKey>,
    pub host: String,
    pub port: u16,
    pub protocol: Protocol,
    pub base_path: String,
    pub timeout: Duration,
    pub app_info: Option<AppInfo>,
    pub http_client: Option<reqwest::Client>,
}

// Verify ClarityboardConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClarityboardConfig>();
};

/// Builder for constructing [`ClarityboardConfig`] instances.
///
/// # Defaults
///
/// - `host`: [`DEFAULT_HOST`]
/// - `port`: [`DEFAULT_PORT`]
/// - `protocol`: `https`
/// - `base_path`: [`DEFAULT_BASE_PATH`]
/// - `timeout`: [`DEFAULT_TIMEOUT`]
/// - `api_key`, `app_info`, `http_client`: `None`
#[derive(Debug, Default)]
pub struct ClarityboardConfigBuilder {
    api_key: Option<ApiKey>,
    host: Option<String>,
    port: Option<u16>,
    protocol: Option<Protocol>,
    base_path: Option<String>,
    timeout: Option<Duration>,
    app_info: Option<AppInfo>,
    http_client: Option<reqwest::Client>,
}

impl ClarityboardConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default API key used when a call supplies none.
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the API port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the transport protocol.
    #[must_use]
    pub const fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Sets the base path prepended to resource paths.
    #[must_use]
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the app info reported in user agents.
    #[must_use]
    pub fn app_info(mut self, app_info: AppInfo) -> Self {
        self.app_info = Some(app_info);
        self
    }

    /// Sets a custom HTTP client (the transport agent).
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the [`ClarityboardConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if the host was set to
    /// an empty string.
    pub fn build(self) -> Result<ClarityboardConfig, ConfigError> {
        let host = self.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        if host.trim().is_empty() {
            return Err(ConfigError::MissingRequiredField { field: "host" });
        }

        Ok(ClarityboardConfig {
            api_key: self.api_key,
            host,
            port: self.port.unwrap_or(DEFAULT_PORT),
            protocol: self.protocol.unwrap_or_default(),
            base_path: self
                .base_path
                .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string()),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            app_info: self.app_info,
            http_client: self.http_client,
        })
    }
}
