//! The Clarityboard client.
//!
//! [`Clarityboard`] holds the live configuration, the event emitter and one
//! instance of each business resource. Resources read the configuration at
//! call time, so setters take effect on the next request.
//!
//! # Example
//!
//! ```rust,no_run
//! use clarityboard::{Clarityboard, ClientEvent, EventKind, Protocol};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Clarityboard::new("sk_test_123")?;
//! client.set_host("localhost");
//! client.set_port(9001);
//! client.set_protocol(Protocol::Http);
//!
//! client.on(EventKind::Response, |event: &ClientEvent| {
//!     if let ClientEvent::Response(response) = event {
//!         println!("{} {} -> {}", response.method, response.path, response.status);
//!     }
//! });
//!
//! let dashboard = client.dashboards().create(json!({"name": "Sales"})).await?;
//! println!("created {}", dashboard["id"]);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};
use std::time::Duration;

use serde_json::Value;

use crate::clients::{
    build_client_user_agent, default_seed, read_uname, user_agent_string, ClarityboardError,
    ClientEvent, EventEmitter, EventKind, ListenerId, RequestRecord, UserAgentCache,
};
use crate::config::{ApiKey, AppInfo, ClarityboardConfig, Protocol, DEFAULT_TIMEOUT};
use crate::error::ConfigError;
use crate::rest::resources::{Dashboards, RecordGroups, Records, Reports};
use crate::rest::ApiResource;

/// Live settings, read by every request.
#[derive(Clone, Debug)]
pub(crate) struct Settings {
    pub auth: Option<String>,
    pub host: String,
    pub port: u16,
    pub protocol: Protocol,
    pub base_path: String,
    pub timeout: Duration,
    pub app_info: Option<AppInfo>,
    pub http_client: Option<reqwest::Client>,
}

/// State shared by a client and its resources.
#[derive(Debug)]
pub(crate) struct ClientState {
    settings: RwLock<Settings>,
    user_agent: UserAgentCache,
    emitter: EventEmitter,
    last_request: Mutex<Option<RequestRecord>>,
    default_http: OnceLock<reqwest::Client>,
}

impl ClientState {
    fn new(config: ClarityboardConfig) -> Self {
        let parts = config.into_parts();
        Self {
            settings: RwLock::new(Settings {
                auth: parts.api_key.as_ref().map(ApiKey::bearer),
                host: parts.host,
                port: parts.port,
                protocol: parts.protocol,
                base_path: parts.base_path,
                timeout: parts.timeout,
                app_info: parts.app_info,
                http_client: parts.http_client,
            }),
            user_agent: UserAgentCache::default(),
            emitter: EventEmitter::new(),
            last_request: Mutex::new(None),
            default_http: OnceLock::new(),
        }
    }

    /// Returns a snapshot of the live settings.
    pub(crate) fn settings(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, apply: impl FnOnce(&mut Settings)) {
        apply(&mut *self.settings.write().unwrap_or_else(PoisonError::into_inner));
    }

    pub(crate) fn auth(&self) -> Option<String> {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .auth
            .clone()
    }

    pub(crate) fn base_path(&self) -> String {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .base_path
            .clone()
    }

    fn app_info(&self) -> Option<AppInfo> {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .app_info
            .clone()
    }

    /// Returns the `User-Agent` header value.
    pub(crate) fn user_agent(&self) -> String {
        user_agent_string(self.app_info().as_ref())
    }

    /// Returns the JSON client user agent, computing and caching it on first
    /// use.
    pub(crate) async fn client_user_agent(&self) -> String {
        if let Some(cached) = self.user_agent.get() {
            return cached;
        }
        let generation = self.user_agent.generation();
        let serialized = self.client_user_agent_seeded(&default_seed()).await;
        if !self.user_agent.set_if_current(serialized.clone(), generation) {
            tracing::debug!("app info changed while building the client user agent; not caching");
        }
        serialized
    }

    async fn client_user_agent_seeded(&self, seed: &BTreeMap<String, String>) -> String {
        let uname = read_uname().await;
        build_client_user_agent(seed, uname.as_deref(), self.app_info().as_ref())
    }

    pub(crate) fn emit(&self, event: &ClientEvent) {
        self.emitter.emit(event);
    }

    pub(crate) fn record_request(&self, record: RequestRecord) {
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(record);
    }

    /// Returns the HTTP client to send with: the configured one, or a
    /// lazily built default.
    pub(crate) fn http_client(
        &self,
        configured: Option<&reqwest::Client>,
    ) -> Result<reqwest::Client, ClarityboardError> {
        if let Some(client) = configured {
            return Ok(client.clone());
        }
        if let Some(client) = self.default_http.get() {
            return Ok(client.clone());
        }

        let client = reqwest::Client::builder().build().map_err(|error| {
            ClarityboardError::connection(
                "Failed to build the HTTP client for Clarityboard",
                Some(error),
            )
        })?;
        Ok(self.default_http.get_or_init(|| client).clone())
    }
}

/// The Clarityboard API client.
///
/// Cloning a client yields another handle to the same configuration,
/// listeners and resources.
#[derive(Clone, Debug)]
pub struct Clarityboard {
    state: Arc<ClientState>,
    dashboards: Dashboards,
    records: Records,
    record_groups: RecordGroups,
    reports: Reports,
}

// Verify Clarityboard is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Clarityboard>();
};

impl Clarityboard {
    /// Creates a client with an API key and default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let config = ClarityboardConfig::builder()
            .api_key(ApiKey::new(api_key)?)
            .build()?;
        Ok(Self::with_config(config))
    }

    /// Creates a client from a configuration.
    #[must_use]
    pub fn with_config(config: ClarityboardConfig) -> Self {
        let state = Arc::new(ClientState::new(config));
        let resource = |path: &str| crate::rest::Resource::from_state(Arc::clone(&state), path);

        Self {
            dashboards: Dashboards::from_resource(resource(Dashboards::PATH)),
            records: Records::from_resource(resource(Records::PATH)),
            record_groups: RecordGroups::from_resource(resource(RecordGroups::PATH)),
            reports: Reports::from_resource(resource(Reports::PATH)),
            state,
        }
    }

    pub(crate) const fn state(&self) -> &Arc<ClientState> {
        &self.state
    }

    // ==== Resources ====

    /// Returns the dashboards resource.
    #[must_use]
    pub const fn dashboards(&self) -> &Dashboards {
        &self.dashboards
    }

    /// Returns the records resource.
    #[must_use]
    pub const fn records(&self) -> &Records {
        &self.records
    }

    /// Returns the record groups resource.
    #[must_use]
    pub const fn record_groups(&self) -> &RecordGroups {
        &self.record_groups
    }

    /// Returns the reports resource.
    #[must_use]
    pub const fn reports(&self) -> &Reports {
        &self.reports
    }

    // ==== Configuration ====

    /// Sets the API host.
    pub fn set_host(&self, host: impl Into<String>) {
        let host = host.into();
        self.state.update(|settings| settings.host = host);
    }

    /// Sets the API host, and optionally the port and protocol with it.
    pub fn set_host_with(&self, host: impl Into<String>, port: Option<u16>, protocol: Option<Protocol>) {
        let host = host.into();
        self.state.update(|settings| {
            settings.host = host;
            if let Some(port) = port {
                settings.port = port;
            }
            if let Some(protocol) = protocol {
                settings.protocol = protocol;
            }
        });
    }

    /// Sets the API port.
    pub fn set_port(&self, port: u16) {
        self.state.update(|settings| settings.port = port);
    }

    /// Sets the transport protocol.
    pub fn set_protocol(&self, protocol: Protocol) {
        self.state.update(|settings| settings.protocol = protocol);
    }

    /// Sets the default API key.
    pub fn set_api_key(&self, api_key: &ApiKey) {
        let auth = api_key.bearer();
        self.state.update(|settings| settings.auth = Some(auth));
    }

    /// Sets the request timeout. `None` restores the default.
    pub fn set_timeout(&self, timeout: Option<Duration>) {
        self.state
            .update(|settings| settings.timeout = timeout.unwrap_or(DEFAULT_TIMEOUT));
    }

    /// Sets or clears the app info, and drops the cached client user agent.
    pub fn set_app_info(&self, app_info: Option<AppInfo>) {
        self.state.update(|settings| settings.app_info = app_info);
        self.state.user_agent.invalidate();
    }

    /// Sets the app info from a JSON value. `null` clears it.
    ///
    /// Only string `name` and `url` fields are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AppInfoNotObject`] for values other than
    /// objects and `null`, and [`ConfigError::MissingAppInfoName`] for
    /// objects without a `name`.
    pub fn set_app_info_value(&self, value: &Value) -> Result<(), ConfigError> {
        let app_info = match value {
            Value::Null => None,
            value => Some(AppInfo::from_value(value)?),
        };
        self.set_app_info(app_info);
        Ok(())
    }

    /// Sets or clears the custom HTTP client.
    pub fn set_http_client(&self, client: Option<reqwest::Client>) {
        self.state.update(|settings| settings.http_client = client);
    }

    /// Returns the API host.
    #[must_use]
    pub fn host(&self) -> String {
        self.state.settings().host
    }

    /// Returns the API port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.state.settings().port
    }

    /// Returns the transport protocol.
    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.state.settings().protocol
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> String {
        self.state.base_path()
    }

    /// Returns the `Authorization` value for the default key
    /// (`"Bearer <key>"`), if a key is set.
    #[must_use]
    pub fn auth(&self) -> Option<String> {
        self.state.auth()
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.state.settings().timeout
    }

    /// Returns the app info, if set.
    #[must_use]
    pub fn app_info(&self) -> Option<AppInfo> {
        self.state.app_info()
    }

    /// Returns the app info formatted as `name (url)`, or an empty string.
    #[must_use]
    pub fn app_info_as_string(&self) -> String {
        self.state
            .app_info()
            .map(|app_info| app_info.to_string())
            .unwrap_or_default()
    }

    /// Returns the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> String {
        self.state.user_agent()
    }

    /// Returns the serialized JSON client user agent, cached until the app
    /// info changes.
    pub async fn client_user_agent(&self) -> String {
        self.state.client_user_agent().await
    }

    /// Serializes a client user agent from a custom seed. Not cached.
    pub async fn client_user_agent_seeded(&self, seed: &BTreeMap<String, String>) -> String {
        self.state.client_user_agent_seeded(seed).await
    }

    // ==== Events ====

    /// Registers a listener for `request` or `response` events.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&ClientEvent) + Send + Sync + 'static,
    {
        self.state.emitter.on(kind, listener)
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        self.state.emitter.off(id)
    }

    /// Returns the most recently executed request.
    #[must_use]
    pub fn last_request(&self) -> Option<RequestRecord> {
        self.state
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
