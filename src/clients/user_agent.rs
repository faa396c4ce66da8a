//! User-agent construction.
//!
//! Two strings identify this library to the API: the plain `User-Agent`
//! header and a JSON environment descriptor sent as
//! `X-Clarityboard-Client-User-Agent`. The descriptor needs a `uname -a`
//! call, so each client caches it until its app info changes.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use serde_json::{Map, Value};

use crate::config::AppInfo;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Value reported for `uname` when it cannot be read.
pub const UNKNOWN_UNAME: &str = "UNKNOWN";

/// Builds the `User-Agent` header value.
///
/// # Example
///
/// ```rust
/// use clarityboard::clients::{user_agent_string, SDK_VERSION};
/// use clarityboard::AppInfo;
///
/// let app = AppInfo::new("MyApp", Some("https://myapp.example".to_string())).unwrap();
/// assert_eq!(
///     user_agent_string(Some(&app)),
///     format!("Clarityboard/v1 RustBindings/{SDK_VERSION} MyApp (https://myapp.example)")
/// );
/// ```
#[must_use]
pub fn user_agent_string(app_info: Option<&AppInfo>) -> String {
    let mut user_agent = format!("Clarityboard/v1 RustBindings/{SDK_VERSION}");
    if let Some(app_info) = app_info {
        user_agent.push(' ');
        user_agent.push_str(&app_info.to_string());
    }
    user_agent
}

/// Returns the static seed of the client user agent.
#[must_use]
pub fn default_seed() -> BTreeMap<String, String> {
    [
        ("bindings_version", SDK_VERSION),
        ("lang", "rust"),
        ("lang_version", env!("CARGO_PKG_RUST_VERSION")),
        ("platform", std::env::consts::OS),
        ("publisher", "clarityboard"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

/// Reads `uname -a`, returning `None` if it cannot be run or prints nothing.
pub async fn read_uname() -> Option<String> {
    let output = tokio::process::Command::new("uname")
        .arg("-a")
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        tracing::debug!("uname -a exited with {}", output.status);
        return None;
    }

    let uname = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!uname.is_empty()).then_some(uname)
}

/// Serializes a client user agent from a seed.
///
/// Every seed value is URI-encoded. `uname` is added URI-encoded, or as
/// [`UNKNOWN_UNAME`] when absent, and `application` carries the app info
/// when set.
#[must_use]
pub fn build_client_user_agent(
    seed: &BTreeMap<String, String>,
    uname: Option<&str>,
    app_info: Option<&AppInfo>,
) -> String {
    let mut user_agent: Map<String, Value> = seed
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(urlencoding::encode(value).into_owned())))
        .collect();

    let uname = uname
        .map(|uname| urlencoding::encode(uname).into_owned())
        .filter(|uname| !uname.is_empty())
        .unwrap_or_else(|| UNKNOWN_UNAME.to_string());
    user_agent.insert("uname".to_string(), Value::String(uname));

    if let Some(app_info) = app_info {
        if let Ok(application) = serde_json::to_value(app_info) {
            user_agent.insert("application".to_string(), application);
        }
    }

    Value::Object(user_agent).to_string()
}

/// Cache for the serialized client user agent.
///
/// Every invalidation bumps a generation counter. A value computed under an
/// older generation is not stored, so a slow computation cannot overwrite a
/// newer invalidation.
#[derive(Debug, Default)]
pub struct UserAgentCache {
    slot: RwLock<CacheSlot>,
}

#[derive(Debug, Default)]
struct CacheSlot {
    serialized: Option<String>,
    generation: u64,
}

impl UserAgentCache {
    /// Returns the cached value, if any.
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .serialized
            .clone()
    }

    /// Returns the current generation. Take it before computing a value to
    /// hand to [`set_if_current`](Self::set_if_current).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    /// Stores `value` if no invalidation happened since `generation` was
    /// read. Returns whether the value was stored.
    pub fn set_if_current(&self, value: String, generation: u64) -> bool {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.generation != generation {
            return false;
        }
        slot.serialized = Some(value);
        true
    }

    /// Drops the cached value.
    pub fn invalidate(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        slot.serialized = None;
        slot.generation = slot.generation.wrapping_add(1);
    }
}
