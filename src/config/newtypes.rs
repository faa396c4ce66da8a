//! Validated newtype wrappers for configuration values.
//!
//! These types validate their contents on construction so that an invalid
//! key, protocol or app info can never reach the request path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

/// A validated Clarityboard API key.
///
/// The key must be non-empty. Its value is masked in `Debug` output so that
/// it does not leak into logs.
///
/// # Example
///
/// ```rust
/// use clarityboard::ApiKey;
///
/// let key = ApiKey::new("my-api-key").unwrap();
/// assert_eq!(key.as_ref(), "my-api-key");
/// assert_eq!(format!("{:?}", key), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }

    /// Returns the value of the `Authorization` header for this key.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// Transport protocol used to reach the API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Plaintext HTTP.
    Http,
    /// HTTP over TLS.
    #[default]
    Https,
}

impl Protocol {
    /// Returns the URL scheme for this protocol.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => Err(ConfigError::InvalidProtocol {
                protocol: s.to_string(),
            }),
        }
    }
}

/// Information about the application embedding this client.
///
/// App info is reported in the `User-Agent` header and in the JSON client
/// user agent. Only `name` and `url` are kept; anything else is dropped.
///
/// # Example
///
/// ```rust
/// use clarityboard::AppInfo;
/// use serde_json::json;
///
/// let info = AppInfo::from_value(&json!({"name": "MyApp", "extra": "dropped"})).unwrap();
/// assert_eq!(info.name(), "MyApp");
/// assert_eq!(serde_json::to_value(&info).unwrap(), json!({"name": "MyApp"}));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl AppInfo {
    /// Creates app info from a name and an optional URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAppInfoName`] if `name` is empty.
    pub fn new(name: impl Into<String>, url: Option<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::MissingAppInfoName);
        }
        Ok(Self { name, url })
    }

    /// Builds app info from an arbitrary JSON value.
    ///
    /// Non-string `url` values and unknown fields are silently ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AppInfoNotObject`] if `value` is not an object,
    /// and [`ConfigError::MissingAppInfoName`] if it has no non-empty string
    /// `name`.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let object = value.as_object().ok_or(ConfigError::AppInfoNotObject)?;

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or(ConfigError::MissingAppInfoName)?;

        let url = object
            .get("url")
            .and_then(Value::as_str)
            .map(ToString::to_string);

        Self::new(name, url)
    }

    /// Returns the application name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the application URL, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl fmt::Display for AppInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.url {
            Some(url) => write!(f, "{} ({url})", self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_key_rejects_empty_string() {
        assert!(matches!(ApiKey::new(""), Err(ConfigError::EmptyApiKey)));
    }

    #[test]
    fn test_api_key_masks_value_in_debug() {
        let key = ApiKey::new("super-secret-key").unwrap();
        let debug_output = format!("{key:?}");
        assert_eq!(debug_output, "ApiKey(*****)");
        assert!(!debug_output.contains("super-secret-key"));
    }

    #[test]
    fn test_api_key_bearer_format() {
        let key = ApiKey::new("abc").unwrap();
        assert_eq!(key.bearer(), "Bearer abc");
    }

    #[test]
    fn test_protocol_parses_case_insensitively() {
        assert_eq!("HTTP".parse::<Protocol>().unwrap(), Protocol::Http);
        assert_eq!("https".parse::<Protocol>().unwrap(), Protocol::Https);
        assert!(matches!(
            "ftp".parse::<Protocol>(),
            Err(ConfigError::InvalidProtocol { .. })
        ));
    }

    #[test]
    fn test_app_info_rejects_non_object() {
        assert_eq!(
            AppInfo::from_value(&json!("MyApp")),
            Err(ConfigError::AppInfoNotObject)
        );
        assert_eq!(
            AppInfo::from_value(&json!(42)),
            Err(ConfigError::AppInfoNotObject)
        );
    }

    #[test]
    fn test_app_info_requires_name() {
        for value in [json!({}), json!({"version": "1.2.3"}), json!({"cats": "42"})] {
            assert_eq!(
                AppInfo::from_value(&value),
                Err(ConfigError::MissingAppInfoName)
            );
        }
    }

    #[test]
    fn test_app_info_keeps_only_name_and_url() {
        let info = AppInfo::from_value(&json!({
            "name": "MyAwesomeApp",
            "url": "https://myawesomeapp.info",
            "countOfRadishes": 512,
        }))
        .unwrap();

        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({"name": "MyAwesomeApp", "url": "https://myawesomeapp.info"})
        );
    }

    #[test]
    fn test_app_info_display() {
        let info = AppInfo::new("MyApp", Some("https://example.com".to_string())).unwrap();
        assert_eq!(info.to_string(), "MyApp (https://example.com)");

        let info = AppInfo::new("MyApp", None).unwrap();
        assert_eq!(info.to_string(), "MyApp");
    }
}
