//! Configuration error types for the Clarityboard client.
//!
//! Configuration constructors and setters that validate their input return
//! `Result<T, ConfigError>` so that bad values are rejected before any
//! request is made.
//!
//! # Example
//!
//! ```rust
//! use clarityboard::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring a client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Clarityboard API key.")]
    EmptyApiKey,

    /// App info was given as something other than a JSON object.
    #[error("AppInfo must be an object.")]
    AppInfoNotObject,

    /// App info was given without a `name`.
    #[error("AppInfo.name is required")]
    MissingAppInfoName,

    /// The protocol is neither `http` nor `https`.
    #[error("Invalid protocol '{protocol}'. Expected 'http' or 'https'.")]
    InvalidProtocol {
        /// The protocol that was provided.
        protocol: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_error_message() {
        let message = ConfigError::EmptyApiKey.to_string();
        assert!(message.contains("API key cannot be empty"));
    }

    #[test]
    fn test_app_info_error_messages() {
        assert_eq!(
            ConfigError::AppInfoNotObject.to_string(),
            "AppInfo must be an object."
        );
        assert_eq!(
            ConfigError::MissingAppInfoName.to_string(),
            "AppInfo.name is required"
        );
    }

    #[test]
    fn test_invalid_protocol_error_message() {
        let error = ConfigError::InvalidProtocol {
            protocol: "ftp".to_string(),
        };
        assert!(error.to_string().contains("ftp"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyApiKey;
        let _: &dyn std::error::Error = &error;
    }
}
