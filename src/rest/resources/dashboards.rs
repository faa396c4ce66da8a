//! Dashboards resource.
//!
//! # Example
//!
//! ```rust,ignore
//! use clarityboard::rest::RequestParams;
//! use serde_json::json;
//!
//! let created = client.dashboards().create(json!({"name": "Sales"})).await?;
//! let dashboard = client.dashboards().retrieve("abc123").await?;
//! let all = client.dashboards().list().await?;
//!
//! // With a per-call key
//! let other = client
//!     .dashboards()
//!     .retrieve_with(RequestParams::new().url_param("abc123").api_key("sk_other"))
//!     .await?;
//! ```

use serde_json::Value;

use crate::clients::{ApiResponse, ClarityboardError};
use crate::rest::{ApiResource, MethodSpec, RequestParams, Resource, BASIC_METHODS};

/// Dashboards of an account.
#[derive(Clone, Debug)]
pub struct Dashboards {
    resource: Resource,
}

impl Dashboards {
    const CREATE: MethodSpec = BASIC_METHODS.create;
    const LIST: MethodSpec = BASIC_METHODS.list;
    const RETRIEVE: MethodSpec = BASIC_METHODS.retrieve;

    /// Creates a dashboard.
    ///
    /// # Errors
    ///
    /// Returns any [`ClarityboardError`] of the request.
    pub async fn create(&self, data: Value) -> Result<ApiResponse, ClarityboardError> {
        self.create_with(RequestParams::new().data(data)).await
    }

    /// Creates a dashboard with explicit params.
    ///
    /// # Errors
    ///
    /// Returns any [`ClarityboardError`] of the request.
    pub async fn create_with(&self, params: RequestParams) -> Result<ApiResponse, ClarityboardError> {
        self.resource.method(Self::CREATE).call(params).await
    }

    /// Lists dashboards.
    ///
    /// # Errors
    ///
    /// Returns any [`ClarityboardError`] of the request.
    pub async fn list(&self) -> Result<ApiResponse, ClarityboardError> {
        self.list_with(RequestParams::new()).await
    }

    /// Lists dashboards. Data in `params` is sent as query parameters.
    ///
    /// # Errors
    ///
    /// Returns any [`ClarityboardError`] of the request.
    pub async fn list_with(&self, params: RequestParams) -> Result<ApiResponse, ClarityboardError> {
        self.resource.method(Self::LIST).call(params).await
    }

    /// Retrieves one dashboard.
    ///
    /// # Errors
    ///
    /// Returns any [`ClarityboardError`] of the request.
    pub async fn retrieve(&self, id: impl Into<String>) -> Result<ApiResponse, ClarityboardError> {
        self.retrieve_with(RequestParams::new().url_param(id)).await
    }

    /// Retrieves one dashboard with explicit params. The first URL
    /// parameter is the dashboard ID.
    ///
    /// # Errors
    ///
    /// Returns [`ClarityboardError::InvalidRequest`] without an ID, and any
    /// error of the request.
    pub async fn retrieve_with(&self, params: RequestParams) -> Result<ApiResponse, ClarityboardError> {
        self.resource.method(Self::RETRIEVE).call(params).await
    }
}

impl ApiResource for Dashboards {
    const NAME: &'static str = "Dashboards";
    const PATH: &'static str = "dashboards";
    const METHODS: &'static [(&'static str, MethodSpec)] = &[
        ("create", Self::CREATE),
        ("list", Self::LIST),
        ("retrieve", Self::RETRIEVE),
    ];

    fn from_resource(resource: Resource) -> Self {
        Self { resource }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }
}
