//! Records resource.

use serde_json::Value;

use crate::clients::{ApiResponse, ClarityboardError};
use crate::rest::{ApiResource, MethodSpec, RequestParams, Resource, BASIC_METHODS};

/// Data records, pushed into record groups.
#[derive(Clone, Debug)]
pub struct Records {
    resource: Resource,
}

impl Records {
    const CREATE: MethodSpec = BASIC_METHODS.create;

    /// Creates a record.
    ///
    /// # Errors
    ///
    /// Returns any [`ClarityboardError`] of the request.
    pub async fn create(&self, data: Value) -> Result<ApiResponse, ClarityboardError> {
        self.create_with(RequestParams::new().data(data)).await
    }

    /// Creates a record with explicit params.
    ///
    /// # Errors
    ///
    /// Returns any [`ClarityboardError`] of the request.
    pub async fn create_with(&self, params: RequestParams) -> Result<ApiResponse, ClarityboardError> {
        self.resource.method(Self::CREATE).call(params).await
    }
}

impl ApiResource for Records {
    const NAME: &'static str = "Records";
    const PATH: &'static str = "records";
    const METHODS: &'static [(&'static str, MethodSpec)] = &[("create", Self::CREATE)];

    fn from_resource(resource: Resource) -> Self {
        Self { resource }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }
}
