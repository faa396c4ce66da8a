//! Reports resource.

use serde_json::Value;

use crate::clients::{ApiResponse, ClarityboardError};
use crate::rest::{ApiResource, MethodSpec, RequestParams, Resource, BASIC_METHODS};

/// Reports built from record groups.
#[derive(Clone, Debug)]
pub struct Reports {
    resource: Resource,
}

impl Reports {
    const CREATE: MethodSpec = BASIC_METHODS.create;

    /// Creates a report.
    ///
    /// # Errors
    ///
    /// Returns any [`ClarityboardError`] of the request.
    pub async fn create(&self, data: Value) -> Result<ApiResponse, ClarityboardError> {
        self.create_with(RequestParams::new().data(data)).await
    }

    /// Creates a report with explicit params.
    ///
    /// # Errors
    ///
    /// Returns any [`ClarityboardError`] of the request.
    pub async fn create_with(&self, params: RequestParams) -> Result<ApiResponse, ClarityboardError> {
        self.resource.method(Self::CREATE).call(params).await
    }
}

impl ApiResource for Reports {
    const NAME: &'static str = "Reports";
    const PATH: &'static str = "reports";
    const METHODS: &'static [(&'static str, MethodSpec)] = &[("create", Self::CREATE)];

    fn from_resource(resource: Resource) -> Self {
        Self { resource }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Clarityboard;

    #[test]
    fn test_reports_create_path() {
        let client = Clarityboard::new("fakeAuthToken").unwrap();
        assert_eq!(
            client
                .reports()
                .operation("create")
                .unwrap()
                .full_path(&[])
                .unwrap(),
            "/v/reports"
        );
    }
}
