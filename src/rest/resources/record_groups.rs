//! Record groups resource.
//!
//! Record groups are addressed as a collection: `update` replaces group
//! settings with a `PUT` to the collection path and takes no ID.

use serde_json::Value;

use crate::clients::{ApiResponse, ClarityboardError, HttpMethod};
use crate::rest::{ApiResource, MethodSpec, RequestParams, Resource, BASIC_METHODS};

/// Groups of records of an account.
#[derive(Clone, Debug)]
pub struct RecordGroups {
    resource: Resource,
}

impl RecordGroups {
    const LIST: MethodSpec = BASIC_METHODS.list;
    const UPDATE: MethodSpec = MethodSpec::new(HttpMethod::Put, "", &[]);

    /// Lists record groups.
    ///
    /// # Errors
    ///
    /// Returns any [`ClarityboardError`] of the request.
    pub async fn list(&self) -> Result<ApiResponse, ClarityboardError> {
        self.list_with(RequestParams::new()).await
    }

    /// Lists record groups. Data in `params` is sent as query parameters.
    ///
    /// # Errors
    ///
    /// Returns any [`ClarityboardError`] of the request.
    pub async fn list_with(&self, params: RequestParams) -> Result<ApiResponse, ClarityboardError> {
        self.resource.method(Self::LIST).call(params).await
    }

    /// Updates record groups.
    ///
    /// # Errors
    ///
    /// Returns any [`ClarityboardError`] of the request.
    pub async fn update(&self, data: Value) -> Result<ApiResponse, ClarityboardError> {
        self.update_with(RequestParams::new().data(data)).await
    }

    /// Updates record groups with explicit params.
    ///
    /// # Errors
    ///
    /// Returns any [`ClarityboardError`] of the request.
    pub async fn update_with(&self, params: RequestParams) -> Result<ApiResponse, ClarityboardError> {
        self.resource.method(Self::UPDATE).call(params).await
    }
}

impl ApiResource for RecordGroups {
    const NAME: &'static str = "RecordGroups";
    const PATH: &'static str = "records/groups";
    const METHODS: &'static [(&'static str, MethodSpec)] =
        &[("list", Self::LIST), ("update", Self::UPDATE)];

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
    use crate::rest::MethodType;
    use crate::Clarityboard;

    #[test]
    fn test_update_is_put_without_url_params() {
        let client = Clarityboard::new("fakeAuthToken").unwrap();
        let update = client.record_groups().operation("update").unwrap();

        assert_eq!(update.spec().method, HttpMethod::Put);
        assert_eq!(update.spec().arity(), 0);
        assert_eq!(update.full_path(&[]).unwrap(), "/v/records/groups");
    }

    #[test]
    fn test_list_is_a_list_method() {
        let client = Clarityboard::new("fakeAuthToken").unwrap();
        let list = client.record_groups().operation("list").unwrap();

        assert_eq!(list.spec().method_type, MethodType::List);
        assert_eq!(list.full_path(&[]).unwrap(), "/v/records/groups");
    }

    #[test]
    fn test_update_rejects_url_params() {
        let client = Clarityboard::new("fakeAuthToken").unwrap();
        let update = client.record_groups().operation("update").unwrap();

        assert!(matches!(
            update.full_path(&["abc".to_string()]),
            Err(ClarityboardError::InvalidRequest(_))
        ));
    }
}
