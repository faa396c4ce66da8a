//! Clarityboard business resources.
//!
//! Each resource wraps a [`Resource`](crate::rest::Resource) bound to the
//! client and exposes the methods the API supports for it:
//!
//! | Resource | Path | Methods |
//! |---|---|---|
//! | [`Dashboards`] | `dashboards` | create, list, retrieve |
//! | [`Records`] | `records` | create |
//! | [`RecordGroups`] | `records/groups` | list, update |
//! | [`Reports`] | `reports` | create |
//!
//! Resources are reached through the client accessors:
//!
//! ```rust,no_run
//! use clarityboard::Clarityboard;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Clarityboard::new("sk_test_123")?;
//!
//! let dashboard = client.dashboards().create(json!({"name": "Sales"})).await?;
//! client
//!     .records()
//!     .create(json!({"group": "Sales", "data": {"amount": 42}}))
//!     .await?;
//! let groups = client.record_groups().list().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Every method also has a `_with` form taking
//! [`RequestParams`](crate::rest::RequestParams), for per-call API keys and
//! headers.

mod dashboards;
mod record_groups;
mod records;
mod reports;

pub use dashboards::Dashboards;
pub use record_groups::RecordGroups;
pub use records::Records;
pub use reports::Reports;
