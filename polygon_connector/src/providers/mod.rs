//! Provider abstraction for the aggregates source.
//!
//! [`DataProvider`] is the seam between the pipeline and the vendor REST
//! client: the pipeline only needs "all raw result items for these params",
//! and tests can hand it a canned provider instead of a mock server.
//!
//! # Example
//!
//! ```rust
//! # use polygon_connector::errors::ProviderError;
//! # use polygon_connector::models::request_params::AggregatesParams;
//! # use polygon_connector::providers::DataProvider;
//! # use async_trait::async_trait;
//! # use serde_json::Value;
//! struct Canned(Vec<Value>);
//!
//! #[async_trait]
//! impl DataProvider for Canned {
//!     async fn fetch_series(&self, _params: &AggregatesParams) -> Result<Vec<Value>, ProviderError> {
//!         Ok(self.0.clone())
//!     }
//! }
//! ```
pub mod polygon_rest;

use async_trait::async_trait;
use serde_json::Value;

use crate::{errors::ProviderError, models::request_params::AggregatesParams};

#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Returns every raw result item for `params`, across all pages, in the
    /// order the provider sent them.
    async fn fetch_series(&self, params: &AggregatesParams) -> Result<Vec<Value>, ProviderError>;
}
