use async_trait::async_trait;
use serde_json::Value;
use shared_utils::sleep::Sleeper;
use snafu::ResultExt;

use crate::{
    config::PolygonConfig,
    errors::{ProviderError, ProviderInitError, RequestSnafu, ResponseSnafu},
    models::request_params::AggregatesParams,
    providers::{DataProvider, polygon_rest::response::AggsResponse},
    requests::retry::RetryingClient,
};

/// REST client for `/v2/aggs`.
pub struct PolygonProvider {
    http: RetryingClient,
    base_url: String,
}

impl PolygonProvider {
    /// Creates a provider that authenticates with the key from `config` and
    /// waits between retries with `sleeper`.
    pub fn new(config: &PolygonConfig, sleeper: Box<dyn Sleeper>) -> Result<Self, ProviderInitError> {
        Ok(Self {
            http: RetryingClient::new(config, sleeper)?,
            base_url: config.base_url.clone(),
        })
    }

    pub fn aggregates_url(&self, params: &AggregatesParams) -> String {
        format!(
            "{}/v2/aggs/ticker/{}/range/{}/{}/{}/{}",
            self.base_url,
            params.ticker,
            params.multiplier,
            params.timespan,
            params.from.format("%Y-%m-%d"),
            params.to.format("%Y-%m-%d"),
        )
    }

    async fn fetch_page(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<AggsResponse, ProviderError> {
        let body = self
            .http
            .request_with_retries(url, query)
            .await
            .context(RequestSnafu)?;
        serde_json::from_value(body).context(ResponseSnafu { url })
    }
}

#[async_trait]
impl DataProvider for PolygonProvider {
    async fn fetch_series(&self, params: &AggregatesParams) -> Result<Vec<Value>, ProviderError> {
        let url = self.aggregates_url(params);
        let query = params.provider_specific.construct_params();
        tracing::info!(
            ticker = %params.ticker,
            from = %params.from,
            to = %params.to,
            multiplier = params.multiplier,
            timespan = %params.timespan,
            "fetching aggregates"
        );

        let mut page = self.fetch_page(&url, &query).await?;
        let mut results = page.results.take().unwrap_or_default();
        let mut pages = 1usize;

        // The cursor already encodes the original query, so follow-up pages
        // only carry the API key.
        while let Some(next) = page.next_page().map(str::to_owned) {
            tracing::info!(page = pages + 1, "fetching next page");
            page = self.fetch_page(&next, &[]).await?;
            results.extend(page.results.take().unwrap_or_default());
            pages += 1;
        }

        tracing::info!(
            ticker = %params.ticker,
            pages,
            results = results.len(),
            "aggregates fetched"
        );
        Ok(results)
    }
}
