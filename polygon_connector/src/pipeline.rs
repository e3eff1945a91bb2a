//! Fetch → transform → load for one ticker and date range.

use doc_store::StoreConnector;
use snafu::ResultExt;

use crate::{
    errors::{FetchSnafu, LoadSnafu, PipelineError},
    io::sink::{LoadReport, load_to_store},
    models::{aggregate_bar::transform_aggregates, request_params::AggregatesParams},
    providers::DataProvider,
};

/// Collection holding the raw bars of `ticker`.
pub fn collection_name(ticker: &str) -> String {
    format!("polygon_{ticker}_raw")
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    pub request: AggregatesParams,
    pub batch_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The provider returned nothing usable; the store was not touched.
    NoResults,
    Loaded {
        collection: String,
        report: LoadReport,
    },
}

pub async fn run(
    provider: &dyn DataProvider,
    connector: &dyn StoreConnector,
    params: &RunParams,
) -> Result<RunOutcome, PipelineError> {
    let request = &params.request;
    let raw = provider.fetch_series(request).await.context(FetchSnafu)?;
    if raw.is_empty() {
        tracing::warn!(
            ticker = %request.ticker,
            from = %request.from,
            to = %request.to,
            "no aggregates returned, nothing to load"
        );
        return Ok(RunOutcome::NoResults);
    }

    let bars = transform_aggregates(&raw, &request.ticker);
    if bars.is_empty() {
        tracing::warn!(
            ticker = %request.ticker,
            received = raw.len(),
            "no aggregates had a usable timestamp, nothing to load"
        );
        return Ok(RunOutcome::NoResults);
    }

    let collection = collection_name(&request.ticker);
    let report = load_to_store(connector, &bars, &collection, params.batch_size)
        .await
        .context(LoadSnafu {
            collection: collection.as_str(),
        })?;

    Ok(RunOutcome::Loaded { collection, report })
}
