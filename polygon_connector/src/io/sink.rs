use doc_store::{DocumentStore, StoreConnector, bson::Document};
use snafu::ResultExt;

use crate::{
    errors::{ConnectSnafu, SinkError},
    models::aggregate_bar::AggregateBar,
};

pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Fields of the compound unique index on every aggregates collection.
pub const UNIQUE_KEYS: [&str; 2] = ["ticker", "date"];

/// Counts from one [`load_to_store`] call.
///
/// `inserted` comes from the store's own accounting when a batch partially
/// fails, so treat it as best-effort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub attempted: usize,
    pub inserted: usize,
    /// Rows that already existed, rejected by the unique index.
    pub duplicates: usize,
    pub failed: usize,
    pub batches: usize,
    /// Batches that errored as a whole; their rows are counted in `failed`.
    pub failed_batches: usize,
}

/// Inserts `bars` into `collection` in unordered batches of `batch_size`.
///
/// The `(ticker, date)` unique index is created first; if that fails the
/// load still goes ahead. Only failing to open a session is an error: batch
/// failures are logged, counted and skipped.
pub async fn load_to_store(
    connector: &dyn StoreConnector,
    bars: &[AggregateBar],
    collection: &str,
    batch_size: usize,
) -> Result<LoadReport, SinkError> {
    let mut report = LoadReport::default();
    if bars.is_empty() {
        return Ok(report);
    }
    let batch_size = batch_size.max(1);

    let docs: Vec<Document> = bars
        .iter()
        .filter_map(|bar| match bar.to_document() {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(
                    ticker = %bar.ticker,
                    date = %bar.date,
                    error = %e,
                    "could not encode bar"
                );
                None
            }
        })
        .collect();
    report.attempted = bars.len();
    report.failed = bars.len() - docs.len();

    let store = connector.connect().await.context(ConnectSnafu)?;

    if let Err(e) = store.ensure_unique_index(collection, &UNIQUE_KEYS).await {
        tracing::warn!(collection, error = %e, "could not ensure unique index, loading anyway");
    }

    for (i, batch) in docs.chunks(batch_size).enumerate() {
        report.batches += 1;
        let size = batch.len();
        match store.insert_many_unordered(collection, batch.to_vec()).await {
            Ok(outcome) => {
                report.inserted += outcome.inserted;
                report.duplicates += outcome.duplicates;
                report.failed += outcome.failed;
                if outcome.duplicates > 0 {
                    tracing::info!(
                        collection,
                        batch = i + 1,
                        duplicates = outcome.duplicates,
                        "skipped existing bars"
                    );
                }
                if outcome.failed > 0 {
                    tracing::warn!(
                        collection,
                        batch = i + 1,
                        failed = outcome.failed,
                        "some bars were not written"
                    );
                }
            }
            Err(e) => {
                report.failed += size;
                report.failed_batches += 1;
                tracing::error!(
                    collection,
                    batch = i + 1,
                    size,
                    error = %e,
                    "batch insert failed"
                );
            }
        }
    }

    store.close().await;

    tracing::info!(
        collection,
        attempted = report.attempted,
        inserted = report.inserted,
        duplicates = report.duplicates,
        failed = report.failed,
        batches = report.batches,
        "load finished"
    );
    Ok(report)
}
