//! Driving loop for the indicator connector.
//!
//! Each identifier goes through extract → transform → load on its own. A
//! failure is recorded against that identifier and the loop moves on; the
//! caller gets a [`RunSummary`] with one report per identifier.

use std::time::Duration;

use doc_store::StoreConnector;
use shared_utils::sleep::Sleeper;

use crate::{
    config::OtxConfig,
    errors::{IndicatorError, ProviderInitError},
    io::sink::{IndicatorSink, LoadStatus},
    models::indicator::transform,
    providers::otx_rest::OtxProvider,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Loaded,
    NotFound,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub identifier: String,
    pub outcome: ItemOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub reports: Vec<ItemReport>,
}

impl RunSummary {
    pub fn loaded(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Loaded))
    }

    pub fn not_found(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::NotFound))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed { .. }))
    }

    pub fn outcome_of(&self, identifier: &str) -> Option<&ItemOutcome> {
        self.reports
            .iter()
            .find(|r| r.identifier == identifier)
            .map(|r| &r.outcome)
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

pub struct IndicatorPipeline {
    provider: OtxProvider,
    sink: IndicatorSink,
    sleeper: Box<dyn Sleeper>,
    pause: Duration,
}

impl IndicatorPipeline {
    pub fn new(
        provider: OtxProvider,
        sink: IndicatorSink,
        sleeper: Box<dyn Sleeper>,
        pause: Duration,
    ) -> Self {
        Self {
            provider,
            sink,
            sleeper,
            pause,
        }
    }

    pub fn from_config(
        config: &OtxConfig,
        connector: Box<dyn StoreConnector>,
        sleeper: Box<dyn Sleeper>,
    ) -> Result<Self, ProviderInitError> {
        let provider = OtxProvider::new(config)?;
        let sink = IndicatorSink::new(connector, config.collection.clone());
        Ok(Self::new(provider, sink, sleeper, config.pause))
    }

    /// Runs one identifier through the whole pipeline.
    pub async fn process(&self, ip: &str) -> Result<ItemOutcome, IndicatorError> {
        let raw = self.provider.extract(ip).await?;
        let record = transform(raw, ip);
        let outcome = match self.sink.load(&record).await? {
            LoadStatus::Written => ItemOutcome::Loaded,
            LoadStatus::Skipped => ItemOutcome::NotFound,
        };
        Ok(outcome)
    }

    /// Processes every identifier in order, pausing between them.
    pub async fn run(&self, identifiers: &[String]) -> RunSummary {
        let mut summary = RunSummary::default();

        for (i, ip) in identifiers.iter().enumerate() {
            if i > 0 && !self.pause.is_zero() {
                self.sleeper.sleep(self.pause).await;
            }

            let outcome = match self.process(ip).await {
                Ok(ItemOutcome::Loaded) => {
                    tracing::info!(ip = %ip, collection = self.sink.collection(), "indicator stored");
                    ItemOutcome::Loaded
                }
                Ok(other) => {
                    tracing::info!(ip = %ip, "indicator not known to OTX, nothing stored");
                    other
                }
                Err(e) => {
                    tracing::warn!(ip = %ip, error = %e, "indicator failed");
                    ItemOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            summary.reports.push(ItemReport {
                identifier: ip.clone(),
                outcome,
            });
        }

        tracing::info!(
            loaded = summary.loaded(),
            not_found = summary.not_found(),
            failed = summary.failed(),
            "indicator run finished"
        );
        summary
    }
}

/// Convenience for callers that only have a config and a connector.
pub async fn run_with_config(
    config: &OtxConfig,
    connector: Box<dyn StoreConnector>,
    sleeper: Box<dyn Sleeper>,
) -> Result<RunSummary, ProviderInitError> {
    let pipeline = IndicatorPipeline::from_config(config, connector, sleeper)?;
    Ok(pipeline.run(&config.indicators).await)
}
