use doc_store::{DocumentStore, StoreConnector};
use snafu::ResultExt;

use crate::{
    errors::{EncodeSnafu, IndicatorError, StoreSnafu},
    models::{indicator::IndicatorRecord, lookup::Lookup},
};

/// What [`IndicatorSink::load`] did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Written,
    /// Nothing to write; no store session was opened.
    Skipped,
}

/// Writes indicator records into one fixed collection.
///
/// Plain inserts: the collection carries no unique index, so loading the
/// same address twice stores two documents.
pub struct IndicatorSink {
    connector: Box<dyn StoreConnector>,
    collection: String,
}

impl IndicatorSink {
    pub fn new(connector: Box<dyn StoreConnector>, collection: impl Into<String>) -> Self {
        Self {
            connector,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Opens a session, inserts the record, closes the session.
    pub async fn load(&self, record: &Lookup<IndicatorRecord>) -> Result<LoadStatus, IndicatorError> {
        let Lookup::Found(record) = record else {
            return Ok(LoadStatus::Skipped);
        };
        let ip = record.source_key.as_str();
        let doc = record.to_document().context(EncodeSnafu { ip })?;

        let store = self.connector.connect().await.context(StoreSnafu { ip })?;
        let written = store.insert_one(&self.collection, doc).await;
        store.close().await;
        written.context(StoreSnafu { ip })?;

        Ok(LoadStatus::Written)
    }
}
