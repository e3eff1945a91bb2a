//! Document store abstraction used by both connectors.
//!
//! A [`StoreConnector`] opens a [`DocumentStore`] session for one unit of
//! work; the caller closes it when done. Two backends are provided:
//!
//! - [`mongo::MongoConnector`] talks to a MongoDB deployment.
//! - [`memory::MemoryConnector`] keeps everything in process and enforces
//!   unique indexes the same way, which is what the pipeline tests run on.
//!
//! # Example
//!
//! ```rust
//! use doc_store::{bson::doc, memory::MemoryConnector, DocumentStore, StoreConnector};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let connector = MemoryConnector::new();
//! let store = connector.connect().await.unwrap();
//! store.insert_one("indicators", doc! { "source_key": "8.8.8.8" }).await.unwrap();
//! store.close().await;
//! assert_eq!(connector.count("indicators"), 1);
//! # }
//! ```

pub mod errors;
pub mod memory;
pub mod mongo;

use async_trait::async_trait;

pub use errors::StoreError;
pub use mongodb::bson;

use bson::Document;

/// Server error code MongoDB reports for unique index violations.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Result of an unordered multi-document insert.
///
/// Every document in the request is accounted for in exactly one of the
/// three counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertManyOutcome {
    pub inserted: usize,
    /// Documents rejected by a unique index.
    pub duplicates: usize,
    /// Documents rejected for any other reason.
    pub failed: usize,
}

/// Opens store sessions.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn DocumentStore>, StoreError>;
}

/// One open session against a document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a single document. Unique index violations surface as
    /// [`StoreError::DuplicateKey`].
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<(), StoreError>;

    /// Creates a unique ascending compound index over `keys` if it does not exist.
    async fn ensure_unique_index(&self, collection: &str, keys: &[&str])
    -> Result<(), StoreError>;

    /// Inserts `docs` without stopping at the first failure.
    ///
    /// Per-document rejections are reported in the returned outcome; only
    /// failures that prevent the whole request (connection loss, auth) are
    /// returned as errors.
    async fn insert_many_unordered(
        &self,
        collection: &str,
        docs: Vec<Document>,
    ) -> Result<InsertManyOutcome, StoreError>;

    async fn count_documents(&self, collection: &str) -> Result<u64, StoreError>;

    /// Ends the session.
    async fn close(self: Box<Self>);
}
