use thiserror::Error;

/// The unified error type for the `doc_store` crate.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the document.
    #[error("Duplicate key in {collection}: {message}")]
    DuplicateKey { collection: String, message: String },

    /// Index creation was refused (conflicting options, existing duplicates).
    #[error("Could not create index on {collection}: {message}")]
    Index { collection: String, message: String },

    /// Backend failure that is not tied to a single document.
    #[error("Store backend error: {0}")]
    Backend(String),

    /// An error reported by the MongoDB driver.
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}
