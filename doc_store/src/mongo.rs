//! MongoDB backend.

use async_trait::async_trait;
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Document, doc},
    error::{ErrorKind, InsertManyError, WriteFailure},
    options::IndexOptions,
};

use crate::{DUPLICATE_KEY_CODE, DocumentStore, InsertManyOutcome, StoreConnector, StoreError};

/// Opens one MongoDB client per session against a fixed database.
#[derive(Debug, Clone)]
pub struct MongoConnector {
    uri: String,
    database: String,
}

impl MongoConnector {
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
        }
    }
}

#[async_trait]
impl StoreConnector for MongoConnector {
    async fn connect(&self) -> Result<Box<dyn DocumentStore>, StoreError> {
        let client = Client::with_uri_str(&self.uri).await?;
        let db = client.database(&self.database);
        tracing::debug!(database = %self.database, "opened mongodb session");
        Ok(Box::new(MongoStore { client, db }))
    }
}

pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<(), StoreError> {
        match self.collection(collection).insert_one(doc).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                message: e.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_unique_index(
        &self,
        collection: &str,
        keys: &[&str],
    ) -> Result<(), StoreError> {
        let mut key_doc = Document::new();
        for key in keys {
            key_doc.insert(*key, 1_i32);
        }
        let model = IndexModel::builder()
            .keys(key_doc)
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection(collection)
            .create_index(model)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Index {
                collection: collection.to_string(),
                message: e.to_string(),
            })
    }

    async fn insert_many_unordered(
        &self,
        collection: &str,
        docs: Vec<Document>,
    ) -> Result<InsertManyOutcome, StoreError> {
        let attempted = docs.len();
        if attempted == 0 {
            return Ok(InsertManyOutcome::default());
        }

        match self.collection(collection).insert_many(docs).ordered(false).await {
            Ok(result) => Ok(InsertManyOutcome {
                inserted: result.inserted_ids.len(),
                ..Default::default()
            }),
            Err(e) => {
                let partial = match e.kind.as_ref() {
                    ErrorKind::InsertMany(failure) => Some(summarize_failure(failure, attempted)),
                    _ => None,
                };
                partial.ok_or(StoreError::Mongo(e))
            }
        }
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, StoreError> {
        Ok(self.collection(collection).count_documents(doc! {}).await?)
    }

    async fn close(self: Box<Self>) {
        let MongoStore { client, .. } = *self;
        client.shutdown().await;
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY_CODE
    )
}

/// Accounts for every document of an unordered insert that partly failed.
///
/// The driver does not expose inserted ids on failure, so the inserted
/// count is derived from the write errors.
fn summarize_failure(failure: &InsertManyError, attempted: usize) -> InsertManyOutcome {
    if let Some(wce) = &failure.write_concern_error {
        tracing::warn!(code = wce.code, message = %wce.message, "write concern error during insert");
    }

    let errors = failure.write_errors.as_deref().unwrap_or_default();
    count_write_errors(errors.iter().map(|w| w.code), attempted)
}

/// Splits the error codes of rejected documents into duplicates and other
/// failures; everything else counts as inserted.
fn count_write_errors(codes: impl IntoIterator<Item = i32>, attempted: usize) -> InsertManyOutcome {
    let (duplicates, failed) = codes
        .into_iter()
        .fold((0, 0), |(dup, other), code| {
            if code == DUPLICATE_KEY_CODE {
                (dup + 1, other)
            } else {
                (dup, other + 1)
            }
        });

    InsertManyOutcome {
        inserted: attempted.saturating_sub(duplicates + failed),
        duplicates,
        failed,
    }
}
