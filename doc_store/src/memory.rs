//! In-process backend with MongoDB-like unique index semantics.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use indexmap::IndexMap;
use mongodb::bson::{Bson, Document};

use crate::{DocumentStore, InsertManyOutcome, StoreConnector, StoreError};

#[derive(Debug, Default)]
struct MemoryCollection {
    docs: Vec<Document>,
    unique_indexes: Vec<Vec<String>>,
}

impl MemoryCollection {
    fn violates_unique(&self, doc: &Document) -> bool {
        self.unique_indexes.iter().any(|fields| {
            let key = index_key(doc, fields);
            self.docs.iter().any(|existing| index_key(existing, fields) == key)
        })
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    collections: IndexMap<String, MemoryCollection>,
    sessions_opened: usize,
    sessions_closed: usize,
    reject_indexes: bool,
}

/// Shared handle to an in-memory database.
///
/// Every session handed out by [`connect`](StoreConnector::connect) sees the
/// same data, and the connector itself can be inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose index creation always fails, for exercising the
    /// "continue without index" path.
    pub fn rejecting_indexes() -> Self {
        let connector = Self::default();
        if let Ok(mut state) = connector.state.lock() {
            state.reject_indexes = true;
        }
        connector
    }

    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.read(|s| {
            s.collections
                .get(collection)
                .map(|c| c.docs.clone())
                .unwrap_or_default()
        })
    }

    pub fn count(&self, collection: &str) -> usize {
        self.read(|s| s.collections.get(collection).map_or(0, |c| c.docs.len()))
    }

    pub fn collection_names(&self) -> Vec<String> {
        self.read(|s| s.collections.keys().cloned().collect())
    }

    pub fn has_unique_index(&self, collection: &str, keys: &[&str]) -> bool {
        self.read(|s| {
            s.collections.get(collection).is_some_and(|c| {
                c.unique_indexes
                    .iter()
                    .any(|idx| idx.iter().map(String::as_str).eq(keys.iter().copied()))
            })
        })
    }

    pub fn sessions_opened(&self) -> usize {
        self.read(|s| s.sessions_opened)
    }

    pub fn sessions_closed(&self) -> usize {
        self.read(|s| s.sessions_closed)
    }

    fn read<T: Default>(&self, f: impl FnOnce(&MemoryState) -> T) -> T {
        self.state.lock().map(|s| f(&s)).unwrap_or_default()
    }
}

#[async_trait]
impl StoreConnector for MemoryConnector {
    async fn connect(&self) -> Result<Box<dyn DocumentStore>, StoreError> {
        lock(&self.state)?.sessions_opened += 1;
        Ok(Box::new(MemoryStore {
            state: Arc::clone(&self.state),
        }))
    }
}

pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<(), StoreError> {
        let mut state = lock(&self.state)?;
        let coll = state.collections.entry(collection.to_string()).or_default();
        if coll.violates_unique(&doc) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                message: "E11000 duplicate key error".into(),
            });
        }
        coll.docs.push(doc);
        Ok(())
    }

    async fn ensure_unique_index(
        &self,
        collection: &str,
        keys: &[&str],
    ) -> Result<(), StoreError> {
        let mut state = lock(&self.state)?;
        if state.reject_indexes {
            return Err(StoreError::Index {
                collection: collection.to_string(),
                message: "index creation disabled".into(),
            });
        }

        let fields: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        let coll = state.collections.entry(collection.to_string()).or_default();
        if coll.unique_indexes.contains(&fields) {
            return Ok(());
        }

        let mut seen: Vec<Vec<Bson>> = Vec::with_capacity(coll.docs.len());
        for doc in &coll.docs {
            let key = index_key(doc, &fields);
            if seen.contains(&key) {
                return Err(StoreError::Index {
                    collection: collection.to_string(),
                    message: format!("existing documents violate unique index {fields:?}"),
                });
            }
            seen.push(key);
        }

        coll.unique_indexes.push(fields);
        Ok(())
    }

    async fn insert_many_unordered(
        &self,
        collection: &str,
        docs: Vec<Document>,
    ) -> Result<InsertManyOutcome, StoreError> {
        let mut state = lock(&self.state)?;
        let coll = state.collections.entry(collection.to_string()).or_default();

        let mut outcome = InsertManyOutcome::default();
        for doc in docs {
            if coll.violates_unique(&doc) {
                outcome.duplicates += 1;
            } else {
                coll.docs.push(doc);
                outcome.inserted += 1;
            }
        }
        Ok(outcome)
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, StoreError> {
        let state = lock(&self.state)?;
        Ok(state
            .collections
            .get(collection)
            .map_or(0, |c| c.docs.len() as u64))
    }

    async fn close(self: Box<Self>) {
        if let Ok(mut state) = self.state.lock() {
            state.sessions_closed += 1;
        }
    }
}

fn lock(state: &Mutex<MemoryState>) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
    state
        .lock()
        .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
}

/// Missing fields index as null, like MongoDB does.
fn index_key(doc: &Document, fields: &[String]) -> Vec<Bson> {
    fields
        .iter()
        .map(|f| doc.get(f).cloned().unwrap_or(Bson::Null))
        .collect()
}
