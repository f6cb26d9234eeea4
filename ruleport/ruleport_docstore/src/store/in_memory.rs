//! In-memory document store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use ruleport_core::error::Result;
use tracing::trace;

use super::{check_batch_size, page_of, DocumentStore, Page};
use crate::batch::{WriteBatch, WriteOp};
use crate::document::Document;
use crate::query::Query;

type Collections = HashMap<String, BTreeMap<String, Document>>;

/// An in-memory document store.
///
/// Clones share the same data. Batch commits hold the write lock for the
/// whole batch, so readers never observe a partially applied batch.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    /// The collections, indexed by name.
    collections: Arc<RwLock<Collections>>,

    /// Optional cap on operations per commit.
    max_batch_writes: Option<usize>,
}

impl InMemoryDocumentStore {
    /// Create a new in-memory document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of operations accepted in one commit.
    pub fn with_max_batch_writes(mut self, limit: usize) -> Self {
        self.max_batch_writes = Some(limit);
        self
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    /// Whether a collection holds no documents.
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Copy of a collection's documents, keyed by identifier.
    pub fn snapshot(&self, collection: &str) -> BTreeMap<String, Document> {
        self.collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

fn apply(collections: &mut Collections, op: WriteOp) {
    match op {
        WriteOp::Set {
            collection,
            id,
            document,
        } => {
            collections.entry(collection).or_default().insert(id, document);
        }
        WriteOp::Delete { collection, id } => {
            if let Some(docs) = collections.get_mut(&collection) {
                docs.remove(&id);
            }
        }
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    fn set(&self, collection: &str, id: &str, document: Document) -> Result<()> {
        trace!(collection, id, "set");
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        trace!(collection, id, "delete");
        if let Some(docs) = self.collections.write().get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    fn fetch_page(&self, query: &Query, cursor: Option<&str>, limit: usize) -> Result<Page> {
        let collections = self.collections.read();
        Ok(match collections.get(query.collection_name()) {
            Some(docs) => page_of(docs, query, cursor, limit),
            None => Page::default(),
        })
    }

    fn commit(&self, batch: WriteBatch) -> Result<()> {
        check_batch_size(&batch, self.max_batch_writes)?;
        trace!(ops = batch.len(), "commit");

        let mut collections = self.collections.write();
        for op in batch.into_ops() {
            apply(&mut collections, op);
        }
        Ok(())
    }

    fn max_batch_writes(&self) -> Option<usize> {
        self.max_batch_writes
    }
}
