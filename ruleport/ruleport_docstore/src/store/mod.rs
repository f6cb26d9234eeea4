//! Document storage.
//!
//! This module provides the `DocumentStore` trait and its implementations.

mod file;
mod in_memory;

pub use file::FileDocumentStore;
pub use in_memory::InMemoryDocumentStore;

use std::collections::{BTreeMap, VecDeque};
use std::ops::Bound;

use ruleport_core::error::{Result, StoreError};

use crate::batch::WriteBatch;
use crate::document::{Document, DocumentSnapshot};
use crate::query::Query;

/// One page of query results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Matching documents, ordered by identifier.
    pub documents: Vec<DocumentSnapshot>,

    /// Cursor for the next page, `None` when this is the last one.
    pub next_cursor: Option<String>,
}

/// Trait for document stores.
///
/// A document store holds named collections of JSON documents, each
/// addressed by a string identifier.
pub trait DocumentStore: Send + Sync {
    /// Get a document.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(document))` - The document exists.
    /// * `Ok(None)` - The document does not exist.
    /// * `Err` - The store failed.
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Create or replace a document.
    fn set(&self, collection: &str, id: &str, document: Document) -> Result<()>;

    /// Delete a document. Deleting an absent document succeeds.
    fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Fetch one page of the documents matching `query`.
    ///
    /// # Arguments
    ///
    /// * `query` - The collection and predicates.
    /// * `cursor` - The `next_cursor` of the previous page, `None` for the first.
    /// * `limit` - Maximum number of documents in the page.
    fn fetch_page(&self, query: &Query, cursor: Option<&str>, limit: usize) -> Result<Page>;

    /// Apply every operation of the batch, or none of them.
    ///
    /// The guarantee always holds within one collection. Implementations
    /// that replace collections independently say so when a batch spanning
    /// several collections can be left half applied.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - All operations were applied.
    /// * `Err` - Nothing was applied, apart from the case noted above.
    fn commit(&self, batch: WriteBatch) -> Result<()>;

    /// Maximum number of operations accepted in one commit.
    fn max_batch_writes(&self) -> Option<usize> {
        None
    }

    /// Iterate over every document in a collection.
    fn documents(&self, collection: &str, page_size: usize) -> DocumentIter<'_, Self>
    where
        Self: Sized,
    {
        DocumentIter::new(self, Query::collection(collection), page_size)
    }

    /// Iterate over the documents matching a query.
    fn query_documents(&self, query: Query, page_size: usize) -> DocumentIter<'_, Self>
    where
        Self: Sized,
    {
        DocumentIter::new(self, query, page_size)
    }
}

/// Iterator over query results that fetches one page at a time.
///
/// Yields each matching document once. After the first error the iterator
/// is exhausted.
pub struct DocumentIter<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    query: Query,
    page_size: usize,
    cursor: Option<String>,
    buffer: VecDeque<DocumentSnapshot>,
    exhausted: bool,
}

impl<'a, S: DocumentStore + ?Sized> DocumentIter<'a, S> {
    /// Create an iterator. A `page_size` of zero is treated as one.
    pub fn new(store: &'a S, query: Query, page_size: usize) -> Self {
        Self {
            store,
            query,
            page_size: page_size.max(1),
            cursor: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }
}

impl<S: DocumentStore + ?Sized> Iterator for DocumentIter<'_, S> {
    type Item = Result<DocumentSnapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(doc) = self.buffer.pop_front() {
                return Some(Ok(doc));
            }
            if self.exhausted {
                return None;
            }

            match self
                .store
                .fetch_page(&self.query, self.cursor.as_deref(), self.page_size)
            {
                Ok(page) => {
                    self.exhausted = page.next_cursor.is_none();
                    self.cursor = page.next_cursor;
                    self.buffer.extend(page.documents);
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Slice one page out of an id-ordered collection.
pub(crate) fn page_of(
    documents: &BTreeMap<String, Document>,
    query: &Query,
    cursor: Option<&str>,
    limit: usize,
) -> Page {
    let lower = match cursor {
        Some(c) => Bound::Excluded(c),
        None => Bound::Unbounded,
    };

    let mut matching = documents
        .range::<str, _>((lower, Bound::Unbounded))
        .filter(|(_, doc)| query.matches(doc));

    let documents: Vec<DocumentSnapshot> = matching
        .by_ref()
        .take(limit)
        .map(|(id, doc)| DocumentSnapshot::new(id.clone(), doc.clone()))
        .collect();

    let next_cursor = if documents.len() == limit && matching.next().is_some() {
        documents.last().map(|d| d.id.clone())
    } else {
        None
    };

    Page {
        documents,
        next_cursor,
    }
}

/// Reject batches larger than the store accepts.
pub(crate) fn check_batch_size(batch: &WriteBatch, limit: Option<usize>) -> Result<()> {
    match limit {
        Some(limit) if batch.len() > limit => Err(StoreError::BatchTooLarge {
            size: batch.len(),
            limit,
        }
        .into()),
        _ => Ok(()),
    }
}
