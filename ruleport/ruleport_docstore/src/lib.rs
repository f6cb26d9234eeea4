//! # Ruleport Docstore
//!
//! `ruleport_docstore` defines the document store the ruleport adapter
//! persists into: collections of JSON documents addressed by string
//! identifiers, equality queries consumed page by page, and write batches
//! committed atomically.
//!
//! Two stores are provided:
//!
//! - [`InMemoryDocumentStore`]: volatile, for tests and embedding.
//! - [`FileDocumentStore`]: one JSON file per collection under a directory.

pub mod batch;
pub mod document;
pub mod query;
pub mod store;

// Re-export key types and traits for convenience
pub use batch::{WriteBatch, WriteOp};
pub use document::{Document, DocumentSnapshot};
pub use query::{FieldPredicate, Query};
pub use store::{DocumentIter, DocumentStore, FileDocumentStore, InMemoryDocumentStore, Page};
