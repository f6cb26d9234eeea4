//! Documents.

use serde_json::{Map, Value};

/// A stored document: a JSON object.
pub type Document = Map<String, Value>;

/// A document together with its identifier, as returned by queries.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    /// The document identifier within its collection.
    pub id: String,

    /// The document fields.
    pub data: Document,
}

impl DocumentSnapshot {
    /// Create a snapshot.
    pub fn new(id: impl Into<String>, data: Document) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}
