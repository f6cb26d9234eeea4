//! Write batches.
//!
//! A batch stages set and delete operations; a store applies all of them in
//! one commit or none of them.

use crate::document::Document;

/// One staged write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create or replace a document.
    Set {
        /// Target collection.
        collection: String,
        /// Document identifier.
        id: String,
        /// New document content.
        document: Document,
    },

    /// Delete a document; absent documents are ignored.
    Delete {
        /// Target collection.
        collection: String,
        /// Document identifier.
        id: String,
    },
}

impl WriteOp {
    /// The collection this operation touches.
    pub fn collection(&self) -> &str {
        match self {
            Self::Set { collection, .. } | Self::Delete { collection, .. } => collection,
        }
    }

    /// The document this operation touches.
    pub fn id(&self) -> &str {
        match self {
            Self::Set { id, .. } | Self::Delete { id, .. } => id,
        }
    }
}

/// A set of staged writes.
///
/// Operations are applied in staging order, so a delete followed by a set of
/// the same document leaves the new document in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a create-or-replace.
    pub fn set(
        &mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        document: Document,
    ) -> &mut Self {
        self.ops.push(WriteOp::Set {
            collection: collection.into(),
            id: id.into(),
            document,
        });
        self
    }

    /// Stage a delete.
    pub fn delete(&mut self, collection: impl Into<String>, id: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Delete {
            collection: collection.into(),
            id: id.into(),
        });
        self
    }

    /// Number of staged operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The staged operations.
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Consume the batch, yielding its operations.
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

impl FromIterator<WriteOp> for WriteBatch {
    fn from_iter<I: IntoIterator<Item = WriteOp>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl Extend<WriteOp> for WriteBatch {
    fn extend<I: IntoIterator<Item = WriteOp>>(&mut self, iter: I) {
        self.ops.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_ops() {
        let ops = vec![
            WriteOp::Delete {
                collection: "rules".to_string(),
                id: "a".to_string(),
            },
            WriteOp::Delete {
                collection: "rules".to_string(),
                id: "b".to_string(),
            },
        ];
        let mut batch: WriteBatch = ops.clone().into_iter().collect();
        assert_eq!(batch.ops(), ops.as_slice());

        batch.extend(ops);
        assert_eq!(batch.len(), 4);
    }

    #[test]
    fn test_staging_order() {
        let mut batch = WriteBatch::new();
        assert!(batch.is_empty());

        batch
            .delete("rules", "a")
            .set("rules", "a", Document::new())
            .delete("other", "b");

        assert_eq!(batch.len(), 3);
        assert!(matches!(batch.ops()[0], WriteOp::Delete { .. }));
        assert!(matches!(batch.ops()[1], WriteOp::Set { .. }));
        assert_eq!(batch.ops()[2].collection(), "other");
        assert_eq!(batch.ops()[2].id(), "b");
    }
}
