//! Equality queries over a collection.

use serde_json::Value;

use crate::document::Document;

/// `field == value`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPredicate {
    /// Field name.
    pub field: String,

    /// Required value.
    pub value: Value,
}

impl FieldPredicate {
    /// Create an equality predicate.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether the document satisfies this predicate.
    pub fn matches(&self, document: &Document) -> bool {
        document.get(&self.field) == Some(&self.value)
    }
}

/// A query: every document of a collection satisfying all predicates.
///
/// A query without predicates selects the whole collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    collection: String,
    predicates: Vec<FieldPredicate>,
}

impl Query {
    /// Select every document of `collection`.
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            predicates: Vec::new(),
        }
    }

    /// Narrow the query with `field == value`.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push(FieldPredicate::eq(field, value));
        self
    }

    /// Narrow the query with an existing predicate.
    pub fn with_predicate(mut self, predicate: FieldPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// The queried collection.
    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    /// The predicates, in the order they were added.
    pub fn predicates(&self) -> &[FieldPredicate] {
        &self.predicates
    }

    /// Whether the document satisfies every predicate.
    pub fn matches(&self, document: &Document) -> bool {
        self.predicates.iter().all(|p| p.matches(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let query = Query::collection("rules");
        assert!(query.matches(&doc(json!({ "pType": "p" }))));
        assert!(query.matches(&Document::new()));
    }

    #[test]
    fn test_all_predicates_must_hold() {
        let query = Query::collection("rules")
            .where_eq("pType", "p")
            .where_eq("v1", "alice");

        assert!(query.matches(&doc(json!({ "pType": "p", "v0": "x", "v1": "alice" }))));
        assert!(!query.matches(&doc(json!({ "pType": "g", "v1": "alice" }))));
        assert!(!query.matches(&doc(json!({ "pType": "p" }))));
        assert_eq!(query.predicates().len(), 2);
        assert_eq!(query.collection_name(), "rules");
    }

    #[test]
    fn test_values_compare_by_type() {
        let predicate = FieldPredicate::eq("n", 1);
        assert!(predicate.matches(&doc(json!({ "n": 1 }))));
        assert!(!predicate.matches(&doc(json!({ "n": "1" }))));
    }
}
