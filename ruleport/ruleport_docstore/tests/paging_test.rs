//! Paged enumeration must visit every matching document exactly once,
//! whatever the page size, on every store.

use std::collections::BTreeSet;

use ruleport_core::Result;
use ruleport_docstore::{
    Document, DocumentStore, FileDocumentStore, InMemoryDocumentStore, Query, WriteBatch,
};
use serde_json::json;

fn seed<S: DocumentStore>(store: &S, count: usize) {
    let mut batch = WriteBatch::new();
    for i in 0..count {
        let doc: Document = json!({ "group": (i % 3).to_string(), "n": i })
            .as_object()
            .cloned()
            .unwrap();
        batch.set("items", format!("item-{:03}", i), doc);
    }
    store.commit(batch).unwrap();
}

fn ids<S: DocumentStore>(store: &S, query: Query, page_size: usize) -> Vec<String> {
    store
        .query_documents(query, page_size)
        .map(|d| d.map(|d| d.id))
        .collect::<Result<Vec<_>>>()
        .unwrap()
}

fn check_store<S: DocumentStore>(store: &S) {
    seed(store, 25);

    for page_size in [1, 2, 7, 25, 100] {
        let all = ids(store, Query::collection("items"), page_size);
        assert_eq!(all.len(), 25, "page size {}", page_size);
        let unique: BTreeSet<_> = all.iter().collect();
        assert_eq!(unique.len(), 25, "page size {}", page_size);

        let group = ids(
            store,
            Query::collection("items").where_eq("group", "1"),
            page_size,
        );
        assert_eq!(group.len(), 8, "page size {}", page_size);
    }

    assert!(ids(store, Query::collection("absent"), 10).is_empty());
}

#[test]
fn in_memory_paging_is_complete() {
    check_store(&InMemoryDocumentStore::new());
}

#[test]
fn file_paging_is_complete() {
    let dir = tempfile::tempdir().unwrap();
    check_store(&FileDocumentStore::open(dir.path()).unwrap());
}
