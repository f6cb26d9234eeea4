//! File-backed document store.
//!
//! Each collection is one JSON object file, `<base_dir>/<collection>.json`,
//! mapping document identifiers to documents. Writes go to a temporary file
//! that is renamed over the original, so a reader sees either the old or the
//! new content of a collection.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::PathBuf;

use parking_lot::Mutex;
use ruleport_core::error::{Result, StoreError};
use tracing::{debug, trace};

use super::{check_batch_size, page_of, DocumentStore, Page};
use crate::batch::{WriteBatch, WriteOp};
use crate::document::Document;
use crate::query::Query;

type Collection = BTreeMap<String, Document>;

/// A document store persisting collections as JSON files.
pub struct FileDocumentStore {
    /// Base directory for collection files
    base_dir: PathBuf,

    /// Serializes access within this process
    lock: Mutex<()>,

    /// Optional cap on operations per commit
    max_batch_writes: Option<usize>,
}

impl FileDocumentStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(StoreError::from)?;
        debug!("Opened file document store at {}", base_dir.display());

        Ok(Self {
            base_dir,
            lock: Mutex::new(()),
            max_batch_writes: None,
        })
    }

    /// Cap the number of operations accepted in one commit.
    pub fn with_max_batch_writes(mut self, limit: usize) -> Self {
        self.max_batch_writes = Some(limit);
        self
    }

    /// Get the file path for a collection
    fn collection_path(&self, collection: &str) -> Result<PathBuf> {
        if collection.is_empty()
            || collection.contains(&['/', '\\'][..])
            || collection.starts_with('.')
        {
            return Err(
                StoreError::Backend(format!("Invalid collection name: {:?}", collection)).into(),
            );
        }
        Ok(self.base_dir.join(format!("{}.json", collection)))
    }

    fn read_collection(&self, collection: &str) -> Result<Collection> {
        let path = self.collection_path(collection)?;
        match fs::read(&path) {
            Ok(data) => Ok(serde_json::from_slice(&data).map_err(StoreError::from)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Collection::new()),
            Err(e) => Err(StoreError::Io(e).into()),
        }
    }

    /// Write and sync the new content of a collection next to its file.
    ///
    /// Returns the temporary path and the collection path it must be
    /// renamed to. A failed write leaves no temporary file behind.
    fn stage_collection(
        &self,
        collection: &str,
        documents: &Collection,
    ) -> Result<(PathBuf, PathBuf)> {
        let path = self.collection_path(collection)?;
        let data = serde_json::to_vec_pretty(documents).map_err(StoreError::from)?;

        let temp_path = path.with_extension("json.tmp");
        let written = fs::write(&temp_path, data)
            .and_then(|_| fs::File::open(&temp_path))
            .and_then(|f| f.sync_all());
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::Io(e).into());
        }
        Ok((temp_path, path))
    }

    fn write_collection(&self, collection: &str, documents: &Collection) -> Result<()> {
        let (temp_path, path) = self.stage_collection(collection, documents)?;
        fs::rename(&temp_path, &path).map_err(StoreError::from)?;

        trace!(collection, documents = documents.len(), "wrote collection");
        Ok(())
    }
}

impl DocumentStore for FileDocumentStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let _guard = self.lock.lock();
        Ok(self.read_collection(collection)?.remove(id))
    }

    fn set(&self, collection: &str, id: &str, document: Document) -> Result<()> {
        let _guard = self.lock.lock();
        let mut documents = self.read_collection(collection)?;
        documents.insert(id.to_string(), document);
        self.write_collection(collection, &documents)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut documents = self.read_collection(collection)?;
        if documents.remove(id).is_some() {
            self.write_collection(collection, &documents)?;
        }
        Ok(())
    }

    fn fetch_page(&self, query: &Query, cursor: Option<&str>, limit: usize) -> Result<Page> {
        let _guard = self.lock.lock();
        let documents = self.read_collection(query.collection_name())?;
        Ok(page_of(&documents, query, cursor, limit))
    }

    /// Applies the batch to in-memory copies of every touched collection,
    /// then writes and syncs a temporary file per collection. Files are only
    /// renamed into place once every temporary file is on disk; a failure
    /// before that point removes them and changes nothing.
    ///
    /// Each collection is replaced by its own rename. If a rename fails
    /// after another one succeeded, the earlier collections keep their new
    /// content. A batch touching a single collection is always atomic.
    fn commit(&self, batch: WriteBatch) -> Result<()> {
        check_batch_size(&batch, self.max_batch_writes)?;
        let _guard = self.lock.lock();

        let mut touched: HashMap<String, Collection> = HashMap::new();
        for op in batch.into_ops() {
            if !touched.contains_key(op.collection()) {
                let documents = self.read_collection(op.collection())?;
                touched.insert(op.collection().to_string(), documents);
            }

            match op {
                WriteOp::Set {
                    collection,
                    id,
                    document,
                } => {
                    if let Some(docs) = touched.get_mut(&collection) {
                        docs.insert(id, document);
                    }
                }
                WriteOp::Delete { collection, id } => {
                    if let Some(docs) = touched.get_mut(&collection) {
                        docs.remove(&id);
                    }
                }
            }
        }

        let mut staged = Vec::with_capacity(touched.len());
        for (collection, documents) in &touched {
            match self.stage_collection(collection, documents) {
                Ok(paths) => staged.push(paths),
                Err(e) => {
                    for (temp_path, _) in &staged {
                        let _ = fs::remove_file(temp_path);
                    }
                    return Err(e);
                }
            }
        }

        for (temp_path, path) in &staged {
            fs::rename(temp_path, path).map_err(StoreError::from)?;
        }
        debug!(collections = touched.len(), "committed batch");
        Ok(())
    }

    fn max_batch_writes(&self) -> Option<usize> {
        self.max_batch_writes
    }
}
