//! The document-store policy adapter.
//!
//! [`DocumentAdapter`] implements the engine's [`Adapter`] contract on top of
//! any [`DocumentStore`]. Each rule lives in one document of the configured
//! collection, keyed by its content hash.
//!
//! Consistency comes from the store: a single batch commit is all-or-nothing,
//! nothing more. When a write set is larger than the store accepts in one
//! commit it is split into consecutive commits, and readers can observe the
//! collection between them (for `save_policy`: emptied but not yet
//! repopulated). Callers that need a consistent view must serialize access
//! themselves.

use ruleport_core::error::{AdapterError, Result};
use ruleport_core::utils::config::{AdapterConfig, DEFAULT_COLLECTION, DEFAULT_PAGE_SIZE};
use ruleport_docstore::{DocumentStore, Query, WriteBatch, WriteOp};
use ruleport_policy::model::RULE_SECTIONS;
use ruleport_policy::{load_policy_line, Adapter, Model};
use tracing::{debug, info, warn};

use crate::codec::RuleRecord;
use crate::filter::PolicyQuery;
use crate::hash::policy_id;

/// A policy adapter persisting rules into a document store.
pub struct DocumentAdapter<S: DocumentStore> {
    /// The document store
    store: S,

    /// Collection holding the rule records
    collection: String,

    /// Documents requested per page when scanning
    page_size: usize,

    /// Whether the last load was filtered
    filtered: bool,
}

impl<S: DocumentStore> DocumentAdapter<S> {
    /// Create an adapter using the default collection.
    pub fn new(store: S) -> Self {
        Self {
            store,
            collection: DEFAULT_COLLECTION.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            filtered: false,
        }
    }

    /// Create an adapter from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the configuration does not validate.
    pub fn with_config(store: S, config: &AdapterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(store)
            .with_collection(&config.collection)
            .with_page_size(config.page_size))
    }

    /// Use another collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Scan the collection with another page size. Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// The collection holding the rule records.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start building a filter for [`Adapter::load_filtered_policy`].
    pub fn query(&self) -> PolicyQuery {
        PolicyQuery::new()
    }

    /// Identifiers of every document matching `query`.
    ///
    /// The scan runs to completion before anything is written, so documents
    /// inserted concurrently may be missed.
    fn matching_ids(&self, query: Query) -> Result<Vec<String>> {
        self.store
            .query_documents(query, self.page_size)
            .map(|doc| doc.map(|d| d.id))
            .collect()
    }

    /// Delete every document matching `query`.
    fn delete_matching(&self, query: Query) -> Result<usize> {
        let ops: Vec<WriteOp> = self
            .matching_ids(query)?
            .into_iter()
            .map(|id| WriteOp::Delete {
                collection: self.collection.clone(),
                id,
            })
            .collect();

        let removed = ops.len();
        self.commit_ops(ops)?;
        Ok(removed)
    }

    /// Commit `ops` in one batch, or in consecutive batches when the store
    /// caps the batch size below `ops.len()`. Nothing is sent for no ops.
    fn commit_ops(&self, ops: Vec<WriteOp>) -> Result<()> {
        if ops.is_empty() {
            return Ok(());
        }

        match self.store.max_batch_writes() {
            Some(limit) if ops.len() > limit => {
                warn!(
                    writes = ops.len(),
                    limit, "write set exceeds the store batch limit, committing in parts"
                );
                let mut ops = ops.into_iter();
                loop {
                    let batch: WriteBatch = ops.by_ref().take(limit).collect();
                    if batch.is_empty() {
                        break;
                    }
                    self.store.commit(batch)?;
                }
            }
            _ => self.store.commit(ops.into_iter().collect())?,
        }
        Ok(())
    }

    /// Feed every record matching `query` into the model.
    fn load_matching(&self, model: &mut Model, query: Query) -> Result<usize> {
        let mut loaded = 0;
        for snapshot in self.store.query_documents(query, self.page_size) {
            let record = RuleRecord::from_snapshot(&snapshot?)?;
            load_policy_line(&record.to_line(), model)?;
            loaded += 1;
        }
        Ok(loaded)
    }
}

impl<S: DocumentStore> Adapter for DocumentAdapter<S> {
    type Filter = PolicyQuery;

    fn load_policy(&mut self, model: &mut Model) -> Result<()> {
        let loaded = self.load_matching(model, Query::collection(&self.collection))?;
        self.filtered = false;
        info!(collection = %self.collection, loaded, "loaded policy");
        Ok(())
    }

    fn load_filtered_policy(&mut self, model: &mut Model, filter: Option<PolicyQuery>) -> Result<()> {
        let filter = match filter {
            Some(filter) => filter,
            None => return self.load_policy(model),
        };

        let query = filter.to_query(&self.collection)?;
        let loaded = self.load_matching(model, query)?;
        self.filtered = true;
        info!(collection = %self.collection, loaded, "loaded filtered policy");
        Ok(())
    }

    /// Deletes every stored record and writes the model's rules in the same
    /// batch, so the collection is replaced atomically. If the store's batch
    /// limit is too small, every delete is committed before the first write.
    fn save_policy(&self, model: &Model) -> Result<()> {
        if self.filtered {
            return Err(AdapterError::InvalidState.into());
        }

        let deletes: Vec<WriteOp> = self
            .matching_ids(Query::collection(&self.collection))?
            .into_iter()
            .map(|id| WriteOp::Delete {
                collection: self.collection.clone(),
                id,
            })
            .collect();

        let mut sets = Vec::new();
        for sec in RULE_SECTIONS {
            let Some(section) = model.section(sec) else {
                continue;
            };
            for (ptype, assertion) in section {
                for rule in &assertion.policy {
                    let record = RuleRecord::encode(ptype, rule);
                    sets.push(WriteOp::Set {
                        collection: self.collection.clone(),
                        id: record.id.clone(),
                        document: record.to_document(),
                    });
                }
            }
        }

        let (removed, written) = (deletes.len(), sets.len());
        match self.store.max_batch_writes() {
            Some(limit) if removed + written > limit => {
                // Clear fully before repopulating.
                warn!(
                    removed,
                    written,
                    limit,
                    "policy does not fit one batch, saving in two phases"
                );
                self.commit_ops(deletes)?;
                self.commit_ops(sets)?;
            }
            _ => self.commit_ops(deletes.into_iter().chain(sets).collect())?,
        }
        info!(collection = %self.collection, removed, written, "saved policy");
        Ok(())
    }

    fn add_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> Result<()> {
        let record = RuleRecord::encode(ptype, rule);
        debug!(sec, id = %record.id, line = %record, "add policy");
        self.store
            .set(&self.collection, &record.id, record.to_document())
    }

    fn add_policies(&self, sec: &str, ptype: &str, rules: &[Vec<String>]) -> Result<()> {
        debug!(sec, ptype, count = rules.len(), "add policies");
        let ops = rules
            .iter()
            .map(|rule| {
                let record = RuleRecord::encode(ptype, rule);
                WriteOp::Set {
                    collection: self.collection.clone(),
                    id: record.id.clone(),
                    document: record.to_document(),
                }
            })
            .collect();
        self.commit_ops(ops)
    }

    fn remove_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> Result<()> {
        let id = policy_id(ptype, rule);
        debug!(sec, ptype, id = %id, "remove policy");
        self.store.delete(&self.collection, &id)
    }

    /// Removes every record of `ptype`, not only the listed rules.
    ///
    /// `rules` is accepted for the trait contract but does not narrow the
    /// deletion. Use [`Adapter::remove_policy`] per rule to remove exact tuples.
    fn remove_policies(&self, sec: &str, ptype: &str, rules: &[Vec<String>]) -> Result<()> {
        let query = PolicyQuery::new().ptype(ptype).to_query(&self.collection)?;
        let removed = self.delete_matching(query)?;
        debug!(sec, ptype, requested = rules.len(), removed, "remove policies");
        Ok(())
    }

    fn remove_filtered_policy(
        &self,
        sec: &str,
        ptype: &str,
        field_index: isize,
        field_values: &[String],
    ) -> Result<()> {
        let query = PolicyQuery::from_field_values(ptype, field_index, field_values)
            .to_query(&self.collection)?;
        let removed = self.delete_matching(query)?;
        debug!(sec, ptype, field_index, removed, "remove filtered policy");
        Ok(())
    }

    fn is_filtered(&self) -> bool {
        self.filtered
    }
}
