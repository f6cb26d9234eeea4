//! # Ruleport Adapter
//!
//! `ruleport_adapter` persists policy rules into a [`DocumentStore`] and
//! restores them into a [`Model`].
//!
//! Every rule is stored as one flat record whose identifier is a hash of the
//! rule's content, so writing the same rule twice addresses the same
//! document:
//!
//! ```text
//! p, alice, data1, read  ->  { id: <hash>, pType: "p", v0: "alice", v1: "data1", v2: "read", v3: "", v4: "", v5: "" }
//! ```
//!
//! The pieces, leaves first:
//!
//! 1. **hash**: content-derived record identifiers.
//! 2. **codec**: rule ↔ record ↔ policy line.
//! 3. **filter**: field-index filters and the [`PolicyQuery`] builder.
//! 4. **adapter**: [`DocumentAdapter`], the [`Adapter`] implementation.
//!
//! [`DocumentStore`]: ruleport_docstore::DocumentStore
//! [`Model`]: ruleport_policy::Model
//! [`Adapter`]: ruleport_policy::Adapter

pub mod adapter;
pub mod codec;
pub mod filter;
pub mod hash;

// Re-export key types for convenience
pub use adapter::DocumentAdapter;
pub use codec::RuleRecord;
pub use filter::{field_predicates, PolicyQuery};
pub use hash::policy_id;
