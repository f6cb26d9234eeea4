//! # Ruleport Policy
//!
//! `ruleport_policy` is the engine-facing half of ruleport. It defines the
//! in-memory policy model, the line loader the model is populated through,
//! and the `Adapter` trait that storage backends implement.
//!
//! Key concepts:
//!
//! 1. **Rule**: a rule-type tag (`p`, `g2`, ...) plus up to six ordered
//!    string values.
//!
//! 2. **Model**: sections of named assertions, each holding its rules.
//!
//! 3. **Policy line**: the text form of a rule, `p, alice, data1, read`,
//!    which is how stored rules re-enter a model.

pub mod adapter;
pub mod loader;
pub mod model;

// Re-export key types and traits for convenience
pub use adapter::Adapter;
pub use loader::load_policy_line;
pub use model::{Assertion, Model, BASIC_RBAC_MODEL};
