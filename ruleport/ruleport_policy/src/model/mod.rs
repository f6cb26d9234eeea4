//! Policy models.
//!
//! This module defines the in-memory model the storage adapter loads into
//! and saves from.

pub mod assertion;
pub mod definition;

pub use assertion::Assertion;
pub use definition::{Model, BASIC_RBAC_MODEL, RULE_SECTIONS};
