//! # Ruleport Core
//!
//! `ruleport_core` provides the shared building blocks for the ruleport
//! crates: the error hierarchy, adapter configuration and logging helpers.
//!
//! ## Crate Structure
//!
//! - **error**: Error types for all ruleport components
//! - **utils**: Configuration and logging utilities

pub mod error;
pub mod utils;

// Re-export key types for convenience
pub use error::{AdapterError, ConfigError, Error, ModelError, Result, StoreError};
pub use utils::{AdapterConfig, LogLevel, RuleportConfig, StoreBackend, StoreConfig};
