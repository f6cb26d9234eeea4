//! Utility functions and types.
//!
//! Configuration loading and logging setup shared by the ruleport crates.

pub mod config;
pub mod logging;

pub use config::{AdapterConfig, RuleportConfig, StoreBackend, StoreConfig};
pub use logging::{init_logging, LogLevel};
