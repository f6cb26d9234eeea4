//! Error types for the ruleport system.
//!
//! Errors are organized by subsystem. The root error type, `Error`, can wrap
//! any of the subsystem-specific errors, allowing callers to handle failures
//! uniformly while still matching on the precise cause when they need to.

use thiserror::Error;

/// Root error type for ruleport.
#[derive(Debug, Error)]
pub enum Error {
    /// Persistence adapter errors
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    /// Document store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Policy model errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by the persistence adapter itself.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A full save was attempted after a filtered load
    #[error("Cannot save a filtered policy: perform an unfiltered load first")]
    InvalidState,

    /// A stored record could not be rendered into a policy line
    #[error("Failed to decode record {id}: {reason}")]
    Decode {
        /// Identifier of the offending document
        id: String,

        /// What was wrong with it
        reason: String,
    },

    /// A query referenced a field that records do not have
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Errors reported by a document store.
///
/// These are propagated verbatim; nothing in ruleport retries them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A write batch exceeded the store's item limit
    #[error("Batch of {size} writes exceeds the store limit of {limit}")]
    BatchTooLarge {
        /// Number of staged writes
        size: usize,

        /// Maximum the store accepts in one commit
        limit: usize,
    },

    /// Any other backend failure (network, permission, quota)
    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Errors related to the in-memory policy model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Model text could not be parsed
    #[error("Invalid model definition at line {line}: {reason}")]
    InvalidDefinition {
        /// 1-based line number in the model text
        line: usize,

        /// What was wrong with it
        reason: String,
    },

    /// A policy line referenced an assertion the model does not define
    #[error("Assertion not found: section {sec}, key {key}")]
    AssertionNotFound {
        /// Section letter, e.g. `p` or `g`
        sec: String,

        /// Assertion key, e.g. `p2`
        key: String,
    },
}

/// Errors related to configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration source
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    /// Failed to parse the configuration source
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Configuration parsed but holds unusable values
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type used throughout ruleport.
pub type Result<T> = std::result::Result<T, Error>;
