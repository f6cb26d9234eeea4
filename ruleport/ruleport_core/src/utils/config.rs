//! Configuration for ruleport.
//!
//! Handles loading and validating the adapter and store settings.
//! Configuration is plain instance-scoped data: every adapter is built from
//! its own copy, nothing here is process-global.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION: &str = "casbin_rule";

/// Number of documents requested per page when enumerating a collection.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Adapter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Collection holding the rule records
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Page size used when scanning the collection
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            page_size: default_page_size(),
        }
    }
}

impl AdapterConfig {
    /// Validate the adapter settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection.is_empty() {
            return Err(ConfigError::Invalid(
                "Collection name cannot be empty".to_string(),
            ));
        }

        // Document paths use '/' as the separator.
        if self.collection.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "Collection name cannot contain '/': {}",
                self.collection
            )));
        }

        if self.page_size == 0 {
            return Err(ConfigError::Invalid("Page size cannot be zero".to_string()));
        }

        Ok(())
    }
}

/// Which document store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Volatile in-process store
    Memory,

    /// One JSON file per collection under a directory
    #[default]
    File,
}

/// Document store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend kind
    #[serde(default)]
    pub backend: StoreBackend,

    /// Data directory for the file backend
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Maximum writes accepted in one batch commit, unlimited when absent
    #[serde(default)]
    pub max_batch_writes: Option<usize>,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./ruleport-data")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
            max_batch_writes: None,
        }
    }
}

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleportConfig {
    /// Adapter settings
    #[serde(default)]
    pub adapter: AdapterConfig,

    /// Store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Log level name, overridden by the command line
    #[serde(default)]
    pub log_level: Option<String>,
}

impl RuleportConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing path or missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) if !path.exists() => {
                warn!("Configuration file not found: {}", path.display());
                RuleportConfig::default()
            }
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                let content = std::fs::read_to_string(path).map_err(|e| {
                    ConfigError::LoadFailed(format!("{}: {}", path.display(), e))
                })?;
                Self::from_toml(&content)?
            }
            None => {
                info!("No configuration file specified, using defaults");
                RuleportConfig::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.adapter.validate()?;

        if self.store.backend == StoreBackend::File && self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "File store requires a data path".to_string(),
            ));
        }

        if self.store.max_batch_writes == Some(0) {
            return Err(ConfigError::Invalid(
                "max_batch_writes cannot be zero".to_string(),
            ));
        }

        if let Some(level) = &self.log_level {
            if level.parse::<super::LogLevel>().is_err() {
                return Err(ConfigError::Invalid(format!("Unknown log level: {}", level)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = RuleportConfig::default();
        assert_eq!(config.adapter.collection, "casbin_rule");
        assert_eq!(config.adapter.page_size, 100);
        assert_eq!(config.store.backend, StoreBackend::File);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"

[adapter]
collection = "tenant_rules"
page_size = 25

[store]
backend = "memory"
max_batch_writes = 500
"#
        )
        .unwrap();

        let config = RuleportConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.adapter.collection, "tenant_rules");
        assert_eq!(config.adapter.page_size, 25);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.max_batch_writes, Some(500));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RuleportConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, RuleportConfig::default());
    }

    #[test]
    fn test_parse_failure() {
        let result = RuleportConfig::from_toml("[adapter\ncollection = 1");
        assert!(matches!(result, Err(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RuleportConfig::default();
        config.adapter.collection = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RuleportConfig::default();
        config.adapter.collection = "a/b".to_string();
        assert!(config.validate().is_err());

        let mut config = RuleportConfig::default();
        config.adapter.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = RuleportConfig::default();
        config.store.max_batch_writes = Some(0);
        assert!(config.validate().is_err());

        let mut config = RuleportConfig::default();
        config.log_level = Some("loud".to_string());
        assert!(config.validate().is_err());
    }
}
