//! Store configuration types and builder

use cairn_core::{Error, Result};
use cairn_utils::XdgPaths;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which key-value substrate backs the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Process-local map, lost on exit
    Memory,
    /// JSON document under `data_dir`
    File,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Memory => f.write_str("memory"),
            BackendKind::File => f.write_str("file"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Ok(BackendKind::Memory),
            "file" => Ok(BackendKind::File),
            other => Err(Error::configuration(format!(
                "unknown backend '{other}', expected 'memory' or 'file'"
            ))),
        }
    }
}

/// Source of configuration for debugging and precedence tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default configuration
    Default,
    /// Configuration file
    ConfigFile(PathBuf),
    /// Environment variable
    EnvironmentVariable(String),
    /// Command line argument
    CommandLine,
}

/// Resolved configuration of a local store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: BackendKind,
    pub data_dir: PathBuf,
    pub log_filter: String,
    pub source: ConfigSource,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::File,
            data_dir: XdgPaths::data_dir(),
            log_filter: cairn_core::DEFAULT_LOG_FILTER.to_string(),
            source: ConfigSource::Default,
        }
    }
}

impl StoreConfig {
    /// Path of the store document for the file backend
    pub fn store_file(&self) -> PathBuf {
        XdgPaths::store_file(&self.data_dir)
    }
}

/// Partial configuration as found in a config file or the environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfigOverrides {
    #[serde(default)]
    pub backend: Option<BackendKind>,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl StoreConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.backend.is_none() && self.data_dir.is_none() && self.log_filter.is_none()
    }

    /// Apply every field that is set on top of `config`
    pub fn apply(self, mut config: StoreConfig, source: ConfigSource) -> StoreConfig {
        if self.is_empty() {
            return config;
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(log_filter) = self.log_filter {
            config.log_filter = log_filter;
        }
        config.source = source;
        config
    }
}

/// Builder for creating store configurations
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
        }
    }

    /// Start from an already resolved configuration
    pub fn from_config(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = data_dir.into();
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.log_filter = filter.into();
        self
    }

    pub fn with_source(mut self, source: ConfigSource) -> Self {
        self.config.source = source;
        self
    }

    /// Build the configuration
    pub fn build(self) -> StoreConfig {
        self.config
    }
}

impl Default for StoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
