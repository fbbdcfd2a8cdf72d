//! Configuration loader that handles precedence
//!
//! defaults < config file < environment variables. Command line flags are
//! applied on top by the caller through [`StoreConfigOverrides`].

use crate::config::{BackendKind, ConfigSource, StoreConfig, StoreConfigOverrides};
use cairn_core::{
    Error, Result, CAIRN_BACKEND_VAR, CAIRN_CONFIG_VAR, CAIRN_DATA_DIR_VAR, CAIRN_LOG_VAR,
};
use cairn_utils::XdgPaths;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full precedence handling
    pub fn load() -> Result<StoreConfig> {
        let mut config = StoreConfig::default();

        let config_path = Self::config_file_path();
        if let Some(file_overrides) = Self::load_from_file(&config_path)? {
            config = file_overrides.apply(config, ConfigSource::ConfigFile(config_path));
        }

        if let Some(env_overrides) = Self::load_from_env()? {
            config = env_overrides.apply(
                config,
                ConfigSource::EnvironmentVariable("CAIRN_*".to_string()),
            );
        }

        debug!(
            backend = %config.backend,
            data_dir = %config.data_dir.display(),
            source = ?config.source,
            "Store configuration resolved"
        );
        Ok(config)
    }

    /// `CAIRN_CONFIG` if set, otherwise the XDG config file
    pub fn config_file_path() -> PathBuf {
        std::env::var(CAIRN_CONFIG_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| XdgPaths::config_file())
    }

    /// Load overrides from a JSON config file, if it exists
    pub fn load_from_file(path: &Path) -> Result<Option<StoreConfigOverrides>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::file_system(path, "read config file", e))?;

        let overrides: StoreConfigOverrides = serde_json::from_str(&content).map_err(|e| {
            Error::configuration(format!(
                "config file '{}' is not valid: {e}",
                path.display()
            ))
        })?;

        Ok(Some(overrides))
    }

    /// Load overrides from environment variables
    pub fn load_from_env() -> Result<Option<StoreConfigOverrides>> {
        let mut overrides = StoreConfigOverrides::default();

        if let Ok(backend) = std::env::var(CAIRN_BACKEND_VAR) {
            overrides.backend = Some(backend.parse::<BackendKind>()?);
        }

        if let Ok(data_dir) = std::env::var(CAIRN_DATA_DIR_VAR) {
            overrides.data_dir = Some(PathBuf::from(data_dir));
        }

        if let Ok(filter) = std::env::var(CAIRN_LOG_VAR) {
            overrides.log_filter = Some(filter);
        }

        if overrides.is_empty() {
            Ok(None)
        } else {
            Ok(Some(overrides))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    fn clear_env() {
        for var in [
            CAIRN_CONFIG_VAR,
            CAIRN_BACKEND_VAR,
            CAIRN_DATA_DIR_VAR,
            CAIRN_LOG_VAR,
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_file_or_env() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        env::set_var(CAIRN_CONFIG_VAR, temp_dir.path().join("missing.json"));

        let config = ConfigLoader::load().unwrap();

        assert_eq!(config.backend, BackendKind::File);
        assert_eq!(config.source, ConfigSource::Default);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_file_then_env_precedence() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(
            &config_path,
            r#"{"backend": "memory", "data_dir": "/from/file", "log_filter": "debug"}"#,
        )
        .unwrap();
        env::set_var(CAIRN_CONFIG_VAR, &config_path);

        let from_file = ConfigLoader::load().unwrap();
        assert_eq!(from_file.backend, BackendKind::Memory);
        assert_eq!(from_file.data_dir, PathBuf::from("/from/file"));
        assert_eq!(from_file.source, ConfigSource::ConfigFile(config_path.clone()));

        env::set_var(CAIRN_DATA_DIR_VAR, "/from/env");
        let from_env = ConfigLoader::load().unwrap();
        assert_eq!(from_env.backend, BackendKind::Memory);
        assert_eq!(from_env.data_dir, PathBuf::from("/from/env"));
        assert_eq!(from_env.log_filter, "debug");
        assert!(matches!(
            from_env.source,
            ConfigSource::EnvironmentVariable(_)
        ));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_backend_in_env_is_an_error() {
        clear_env();
        env::set_var(CAIRN_BACKEND_VAR, "postgres");
        let err = ConfigLoader::load_from_env().unwrap_err();
        assert!(err.to_string().contains("postgres"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_malformed_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, "{ not json").unwrap();
        assert!(ConfigLoader::load_from_file(&config_path).is_err());
    }
}
