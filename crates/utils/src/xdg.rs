use cairn_core::{APP_NAME, CONFIG_FILENAME, STORE_FILENAME};
use std::env;
use std::path::PathBuf;

/// XDG Base Directory paths for cairn
pub struct XdgPaths;

impl XdgPaths {
    /// Get XDG_CONFIG_HOME/cairn or fallback
    pub fn config_dir() -> PathBuf {
        env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .map(|home| home.join(".config"))
                    .unwrap_or_else(|| PathBuf::from(".config"))
            })
            .join(APP_NAME)
    }

    /// Get XDG_DATA_HOME/cairn or fallback
    pub fn data_dir() -> PathBuf {
        env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .map(|home| home.join(".local/share"))
                    .unwrap_or_else(|| PathBuf::from(".local/share"))
            })
            .join(APP_NAME)
    }

    /// Get the default config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_FILENAME)
    }

    /// Get the store document path inside a data directory
    pub fn store_file(data_dir: &std::path::Path) -> PathBuf {
        data_dir.join(STORE_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_xdg_paths_with_env() {
        let config_orig = env::var("XDG_CONFIG_HOME").ok();
        let data_orig = env::var("XDG_DATA_HOME").ok();

        env::set_var("XDG_CONFIG_HOME", "/tmp/config");
        env::set_var("XDG_DATA_HOME", "/tmp/data");

        assert_eq!(XdgPaths::config_dir(), PathBuf::from("/tmp/config/cairn"));
        assert_eq!(XdgPaths::data_dir(), PathBuf::from("/tmp/data/cairn"));
        assert_eq!(
            XdgPaths::config_file(),
            PathBuf::from("/tmp/config/cairn/config.json")
        );

        match config_orig {
            Some(val) => env::set_var("XDG_CONFIG_HOME", val),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }
        match data_orig {
            Some(val) => env::set_var("XDG_DATA_HOME", val),
            None => env::remove_var("XDG_DATA_HOME"),
        }
    }

    #[test]
    fn test_store_file() {
        assert_eq!(
            XdgPaths::store_file(std::path::Path::new("/var/lib/cairn")),
            PathBuf::from("/var/lib/cairn/store.json")
        );
    }
}
