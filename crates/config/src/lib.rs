pub mod config;
pub mod loader;

pub use config::{BackendKind, ConfigSource, StoreConfig, StoreConfigBuilder, StoreConfigOverrides};
pub use loader::ConfigLoader;
