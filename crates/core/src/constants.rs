/// Constants used throughout the cairn codebase
// Application name, used for XDG directories
pub const APP_NAME: &str = "cairn";

// Environment variable names
pub const CAIRN_CONFIG_VAR: &str = "CAIRN_CONFIG";
pub const CAIRN_BACKEND_VAR: &str = "CAIRN_BACKEND";
pub const CAIRN_DATA_DIR_VAR: &str = "CAIRN_DATA_DIR";
pub const CAIRN_LOG_VAR: &str = "CAIRN_LOG";

// File names
pub const CONFIG_FILENAME: &str = "config.json";
pub const STORE_FILENAME: &str = "store.json";

// Default log filter
pub const DEFAULT_LOG_FILTER: &str = "info";
