// src/db/paths.rs
//! Default locations for the cookme database and configuration file

use std::path::PathBuf;

/// File name of the database inside the data directory
pub const DB_FILE_NAME: &str = "cookme.db";

/// Environment variable that overrides the database path
pub const DB_PATH_ENV: &str = "COOKME_DB";

/// Configuration file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory holding cookme's data
///
/// Falls back to the current directory when the platform has no data dir.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("cookme"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Default database path, honouring `COOKME_DB`
pub fn default_db_path() -> PathBuf {
    std::env::var_os(DB_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir().join(DB_FILE_NAME))
}

/// Default configuration file: `<config dir>/cookme/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("cookme"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_FILE_NAME)
}
