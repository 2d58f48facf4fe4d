// src/config.rs
//! Configuration file parsing
//!
//! Supports TOML configuration files with the following sections:
//! - [storage] - Database path, open timeout, write mode, bucket names
//! - [matching] - How expired and non-perishable ingredients are treated
//! - [server] - Recipe server bind address
//! - [remote] - Remote recipe catalog endpoint
//!
//! Every key is optional; a missing file means all defaults.

use crate::collection::WriteMode;
use crate::db::{StoreConfig, paths};
use crate::error::{Error, Result};
use crate::ingredient::{CaseSensitivity, NullExpirationPolicy};
use crate::inventory::INVENTORY_BUCKET;
use crate::matching::MatchOptions;
use crate::recipe::RECIPES_BUCKET;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CookmeConfig {
    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub matching: MatchingSection,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub remote: RemoteSection,
}

/// Storage configuration section
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    /// Database file (default: platform data dir)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// How long to wait for a locked database (e.g., "1s", "500ms")
    #[serde(default = "default_open_timeout")]
    pub open_timeout: String,

    /// "last-writer-wins" or "compare-and-swap"
    #[serde(default)]
    pub write_mode: WriteMode,

    /// Whether delete-by-name must match case exactly
    #[serde(default = "default_true")]
    pub case_sensitive_delete: bool,

    #[serde(default = "default_inventory_bucket")]
    pub inventory_bucket: String,

    #[serde(default = "default_recipe_bucket")]
    pub recipe_bucket: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            path: None,
            open_timeout: default_open_timeout(),
            write_mode: WriteMode::default(),
            case_sensitive_delete: true,
            inventory_bucket: default_inventory_bucket(),
            recipe_bucket: default_recipe_bucket(),
        }
    }
}

fn default_open_timeout() -> String {
    "1s".to_string()
}

fn default_true() -> bool {
    true
}

fn default_inventory_bucket() -> String {
    INVENTORY_BUCKET.to_string()
}

fn default_recipe_bucket() -> String {
    RECIPES_BUCKET.to_string()
}

/// Matching configuration section
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingSection {
    /// "first", "last" or "exclude"
    #[serde(default)]
    pub null_expiration: NullExpirationPolicy,

    /// Let expired ingredients count towards recipes
    #[serde(default)]
    pub include_expired: bool,
}

/// Server configuration section
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

/// Remote catalog configuration section
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteSection {
    /// Recipe server URL; when set, recipes are read from it instead of locally
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Per-request timeout (e.g., "5s")
    #[serde(default = "default_remote_timeout")]
    pub timeout: String,
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: default_remote_timeout(),
        }
    }
}

fn default_remote_timeout() -> String {
    "5s".to_string()
}

impl CookmeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: CookmeConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let timeout = self.open_timeout()?;
        if timeout.is_zero() {
            return Err(Error::Config(
                "storage.open_timeout must be greater than zero".to_string(),
            ));
        }
        self.remote_timeout()?;
        self.bind_addr()?;

        if self.storage.inventory_bucket.is_empty() || self.storage.recipe_bucket.is_empty() {
            return Err(Error::Config("bucket names must not be empty".to_string()));
        }
        if self.storage.inventory_bucket == self.storage.recipe_bucket {
            return Err(Error::Config(format!(
                "storage.inventory_bucket and storage.recipe_bucket must differ, both are '{}'",
                self.storage.recipe_bucket
            )));
        }

        if let Some(endpoint) = &self.remote.endpoint {
            url::Url::parse(endpoint)
                .map_err(|e| Error::Config(format!("Invalid remote.endpoint '{}': {}", endpoint, e)))?;
        }
        Ok(())
    }

    /// Database path from the file, or the platform default
    pub fn db_path(&self) -> PathBuf {
        self.storage
            .path
            .clone()
            .unwrap_or_else(paths::default_db_path)
    }

    pub fn open_timeout(&self) -> Result<Duration> {
        parse_duration(&self.storage.open_timeout)
            .map_err(|e| Error::Config(format!("storage.open_timeout: {}", e)))
    }

    pub fn remote_timeout(&self) -> Result<Duration> {
        parse_duration(&self.remote.timeout)
            .map_err(|e| Error::Config(format!("remote.timeout: {}", e)))
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| Error::Config(format!("Invalid server.bind address '{}': {}", self.server.bind, e)))
    }

    /// Store configuration for `db_path` (or the configured path when `None`)
    pub fn store_config(&self, db_path: Option<&Path>) -> Result<StoreConfig> {
        let path = db_path.map(Path::to_path_buf).unwrap_or_else(|| self.db_path());
        Ok(StoreConfig::new(path).with_open_timeout(self.open_timeout()?))
    }

    pub fn delete_case(&self) -> CaseSensitivity {
        if self.storage.case_sensitive_delete {
            CaseSensitivity::Sensitive
        } else {
            CaseSensitivity::Insensitive
        }
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            null_expiration: self.matching.null_expiration,
            include_expired: self.matching.include_expired,
        }
    }
}

/// Parse a human-readable duration string (e.g., "500ms", "15m", "1h", "30s")
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim().to_lowercase();

    let (num_str, unit_ms) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('d') {
        (n, 24 * 60 * 60 * 1000)
    } else if let Some(n) = s.strip_suffix('h') {
        (n, 60 * 60 * 1000)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60 * 1000)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1000)
    } else {
        // Assume seconds
        (s.as_str(), 1000)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid duration: {}", s))?;

    let millis = num
        .checked_mul(unit_ms)
        .ok_or_else(|| format!("Duration too large: {}", s))?;

    Ok(Duration::from_millis(millis))
}
