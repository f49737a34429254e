//! # Spyke Configuration
//!
//! Where the cart is stored and which backend the product wizard talks to.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SPYKE_STORAGE_DIR=/tmp/spyke                                       │
//! │     SPYKE_CART_KEY=spyke_cart                                          │
//! │     SPYKE_API_URL=https://spyke.example/api                            │
//! │     SPYKE_API_TOKEN=...                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/spyke/spyke.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.spyke.spyke/spyke.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # spyke.toml
//! [storage]
//! dir = "/home/me/.local/share/spyke"
//! cart_key = "spyke_cart"
//!
//! [api]
//! base_url = "http://localhost:3000/api"
//! auth_token = "..."
//! ```

use std::path::PathBuf;

use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use spyke_core::CART_STORAGE_KEY;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "spyke.toml";

// =============================================================================
// Storage Settings
// =============================================================================

/// Local persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory for [`FileStorage`](crate::storage::FileStorage).
    ///
    /// Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Key the cart is stored under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_cart_key() -> String {
    CART_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            dir: None,
            cart_key: default_cart_key(),
        }
    }
}

// =============================================================================
// API Settings
// =============================================================================

/// Backend products API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for authenticated calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            auth_token: None,
        }
    }
}

// =============================================================================
// Spyke Config
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpykeConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub api: ApiSettings,
}

impl SpykeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path` or the platform `spyke.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| StoreError::storage(path.display().to_string(), e))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration as pretty TOML.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::storage(parent.display().to_string(), e))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .map_err(|e| StoreError::storage(path.display().to_string(), e))?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        if self.storage.cart_key.trim().is_empty() {
            return Err(StoreError::Config("storage.cart_key must not be empty".into()));
        }

        let url = &self.api.base_url;
        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => {
                return Err(StoreError::Config(format!(
                    "api.base_url must be an http:// or https:// URL, got: {}",
                    url
                )))
            }
        }

        Ok(())
    }

    /// Applies `SPYKE_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("SPYKE_STORAGE_DIR") {
            debug!(dir = %dir, "Overriding storage dir from environment");
            self.storage.dir = Some(PathBuf::from(dir));
        }

        if let Some(key) = var("SPYKE_CART_KEY") {
            self.storage.cart_key = key;
        }

        if let Some(url) = var("SPYKE_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(token) = var("SPYKE_API_TOKEN") {
            self.api.auth_token = Some(token).filter(|t| !t.is_empty());
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "spyke", "spyke")
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Directory the file storage writes to.
    ///
    /// Falls back to `./.spyke` when no platform data directory exists.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage
            .dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from(".spyke"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = SpykeConfig::default();
        assert_eq!(config.storage.cart_key, "spyke_cart");
        assert!(config.api.auth_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SpykeConfig::default();
        config.api.base_url = "ftp://example.com".into();
        assert!(matches!(config.validate(), Err(StoreError::Config(_))));
        config.api.base_url = "http://".into();
        assert!(config.validate().is_err());

        let mut config = SpykeConfig::default();
        config.storage.cart_key = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SPYKE_STORAGE_DIR", "/tmp/spyke-test"),
            ("SPYKE_API_URL", "https://spyke.example/api"),
            ("SPYKE_API_TOKEN", "tok"),
        ]
        .into_iter()
        .collect();

        let mut config = SpykeConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.storage_dir(), PathBuf::from("/tmp/spyke-test"));
        assert_eq!(config.storage.cart_key, "spyke_cart");
        assert_eq!(config.api.base_url, "https://spyke.example/api");
        assert_eq!(config.api.auth_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SpykeConfig = toml::from_str("[api]\nbase_url = \"https://x.dev\"\n").unwrap();
        assert_eq!(config.api.base_url, "https://x.dev");
        assert_eq!(config.storage, StorageSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf/spyke.toml");

        let mut config = SpykeConfig::default();
        config.storage.cart_key = "cart_v2".into();
        config.save(Some(path.clone())).unwrap();

        let loaded: SpykeConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.storage.cart_key, "cart_v2");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spyke.toml");
        std::fs::write(&path, "[storage\n").unwrap();

        assert!(matches!(
            SpykeConfig::load(Some(path)),
            Err(StoreError::Config(_))
        ));
    }
}
