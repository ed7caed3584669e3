//! Cart configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use market_kv::{kv_key, Backend, KvStore};
use serde::{Deserialize, Serialize};

use crate::error::CartError;
use crate::retry::{BackoffStrategy, RetryPolicy};

/// Namespace under which the cart record is stored.
pub const STORAGE_NAMESPACE: &str = "@GoMarketplace";

/// Top-level cart configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Where and under which key the cart is stored.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Write-through behaviour.
    #[serde(default)]
    pub persist: PersistConfig,
}

impl CartConfig {
    /// Load config from a TOML or JSON file (chosen by extension).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CartError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CartError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|e| e == "json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Parse config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, CartError> {
        Ok(toml::from_str(content)?)
    }

    /// Render config as TOML.
    pub fn to_toml(&self) -> Result<String, CartError> {
        toml::to_string_pretty(self).map_err(|e| CartError::ConfigError(e.to_string()))
    }

    /// Open the configured storage backend.
    pub async fn open_store(&self) -> Result<Arc<dyn KvStore>, CartError> {
        Ok(market_kv::open(self.storage.backend, &self.storage.path).await?)
    }
}

/// Storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key holding the serialized cart.
    #[serde(default = "default_key")]
    pub key: String,

    /// Backend type.
    #[serde(default)]
    pub backend: Backend,

    /// Directory for the file backend.
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

fn default_key() -> String {
    kv_key!(STORAGE_NAMESPACE, "cart")
}

fn default_path() -> PathBuf {
    PathBuf::from(".cart")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            backend: Backend::default(),
            path: default_path(),
        }
    }
}

/// Retry settings for storage writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistConfig {
    /// Retries after a failed write (0 disables retrying).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay in milliseconds.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Backoff ceiling in milliseconds.
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    50
}

fn default_backoff_max_ms() -> u64 {
    500
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

impl PersistConfig {
    /// Retry policy for the store actor.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries).with_backoff(BackoffStrategy::Exponential {
            base: Duration::from_millis(self.backoff_base_ms),
            max: Duration::from_millis(self.backoff_max_ms),
        })
    }
}

/// Generate a default cart.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Cart configuration

[storage]
key = "{key}"
backend = "file"    # "memory" | "file"
path = ".cart"

[persist]
max_retries = 3
backoff_base_ms = 50
backoff_max_ms = 500
"#,
        key = default_key()
    )
}
