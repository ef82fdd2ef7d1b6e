//! Configuration handling.
//!
//! The configuration file is a JSON document holding the user id and the poll
//! periods for the synchronization driver. An embedding application loads it
//! once at startup; everything else (document paths, defaults) is derived.

use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const APP_NAME: &str = "budget-sync";
const CONFIG_VERSION: u8 = 1;

/// Taxonomy snapshots refresh twice a second.
const DEFAULT_TAXONOMY_POLL_MS: u64 = 500;
/// The transaction ledger refreshes once a second.
const DEFAULT_LEDGER_POLL_MS: u64 = 1000;
/// Upper bound on documents fetched per ledger poll tick.
const DEFAULT_LEDGER_QUERY_LIMIT: usize = 500;

/// The documents and collections belonging to one user.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Paths {
    /// The single taxonomy document.
    pub taxonomy: String,
    /// The transactions collection.
    pub transactions: String,
    /// The goals collection.
    pub goals: String,
}

impl Paths {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            taxonomy: format!("users/{user_id}/categories"),
            transactions: format!("users/{user_id}/transactions"),
            goals: format!("users/{user_id}/goals"),
        }
    }
}

/// The runtime configuration of the engine.
#[derive(Debug, Clone)]
pub struct Config {
    config_file: ConfigFile,
    paths: Paths,
}

impl Config {
    /// Creates a configuration with default settings for the given user.
    pub fn new(user_id: impl Into<String>) -> Self {
        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            user_id: user_id.into(),
            taxonomy_poll_ms: None,
            ledger_poll_ms: None,
            ledger_query_limit: None,
        };
        let paths = Paths::for_user(&config_file.user_id);
        Self { config_file, paths }
    }

    /// Loads the configuration from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config_file = ConfigFile::load(path).await?;
        let paths = Paths::for_user(&config_file.user_id);
        Ok(Self { config_file, paths })
    }

    /// Saves the configuration to a JSON file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.config_file.save(path).await
    }

    pub fn user_id(&self) -> &str {
        &self.config_file.user_id
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// The period of the taxonomy poll stream.
    pub fn taxonomy_poll_period(&self) -> Duration {
        Duration::from_millis(
            self.config_file
                .taxonomy_poll_ms
                .unwrap_or(DEFAULT_TAXONOMY_POLL_MS),
        )
    }

    /// The period of the transaction ledger poll stream.
    pub fn ledger_poll_period(&self) -> Duration {
        Duration::from_millis(
            self.config_file
                .ledger_poll_ms
                .unwrap_or(DEFAULT_LEDGER_POLL_MS),
        )
    }

    pub fn ledger_query_limit(&self) -> usize {
        self.config_file
            .ledger_query_limit
            .unwrap_or(DEFAULT_LEDGER_QUERY_LIMIT)
    }

    #[cfg(test)]
    pub(crate) fn with_poll_periods(user_id: &str, taxonomy_ms: u64, ledger_ms: u64) -> Self {
        let mut config = Self::new(user_id);
        config.config_file.taxonomy_poll_ms = Some(taxonomy_ms);
        config.config_file.ledger_poll_ms = Some(ledger_ms);
        config
    }
}

/// Represents the serialization and deserialization format of the
/// configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budget-sync",
///   "config_version": 1,
///   "user_id": "u_4f2c9a",
///   "taxonomy_poll_ms": 500,
///   "ledger_poll_ms": 1000
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budget-sync"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The id of the user whose documents this client reads and writes.
    user_id: String,

    /// Taxonomy poll period override in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    taxonomy_poll_ms: Option<u64>,

    /// Ledger poll period override in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    ledger_poll_ms: Option<u64>,

    /// Maximum documents fetched per ledger poll tick.
    #[serde(skip_serializing_if = "Option::is_none")]
    ledger_query_limit: Option<usize>,
}

impl ConfigFile {
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        if config.app_name != APP_NAME {
            return Err(anyhow::anyhow!(
                "Invalid app_name in config file: expected '{}', got '{}'",
                APP_NAME,
                config.app_name
            )
            .into());
        }

        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        tokio::fs::write(path.as_ref(), data)
            .await
            .context("Unable to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_for_user() {
        let paths = Paths::for_user("u1");
        assert_eq!(paths.taxonomy, "users/u1/categories");
        assert_eq!(paths.transactions, "users/u1/transactions");
        assert_eq!(paths.goals, "users/u1/goals");
    }

    #[test]
    fn test_default_poll_periods() {
        let config = Config::new("u1");
        assert_eq!(config.taxonomy_poll_period(), Duration::from_millis(500));
        assert_eq!(config.ledger_poll_period(), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_config_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let original = Config::with_poll_periods("u42", 250, 2000);
        original.save(&path).await.unwrap();

        let loaded = Config::load(&path).await.unwrap();
        assert_eq!(loaded.user_id(), "u42");
        assert_eq!(loaded.taxonomy_poll_period(), Duration::from_millis(250));
        assert_eq!(loaded.ledger_poll_period(), Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_config_load_minimal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let json = r#"{
            "app_name": "budget-sync",
            "config_version": 1,
            "user_id": "u7"
        }"#;
        tokio::fs::write(&path, json).await.unwrap();

        let config = Config::load(&path).await.unwrap();
        assert_eq!(config.user_id(), "u7");
        assert_eq!(config.taxonomy_poll_period(), Duration::from_millis(500));
        assert_eq!(config.ledger_query_limit(), 500);
    }

    #[tokio::test]
    async fn test_config_load_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1,
            "user_id": "u7"
        }"#;
        tokio::fs::write(&path, json).await.unwrap();

        let result = Config::load(&path).await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid app_name"));
    }
}
