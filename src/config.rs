//! Configuration Management
//!
//! Handles persistent configuration for armcost. Every field is optional;
//! command-line flags override whatever the file says.

use crate::azure::http::DEFAULT_TIMEOUT;
use crate::pricing::DEFAULT_CATALOG_URL;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Currency code passed to the catalog
    #[serde(default)]
    pub currency: Option<String>,
    /// Skip the per-resource meter listing
    #[serde(default)]
    pub disable_detailed_metrics: Option<bool>,
    /// Price catalog endpoint
    #[serde(default)]
    pub catalog_url: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Replacement for the embedded capacity-tier lists
    #[serde(default)]
    pub capacity_tiers_path: Option<PathBuf>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("armcost").join("config.json"))
    }

    /// Load configuration from the default location. Missing or broken files
    /// fall back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Get effective currency (CLI > config > USD)
    pub fn effective_currency(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.currency.clone())
            .unwrap_or_else(|| "USD".to_string())
    }

    /// A set CLI flag always wins; otherwise the file decides
    pub fn effective_disable_detailed_metrics(&self, cli: bool) -> bool {
        cli || self.disable_detailed_metrics.unwrap_or(false)
    }

    pub fn effective_catalog_url(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.catalog_url.clone())
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string())
    }

    pub fn effective_timeout(&self, cli_secs: Option<u64>) -> Duration {
        cli_secs
            .or(self.request_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn capacity_tiers_path(&self) -> Option<&Path> {
        self.capacity_tiers_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.effective_currency(None), "USD");
        assert!(!config.effective_disable_detailed_metrics(false));
        assert_eq!(config.effective_catalog_url(None), DEFAULT_CATALOG_URL);
        assert_eq!(config.effective_timeout(None), DEFAULT_TIMEOUT);
        assert!(config.capacity_tiers_path().is_none());
    }

    #[test]
    fn test_cli_overrides_file() {
        let config = Config {
            currency: Some("EUR".to_string()),
            request_timeout_secs: Some(5),
            ..Default::default()
        };

        assert_eq!(config.effective_currency(None), "EUR");
        assert_eq!(config.effective_currency(Some("GBP")), "GBP");
        assert_eq!(config.effective_timeout(None), Duration::from_secs(5));
        assert_eq!(config.effective_timeout(Some(1)), Duration::from_secs(1));
    }

    #[test]
    fn test_load_full_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "currency": "JPY",
                "disable_detailed_metrics": true,
                "request_timeout_secs": 10,
                "capacity_tiers_path": "/etc/armcost/tiers.yaml"
            }"#,
        )
        .unwrap();

        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded.effective_currency(None), "JPY");
        assert!(loaded.effective_disable_detailed_metrics(false));
        assert_eq!(loaded.effective_timeout(None), Duration::from_secs(10));
        assert_eq!(
            loaded.capacity_tiers_path(),
            Some(Path::new("/etc/armcost/tiers.yaml"))
        );
    }

    #[test]
    fn test_partial_file_leaves_other_fields_unset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"catalog_url": "http://localhost:8080/prices"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.effective_catalog_url(None), "http://localhost:8080/prices");
        assert_eq!(config.currency, None);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(Config::load_from(&path).is_err());
        assert!(Config::load_from(&dir.path().join("missing.json")).is_err());
    }
}
