//! Capacity-tier allowlists
//!
//! Meter names are catalog data and drift independently of this crate, so
//! they live in a versioned YAML document instead of code. The embedded copy
//! can be replaced with a file at runtime.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_TIERS: &str = include_str!("../resources/capacity_tiers.yaml");

/// Named lists of meter names billed per unit of capacity
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CapacityTiers {
    pub version: String,
    #[serde(default)]
    pub tiers: HashMap<String, Vec<String>>,
}

impl CapacityTiers {
    /// Parse a tiers document
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse capacity tiers")
    }

    /// The allowlists shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_TIERS)
    }

    /// Load from `path`, or fall back to the builtin document
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Self::builtin();
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read capacity tiers from {}", path.display()))?;
        let tiers = Self::from_yaml(&content)?;
        tracing::info!("Loaded capacity tiers {} from {}", tiers.version, path.display());
        Ok(tiers)
    }

    pub fn meters(&self, name: &str) -> Option<&[String]> {
        self.tiers.get(name).map(|m| m.as_slice())
    }
}
