//! Strategy Registry - Load pricing strategies from JSON
//!
//! This module loads the resource-type table from embedded JSON files and
//! provides lookup functions for the estimation engine.

use crate::pricing::calculation::CalculationStrategy;
use crate::pricing::query::QueryStrategy;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded registry JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("../resources/network.json"),
    include_str!("../resources/compute.json"),
    include_str!("../resources/data.json"),
    include_str!("../resources/storage.json"),
];

/// Query and calculation used for one priced resource type
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StrategyPair {
    pub query: QueryStrategy,
    pub calculation: CalculationStrategy,
}

/// Registry entry from JSON
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "pricing", rename_all = "snake_case")]
pub enum RegistryEntry {
    Priced(StrategyPair),
    Free,
}

/// Result of looking up a resource type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Priced(&'a StrategyPair),
    NoCost,
    Unsupported,
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    resources: HashMap<String, RegistryEntry>,
}

/// Resource type → strategy table
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: HashMap<String, RegistryEntry>,
}

impl Registry {
    /// Build a registry from JSON documents. A type declared twice is an error.
    pub fn from_sources(sources: &[&str]) -> Result<Self> {
        let mut entries = HashMap::new();

        for (idx, content) in sources.iter().enumerate() {
            let partial: RegistryFile = serde_json::from_str(content)
                .with_context(|| format!("Failed to parse registry source #{}", idx))?;

            for (resource_type, entry) in partial.resources {
                if entries.contains_key(&resource_type) {
                    bail!("Resource type {} is registered twice", resource_type);
                }
                entries.insert(resource_type, entry);
            }
        }

        Ok(Self { entries })
    }

    /// Exact-match lookup; anything unknown is unsupported
    pub fn lookup(&self, resource_type: &str) -> Lookup<'_> {
        match self.entries.get(resource_type) {
            Some(RegistryEntry::Priced(pair)) => Lookup::Priced(pair),
            Some(RegistryEntry::Free) => Lookup::NoCost,
            None => Lookup::Unsupported,
        }
    }

    /// All registered resource types, sorted
    pub fn resource_types(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(|s| s.as_str()).collect();
        keys.sort_unstable();
        keys
    }

    /// Every priced strategy pair, keyed by type
    pub fn priced(&self) -> impl Iterator<Item = (&str, &StrategyPair)> {
        self.entries.iter().filter_map(|(k, v)| match v {
            RegistryEntry::Priced(pair) => Some((k.as_str(), pair)),
            RegistryEntry::Free => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Get the builtin registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        Registry::from_sources(RESOURCE_FILES)
            .unwrap_or_else(|e| panic!("Failed to load embedded registry: {:#}", e))
    })
}
