//! What-if change records
//!
//! Mirrors the shape of `az deployment group what-if --no-pretty-print`
//! output, keeping only what the estimator reads.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Kind of change proposed for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChangeType {
    Create,
    #[serde(alias = "Modify", alias = "Deploy")]
    Update,
    Delete,
    #[default]
    #[serde(alias = "Ignore", alias = "Unsupported")]
    NoChange,
}

impl ChangeType {
    /// Marker printed in front of the resource name
    pub fn marker(&self) -> char {
        match self {
            ChangeType::Create => '+',
            ChangeType::Update => '~',
            ChangeType::Delete => '-',
            ChangeType::NoChange => '=',
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeType::Create => "Create",
            ChangeType::Update => "Update",
            ChangeType::Delete => "Delete",
            ChangeType::NoChange => "NoChange",
        };
        f.write_str(name)
    }
}

/// Resource SKU
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Sku {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub capacity: Option<i64>,
}

/// Desired state snapshot of a resource (the ARM resource body)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DesiredState {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub sku: Option<Sku>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Value>,
}

/// `"properties": null` reads as no properties
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl DesiredState {
    pub fn sku_name(&self) -> Option<&str> {
        self.sku.as_ref().and_then(|s| s.name.as_deref())
    }

    /// SKU capacity, defaulting to 1 when absent
    pub fn capacity(&self) -> i64 {
        self.sku.as_ref().and_then(|s| s.capacity).unwrap_or(1)
    }

    /// Read a boolean property, accepting both `true` and `"true"`
    pub fn bool_property(&self, key: &str) -> bool {
        match self.properties.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

/// One proposed change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WhatIfChange {
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub change_type: ChangeType,
    #[serde(default)]
    pub before: Option<DesiredState>,
    #[serde(default)]
    pub after: Option<DesiredState>,
}

impl WhatIfChange {
    /// State used to build queries and the headline cost
    pub fn desired_state(&self) -> Option<&DesiredState> {
        self.after.as_ref().or(self.before.as_ref())
    }
}

/// Parse a what-if document: either the full operation result or a bare change list
pub fn parse_changes(content: &str) -> Result<Vec<WhatIfChange>> {
    let document: Value =
        serde_json::from_str(content).context("Failed to parse what-if document")?;

    let changes = match document {
        Value::Array(list) => Value::Array(list),
        Value::Object(mut operation) => operation
            .remove("changes")
            .context("What-if document has no 'changes' list")?,
        _ => bail!("What-if document must be an object or a list of changes"),
    };

    serde_json::from_value(changes).context("Failed to parse what-if changes")
}
