//! Query strategies
//!
//! Each priced resource type carries one of these variants in the registry.
//! A strategy only produces the type-specific part of the `$filter` clause;
//! [`super::client::PriceCatalogClient`] owns the shared prefix and currency.

use crate::whatif::DesiredState;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Why a filter could not be built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Desired state lacks a field the strategy needs
    #[error("desired state is missing {0}")]
    MissingField(&'static str),

    /// The field is there but the strategy has no mapping for it
    #[error("SKU is not yet supported - {0}")]
    UnknownSku(String),
}

/// Mapping of one SKU onto catalog ids
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkuMapping {
    pub service_id: String,
    pub sku_ids: Vec<String>,
}

/// Closed set of query strategies
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryStrategy {
    /// Service and region plus literal clauses
    Fixed {
        service_id: String,
        #[serde(default)]
        clauses: Vec<String>,
    },
    /// Service and region plus the SKU name matched against `sku_field`
    ServiceSku {
        service_id: String,
        #[serde(default = "default_sku_field")]
        sku_field: String,
    },
    /// SKU name looked up in a table of catalog sku ids, split by OS family
    SkuMap {
        skus: HashMap<String, SkuMapping>,
        #[serde(default)]
        linux_sku_ids: Vec<String>,
        os_flag: String,
    },
}

fn default_sku_field() -> String {
    "skuName".to_string()
}

impl QueryStrategy {
    /// Build the type-specific filter clause for `location`
    pub fn build_filter(&self, state: &DesiredState, location: &str) -> Result<String, QueryError> {
        let region = format!("armRegionName eq '{}'", escape(location));

        match self {
            QueryStrategy::Fixed { service_id, clauses } => {
                let mut parts = vec![service_clause(service_id), region];
                parts.extend(clauses.iter().cloned());
                Ok(parts.join(" and "))
            }
            QueryStrategy::ServiceSku { service_id, sku_field } => {
                let sku = state.sku_name().ok_or(QueryError::MissingField("sku.name"))?;
                Ok(format!(
                    "{} and {} and {} eq '{}'",
                    service_clause(service_id),
                    region,
                    sku_field,
                    escape(sku)
                ))
            }
            QueryStrategy::SkuMap {
                skus,
                linux_sku_ids,
                os_flag,
            } => {
                let sku = state.sku_name().ok_or(QueryError::MissingField("sku.name"))?;
                let mapping = skus
                    .get(sku)
                    .ok_or_else(|| QueryError::UnknownSku(sku.to_string()))?;

                let linux = state.bool_property(os_flag);
                let ids: Vec<String> = mapping
                    .sku_ids
                    .iter()
                    .filter(|id| linux_sku_ids.contains(id) == linux)
                    .map(|id| format!("skuId eq '{}'", escape(id)))
                    .collect();

                if ids.is_empty() {
                    return Err(QueryError::UnknownSku(sku.to_string()));
                }

                Ok(format!(
                    "{} and {} and ({})",
                    service_clause(&mapping.service_id),
                    region,
                    ids.join(" or ")
                ))
            }
        }
    }
}

fn service_clause(service_id: &str) -> String {
    format!("serviceId eq '{}'", escape(service_id))
}

/// OData string literals double embedded quotes
fn escape(value: &str) -> String {
    value.replace('\'', "''")
}
