//! Price Catalog Client
//!
//! Builds catalog query URLs and fetches responses through a run-scoped
//! cache keyed by the exact URL.

use super::item::CatalogResponse;
use super::query::{QueryError, QueryStrategy};
use crate::azure::http::{CatalogError, CatalogHttpClient};
use crate::whatif::DesiredState;
use anyhow::{Context, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use url::Url;

/// Public retail prices endpoint
pub const DEFAULT_CATALOG_URL: &str = "https://prices.azure.com/api/retail/prices";

/// Catalog responses for one run. No eviction; drop it with the run.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: HashMap<String, CatalogResponse>,
    hits: usize,
    misses: usize,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

/// Client for the retail price catalog
#[derive(Clone)]
pub struct PriceCatalogClient {
    http: CatalogHttpClient,
    base_url: Url,
    currency: String,
}

impl PriceCatalogClient {
    pub fn new(http: CatalogHttpClient, base_url: &str, currency: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid catalog URL: {}", base_url))?;

        Ok(Self {
            http,
            base_url,
            currency: currency.to_string(),
        })
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Full query URL for a strategy-specific clause
    pub fn query_url(&self, clause: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("currencyCode", &format!("'{}'", self.currency))
            .append_pair(
                "$filter",
                &format!("priceType eq 'Consumption' and {}", clause),
            );
        url
    }

    /// Build the query URL for a resource from its strategy
    pub fn build_query(
        &self,
        strategy: &QueryStrategy,
        state: &DesiredState,
        location: &str,
    ) -> Result<Url, QueryError> {
        let clause = strategy.build_filter(state, location)?;
        Ok(self.query_url(&clause))
    }

    /// Return the cached response for `url`, fetching it on a miss
    pub async fn fetch<'c>(
        &self,
        cache: &'c mut ResponseCache,
        url: &Url,
    ) -> Result<&'c CatalogResponse, CatalogError> {
        match cache.entries.entry(url.as_str().to_string()) {
            Entry::Occupied(entry) => {
                tracing::debug!("Getting catalog data for {} from cache", url);
                cache.hits += 1;
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                cache.misses += 1;
                let response = self.http.get(url).await?;
                tracing::debug!("Cached {} catalog items for {}", response.items.len(), url);
                Ok(entry.insert(response))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::http::DEFAULT_TIMEOUT;

    fn client(currency: &str) -> PriceCatalogClient {
        let http = CatalogHttpClient::new(DEFAULT_TIMEOUT).unwrap();
        PriceCatalogClient::new(http, DEFAULT_CATALOG_URL, currency).unwrap()
    }

    #[test]
    fn test_query_url_carries_currency_and_prefix() {
        let url = client("EUR").query_url("serviceId eq 'X'");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(url.path(), "/api/retail/prices");
        assert_eq!(
            pairs,
            vec![
                ("currencyCode".to_string(), "'EUR'".to_string()),
                (
                    "$filter".to_string(),
                    "priceType eq 'Consumption' and serviceId eq 'X'".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_identical_clauses_share_a_key() {
        let client = client("USD");
        assert_eq!(
            client.query_url("serviceId eq 'X'").as_str(),
            client.query_url("serviceId eq 'X'").as_str()
        );
        assert_ne!(
            client.query_url("serviceId eq 'X'").as_str(),
            client.query_url("serviceId eq 'Y'").as_str()
        );
    }

    #[test]
    fn test_build_query_surfaces_strategy_errors() {
        let strategy = QueryStrategy::ServiceSku {
            service_id: "X".to_string(),
            sku_field: "skuName".to_string(),
        };
        let result = client("USD").build_query(&strategy, &DesiredState::default(), "eastus");
        assert_eq!(result, Err(QueryError::MissingField("sku.name")));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let http = CatalogHttpClient::new(DEFAULT_TIMEOUT).unwrap();
        assert!(PriceCatalogClient::new(http, "not a url", "USD").is_err());
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache = ResponseCache::new();
        assert!(cache.is_empty());
        assert_eq!((cache.hits(), cache.misses()), (0, 0));
    }
}
