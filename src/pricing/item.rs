//! Retail price catalog records

use serde::{Deserialize, Serialize};

/// One meter-level price from the retail catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(default)]
    pub sku_name: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub meter_name: String,
    #[serde(default)]
    pub retail_price: f64,
    #[serde(default)]
    pub unit_of_measure: String,
    #[serde(rename = "type", default)]
    pub price_type: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arm_region_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku_id: Option<String>,
}

/// Decoded catalog response for a single query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CatalogResponse {
    #[serde(rename = "Items", default)]
    pub items: Vec<CatalogItem>,
    #[serde(rename = "NextPageLink", default, skip_serializing_if = "Option::is_none")]
    pub next_page_link: Option<String>,
}

impl CatalogResponse {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Location of the first returned meter, used for display
    pub fn first_location(&self) -> Option<&str> {
        self.items
            .first()
            .map(|item| item.location.as_str())
            .filter(|loc| !loc.is_empty())
    }
}
