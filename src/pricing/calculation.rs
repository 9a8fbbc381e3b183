//! Calculation strategies
//!
//! Turns catalog items plus a desired state into a monthly cost.

use super::item::CatalogItem;
use super::tiers::CapacityTiers;
use crate::whatif::{DesiredState, WhatIfChange};
use serde::Deserialize;
use thiserror::Error;

/// Billing hours in a month
pub const HOURS_IN_MONTH: f64 = 730.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculationError {
    #[error("capacity tier list '{0}' is not defined")]
    UnknownTiers(String),
}

/// Closed set of calculation strategies
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalculationStrategy {
    /// `retailPrice * 730` for every item
    Hourly,
    /// `retailPrice * 730 * capacity` for allowlisted meters only
    CapacityTier { tiers: String },
}

impl CalculationStrategy {
    /// Pair the strategy with the items of one catalog response
    pub fn bind<'a>(
        &'a self,
        tiers: &'a CapacityTiers,
        items: &'a [CatalogItem],
    ) -> Result<Calculation<'a>, CalculationError> {
        let meters = match self {
            CalculationStrategy::Hourly => None,
            CalculationStrategy::CapacityTier { tiers: name } => Some(
                tiers
                    .meters(name)
                    .ok_or_else(|| CalculationError::UnknownTiers(name.clone()))?,
            ),
        };

        Ok(Calculation { items, meters })
    }

    /// Name of the tier list this strategy depends on, if any
    pub fn tier_list(&self) -> Option<&str> {
        match self {
            CalculationStrategy::Hourly => None,
            CalculationStrategy::CapacityTier { tiers } => Some(tiers),
        }
    }
}

/// A calculation strategy bound to catalog items
#[derive(Debug, Clone, Copy)]
pub struct Calculation<'a> {
    items: &'a [CatalogItem],
    meters: Option<&'a [String]>,
}

impl<'a> Calculation<'a> {
    /// Items by strictly descending retail price; ties keep catalog order
    pub fn ordered_items(&self) -> Vec<&'a CatalogItem> {
        let mut items: Vec<&CatalogItem> = self.items.iter().collect();
        items.sort_by(|a, b| b.retail_price.total_cmp(&a.retail_price));
        items
    }

    /// Monthly cost of `state`. `changes` is the whole batch, available to
    /// strategies priced off sibling resources.
    pub fn total_cost(&self, state: &DesiredState, _changes: &[WhatIfChange]) -> f64 {
        let items = self.ordered_items();

        match self.meters {
            None => items
                .iter()
                .map(|item| item.retail_price * HOURS_IN_MONTH)
                .sum(),
            Some(meters) => {
                let capacity = state.capacity();
                if capacity < 1 {
                    return 0.0;
                }
                items
                    .iter()
                    .filter(|item| meters.iter().any(|m| *m == item.meter_name))
                    .map(|item| item.retail_price * HOURS_IN_MONTH * capacity as f64)
                    .sum()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whatif::Sku;

    fn item(meter: &str, price: f64) -> CatalogItem {
        CatalogItem {
            meter_name: meter.to_string(),
            retail_price: price,
            ..Default::default()
        }
    }

    fn with_capacity(capacity: Option<i64>) -> DesiredState {
        DesiredState {
            sku: Some(Sku {
                name: Some("S1".to_string()),
                capacity,
            }),
            ..Default::default()
        }
    }

    fn tiers() -> CapacityTiers {
        CapacityTiers::builtin().unwrap()
    }

    #[test]
    fn test_hourly_cost_for_public_ip_prefix() {
        let items = vec![item("Standard IPv4 Static Public IP Prefix", 0.005)];
        let tiers = tiers();
        let calc = CalculationStrategy::Hourly.bind(&tiers, &items).unwrap();

        let cost = calc.total_cost(&DesiredState::default(), &[]);
        assert!((cost - 3.65).abs() < 1e-9, "expected 3.65, got {}", cost);
    }

    #[test]
    fn test_capacity_tier_multiplies_matching_meters_only() {
        let items = vec![item("S1 Scale-Out", 1.0), item("S1", 2.5)];
        let tiers = tiers();
        let strategy = CalculationStrategy::CapacityTier {
            tiers: "analysis-services-scale-out".to_string(),
        };
        let calc = strategy.bind(&tiers, &items).unwrap();

        assert_eq!(calc.total_cost(&with_capacity(Some(3)), &[]), 2190.0);
        assert_eq!(calc.total_cost(&with_capacity(None), &[]), 730.0);
        assert_eq!(calc.total_cost(&DesiredState::default(), &[]), 730.0);
    }

    #[test]
    fn test_capacity_below_one_contributes_nothing() {
        let items = vec![item("S1 Scale-Out", 1.0)];
        let tiers = tiers();
        let strategy = CalculationStrategy::CapacityTier {
            tiers: "analysis-services-scale-out".to_string(),
        };
        let calc = strategy.bind(&tiers, &items).unwrap();

        assert_eq!(calc.total_cost(&with_capacity(Some(0)), &[]), 0.0);
        assert_eq!(calc.total_cost(&with_capacity(Some(-2)), &[]), 0.0);
    }

    #[test]
    fn test_unknown_tier_list_fails_to_bind() {
        let tiers = tiers();
        let strategy = CalculationStrategy::CapacityTier {
            tiers: "nope".to_string(),
        };
        assert_eq!(
            strategy.bind(&tiers, &[]).unwrap_err(),
            CalculationError::UnknownTiers("nope".to_string())
        );
    }

    #[test]
    fn test_ordered_items_descending_and_stable() {
        let items = vec![
            item("a", 1.0),
            item("b", 3.0),
            item("c", 1.0),
            item("d", 2.0),
        ];
        let tiers = tiers();
        let calc = CalculationStrategy::Hourly.bind(&tiers, &items).unwrap();

        let names: Vec<&str> = calc
            .ordered_items()
            .iter()
            .map(|i| i.meter_name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "d", "a", "c"]);
    }
}
