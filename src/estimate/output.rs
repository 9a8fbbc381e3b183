//! Estimation results and aggregation rules

use crate::azure::id::ResourceId;
use crate::whatif::ChangeType;
use serde::{Deserialize, Serialize};

/// Cost estimate for one processed change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedResource {
    pub resource_id: String,
    pub name: String,
    pub resource_type: String,
    pub change_type: ChangeType,
    pub total_cost: f64,
    pub delta: Option<f64>,
}

impl EstimatedResource {
    pub fn new(id: &ResourceId, change_type: ChangeType, total_cost: f64, delta: Option<f64>) -> Self {
        Self {
            resource_id: id.to_string(),
            name: id.name().to_string(),
            resource_type: id.resource_type().to_string(),
            change_type,
            total_cost,
            delta,
        }
    }

    /// Resource types that never cost anything
    pub fn free(id: &ResourceId, change_type: ChangeType) -> Self {
        Self::new(id, change_type, 0.0, Some(0.0))
    }
}

/// Result of a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationOutput {
    pub total_cost: f64,
    pub delta: f64,
    pub resources: Vec<EstimatedResource>,
    pub currency: String,
}

/// Running total and delta across the batch
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub total_cost: f64,
    pub delta: f64,
}

impl Totals {
    /// Deleted resources leave the total; only creates and deletes move the delta
    pub fn record(&mut self, change_type: ChangeType, cost: f64) {
        if change_type != ChangeType::Delete {
            self.total_cost += cost;
        }

        match change_type {
            ChangeType::Create => self.delta += cost,
            ChangeType::Delete => self.delta -= cost,
            ChangeType::Update | ChangeType::NoChange => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_follow_change_type() {
        let mut totals = Totals::default();
        totals.record(ChangeType::Create, 10.0);
        totals.record(ChangeType::Update, 5.0);
        totals.record(ChangeType::NoChange, 2.0);
        totals.record(ChangeType::Delete, 4.0);

        assert_eq!(totals.total_cost, 17.0);
        assert_eq!(totals.delta, 6.0);
    }

    #[test]
    fn test_free_resource_is_zero() {
        let id = ResourceId::parse("/subscriptions/s/resourceGroups/rg/providers/Microsoft.Web/sites/app").unwrap();
        let resource = EstimatedResource::free(&id, ChangeType::Create);

        assert_eq!(resource.total_cost, 0.0);
        assert_eq!(resource.delta, Some(0.0));
        assert_eq!(resource.name, "app");
        assert_eq!(resource.resource_type, "Microsoft.Web/sites");
    }

    #[test]
    fn test_output_serializes_camel_case() {
        let output = EstimationOutput {
            total_cost: 3.65,
            delta: 3.65,
            resources: vec![],
            currency: "USD".to_string(),
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["totalCost"], 3.65);
        assert_eq!(value["currency"], "USD");
    }
}
