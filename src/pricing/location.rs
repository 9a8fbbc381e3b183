//! Location Resolver
//!
//! A resource without its own `location` inherits the region recorded for
//! its nearest ancestor earlier in the batch.

use crate::azure::id::ResourceId;
use crate::whatif::DesiredState;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// Walked up to the resource group / subscription without a recorded location
    #[error("no location recorded for {0} or any of its ancestors")]
    Unresolved(String),

    /// Parent chain ended before reaching a resource group or subscription
    #[error("couldn't find a resource group or subscription above {0}")]
    BrokenChain(String),
}

/// Locations recorded during the run, keyed by resource id (case-insensitive)
#[derive(Debug, Default, Clone)]
pub struct LocationMap {
    by_id: HashMap<String, String>,
}

impl LocationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember where `id` lives. The first recorded location wins.
    pub fn record(&mut self, id: &ResourceId, location: &str) {
        self.by_id
            .entry(key(id))
            .or_insert_with(|| location.to_string());
    }

    pub fn get(&self, id: &ResourceId) -> Option<&str> {
        self.by_id.get(&key(id)).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

fn key(id: &ResourceId) -> String {
    id.as_str().to_ascii_lowercase()
}

/// Region for `id`: its own desired-state location, else the nearest ancestor's
pub fn resolve_location(
    id: &ResourceId,
    state: &DesiredState,
    locations: &LocationMap,
) -> Result<String, LocationError> {
    if let Some(location) = state.location.as_deref() {
        return Ok(location.to_string());
    }

    let mut current = id.parent();
    while let Some(ancestor) = current {
        if let Some(location) = locations.get(ancestor) {
            tracing::debug!("{} inherits location {} from {}", id, location, ancestor);
            return Ok(location.to_string());
        }
        if ancestor.is_scope_root() {
            return Err(LocationError::Unresolved(id.to_string()));
        }
        current = ancestor.parent();
    }

    Err(LocationError::BrokenChain(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVER: &str =
        "/subscriptions/0000/resourceGroups/rg/providers/Microsoft.Sql/servers/sql-1";

    fn located(location: &str) -> DesiredState {
        DesiredState {
            location: Some(location.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_own_location_wins() {
        let id = ResourceId::parse(SERVER).unwrap();
        let mut map = LocationMap::new();
        map.record(&id, "westus");

        assert_eq!(
            resolve_location(&id, &located("eastus"), &map),
            Ok("eastus".to_string())
        );
    }

    #[test]
    fn test_child_inherits_parent_location() {
        let server = ResourceId::parse(SERVER).unwrap();
        let db = ResourceId::parse(&format!("{}/databases/db-1", SERVER)).unwrap();
        let mut map = LocationMap::new();
        map.record(&server, "eastus");

        assert_eq!(
            resolve_location(&db, &DesiredState::default(), &map),
            Ok("eastus".to_string())
        );
    }

    #[test]
    fn test_grandchild_walks_past_unrecorded_parent() {
        let server = ResourceId::parse(SERVER).unwrap();
        let nested = ResourceId::parse(&format!(
            "{}/databases/db-1/backupShortTermRetentionPolicies/default",
            SERVER
        ))
        .unwrap();
        let mut map = LocationMap::new();
        map.record(&server, "northeurope");

        assert_eq!(
            resolve_location(&nested, &DesiredState::default(), &map),
            Ok("northeurope".to_string())
        );
    }

    #[test]
    fn test_resource_group_location_is_used() {
        let rg = ResourceId::parse("/subscriptions/0000/resourceGroups/rg").unwrap();
        let id = ResourceId::parse(SERVER).unwrap();
        let mut map = LocationMap::new();
        map.record(&rg, "uksouth");

        assert_eq!(
            resolve_location(&id, &DesiredState::default(), &map),
            Ok("uksouth".to_string())
        );
    }

    #[test]
    fn test_lookup_ignores_case() {
        let server = ResourceId::parse(SERVER).unwrap();
        let db = ResourceId::parse(&format!("{}/databases/db-1", SERVER.to_uppercase())).unwrap();
        let mut map = LocationMap::new();
        map.record(&server, "eastus");

        assert_eq!(map.get(db.parent().unwrap()), Some("eastus"));
    }

    #[test]
    fn test_unrecorded_ancestors_are_unresolved() {
        let db = ResourceId::parse(&format!("{}/databases/db-1", SERVER)).unwrap();
        assert!(matches!(
            resolve_location(&db, &DesiredState::default(), &LocationMap::new()),
            Err(LocationError::Unresolved(_))
        ));
    }

    #[test]
    fn test_chain_without_root_is_broken() {
        let orphan = ResourceId::new(
            "/providers/Microsoft.Sql/servers/s/databases/d",
            "d",
            "Microsoft.Sql/servers/databases",
            Some(ResourceId::new(
                "/providers/Microsoft.Sql/servers/s",
                "s",
                "Microsoft.Sql/servers",
                None,
            )),
        );

        assert!(matches!(
            resolve_location(&orphan, &DesiredState::default(), &LocationMap::new()),
            Err(LocationError::BrokenChain(_))
        ));
    }
}
