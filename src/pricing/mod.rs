//! Retail price catalog
//!
//! # Module Structure
//!
//! - [`item`] - Catalog records as returned by the API
//! - [`query`] - Query strategies building the `$filter` clause
//! - [`calculation`] - Calculation strategies turning items into a monthly cost
//! - [`tiers`] - Versioned capacity-tier meter allowlists
//! - [`client`] - Query URL construction and the run-scoped response cache
//! - [`location`] - Region resolution through the resource's ancestors

pub mod calculation;
pub mod client;
pub mod item;
pub mod location;
pub mod query;
pub mod tiers;

pub use calculation::{Calculation, CalculationStrategy, HOURS_IN_MONTH};
pub use client::{PriceCatalogClient, ResponseCache, DEFAULT_CATALOG_URL};
pub use item::{CatalogItem, CatalogResponse};
pub use location::{resolve_location, LocationError, LocationMap};
pub use query::{QueryError, QueryStrategy};
pub use tiers::CapacityTiers;
