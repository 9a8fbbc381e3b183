//! What-if processor
//!
//! Walks the changes in input order, prices each one and aggregates the
//! results. A change that can't be priced is logged and left out; only a
//! broken parent chain stops the run.

use super::context::RunContext;
use super::output::{EstimatedResource, EstimationOutput, Totals};
use super::report::{Report, ResourceSection};
use crate::azure::id::ResourceId;
use crate::error::{EstimateError, Result};
use crate::pricing::{resolve_location, CapacityTiers, PriceCatalogClient};
use crate::resource::{Lookup, Registry, StrategyPair};
use crate::whatif::{DesiredState, WhatIfChange};

/// Outcome of a whole run
#[derive(Debug, Clone)]
pub struct Estimation {
    pub output: EstimationOutput,
    pub report: Report,
}

enum Outcome {
    Estimated(EstimatedResource),
    Unsupported(ResourceId),
}

/// The change being priced, with its parsed id and the state it is priced at
struct Target<'c> {
    id: &'c ResourceId,
    change: &'c WhatIfChange,
    state: &'c DesiredState,
}

pub struct WhatIfProcessor<'a> {
    client: &'a PriceCatalogClient,
    registry: &'a Registry,
    tiers: &'a CapacityTiers,
    detailed_metrics: bool,
}

impl<'a> WhatIfProcessor<'a> {
    pub fn new(
        client: &'a PriceCatalogClient,
        registry: &'a Registry,
        tiers: &'a CapacityTiers,
    ) -> Self {
        Self {
            client,
            registry,
            tiers,
            detailed_metrics: true,
        }
    }

    /// Toggle the per-resource "Aggregated metrics" listing
    pub fn with_detailed_metrics(mut self, enabled: bool) -> Self {
        self.detailed_metrics = enabled;
        self
    }

    pub async fn process(&self, changes: &[WhatIfChange], ctx: &mut RunContext) -> Result<Estimation> {
        let mut report = Report::new(self.client.currency());
        let mut totals = Totals::default();
        let mut resources = Vec::new();
        let mut unsupported = Vec::new();

        for change in changes {
            match self.estimate_change(change, changes, ctx, &mut report).await {
                Ok(Outcome::Estimated(resource)) => {
                    totals.record(resource.change_type, resource.total_cost);
                    resources.push(resource);
                }
                Ok(Outcome::Unsupported(id)) => {
                    tracing::debug!("{} is not supported", id.resource_type());
                    if !id.name().is_empty() {
                        unsupported.push(id);
                    }
                }
                Err(e) if e.is_fatal() => {
                    tracing::error!("Aborting estimation: {}", e);
                    return Err(e);
                }
                Err(e) if e.is_internal() => {
                    tracing::error!("{} [{}]", e, change.resource_id.as_deref().unwrap_or("-"));
                }
                Err(e) => {
                    tracing::warn!("{} [{}]", e, change.resource_id.as_deref().unwrap_or("-"));
                }
            }
        }

        tracing::info!(
            "Estimated {} resources ({} unsupported), {} catalog calls, {} cache hits",
            resources.len(),
            unsupported.len(),
            ctx.cache.misses(),
            ctx.cache.hits()
        );

        report.summary(totals.total_cost, totals.delta, resources.len(), &unsupported);

        Ok(Estimation {
            output: EstimationOutput {
                total_cost: totals.total_cost,
                delta: totals.delta,
                resources,
                currency: self.client.currency().to_string(),
            },
            report,
        })
    }

    async fn estimate_change(
        &self,
        change: &WhatIfChange,
        changes: &[WhatIfChange],
        ctx: &mut RunContext,
        report: &mut Report,
    ) -> Result<Outcome> {
        let raw_id = change
            .resource_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(EstimateError::MissingResourceId)?;
        let state = change
            .desired_state()
            .ok_or(EstimateError::MissingDesiredState)?;
        let id = ResourceId::parse(raw_id).map_err(|source| EstimateError::InvalidResourceId {
            id: raw_id.to_string(),
            source,
        })?;

        if let Some(location) = state.location.as_deref() {
            ctx.locations.record(&id, location);
        }

        match self.registry.lookup(id.resource_type()) {
            Lookup::Unsupported => Ok(Outcome::Unsupported(id)),
            Lookup::NoCost => {
                report.free_resource(&id, change.change_type);
                Ok(Outcome::Estimated(EstimatedResource::free(&id, change.change_type)))
            }
            Lookup::Priced(pair) => {
                let target = Target {
                    id: &id,
                    change,
                    state,
                };
                let resource = self.price(pair, &target, changes, ctx, report).await?;
                Ok(Outcome::Estimated(resource))
            }
        }
    }

    async fn price(
        &self,
        pair: &StrategyPair,
        target: &Target<'_>,
        changes: &[WhatIfChange],
        ctx: &mut RunContext,
        report: &mut Report,
    ) -> Result<EstimatedResource> {
        let Target { id, change, state } = *target;
        let resource_type = id.resource_type();
        let location = resolve_location(id, state, &ctx.locations)?;

        let url = self
            .client
            .build_query(&pair.query, state, &location)
            .map_err(|source| EstimateError::Query {
                resource_type: resource_type.to_string(),
                source,
            })?;

        let response = self
            .client
            .fetch(&mut ctx.cache, &url)
            .await
            .map_err(|source| EstimateError::Catalog {
                resource_type: resource_type.to_string(),
                source,
            })?;

        if response.is_empty() {
            return Err(EstimateError::NoRecords(resource_type.to_string()));
        }

        let calculation = pair
            .calculation
            .bind(self.tiers, &response.items)
            .map_err(|source| EstimateError::Strategy {
                resource_type: resource_type.to_string(),
                source,
            })?;

        let total_cost = calculation.total_cost(state, changes);
        let delta = match (&change.after, &change.before) {
            (_, None) => None,
            (Some(_), Some(before)) => Some(total_cost - calculation.total_cost(before, changes)),
            (None, Some(_)) => Some(-total_cost),
        };

        report.resource(&ResourceSection {
            id,
            change_type: change.change_type,
            location: response.first_location().unwrap_or(location.as_str()),
            total_cost,
            delta,
            items: self.detailed_metrics.then(|| calculation.ordered_items()),
        });

        Ok(EstimatedResource::new(id, change.change_type, total_cost, delta))
    }
}
