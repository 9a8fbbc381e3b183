//! armcost - monthly cost estimates for ARM what-if results
//!
//! Reads the changes a deployment would make, prices each affected resource
//! against the public retail price catalog and reports totals and deltas.

pub mod azure;
pub mod config;
pub mod error;
pub mod estimate;
pub mod pricing;
pub mod resource;
pub mod whatif;

pub use error::{EstimateError, Result};
pub use estimate::{Estimation, EstimationOutput, RunContext, WhatIfProcessor};
