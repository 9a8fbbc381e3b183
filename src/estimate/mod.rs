//! Estimation engine
//!
//! # Module Structure
//!
//! - [`processor`] - Per-change dispatch, delta rules and aggregation
//! - [`context`] - Run-scoped cache and location map
//! - [`output`] - Serializable results and the totals accumulator
//! - [`report`] - Text report rendering

pub mod context;
pub mod output;
pub mod processor;
pub mod report;

pub use context::RunContext;
pub use output::{EstimatedResource, EstimationOutput, Totals};
pub use processor::{Estimation, WhatIfProcessor};
pub use report::{format_amount, signed_amount, Report};
