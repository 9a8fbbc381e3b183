//! What-if input model

pub mod model;

pub use model::{parse_changes, ChangeType, DesiredState, Sku, WhatIfChange};
