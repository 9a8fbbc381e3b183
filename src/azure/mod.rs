//! Azure interaction module
//!
//! Everything that knows about Azure's wire formats lives here.
//!
//! # Module Structure
//!
//! - [`id`] - ARM resource id parsing into an immutable parent chain
//! - [`http`] - HTTP client for the retail price catalog
//!
//! # Example
//!
//! ```ignore
//! use armcost::azure::id::ResourceId;
//!
//! let id = ResourceId::parse("/subscriptions/s/resourceGroups/rg")?;
//! assert!(id.is_scope_root());
//! ```

pub mod http;
pub mod id;
