//! Resource abstraction layer
//!
//! This module provides a data-driven table of how each ARM resource type is
//! priced. Definitions are loaded from JSON files at compile time, allowing
//! new resource types to be added without code changes.
//!
//! # Resource Definitions
//!
//! Resources are defined in JSON files under `src/resources/`:
//! - `network.json` - IP addresses, prefixes and free networking types
//! - `compute.json` - Virtual machines and App Service plans
//! - `data.json` - SQL, Analysis Services, SignalR, Confidential Ledger
//! - `storage.json` - Free storage and recovery services sub-resources
//!
//! Each entry is either `{"pricing": "free"}` or a `priced` entry naming a
//! query and a calculation strategy.
//!
//! # Example
//!
//! ```ignore
//! use armcost::resource::{get_registry, Lookup};
//!
//! match get_registry().lookup("Microsoft.Sql/servers/databases") {
//!     Lookup::Priced(pair) => println!("{:?}", pair.query),
//!     Lookup::NoCost => println!("free"),
//!     Lookup::Unsupported => println!("unknown"),
//! }
//! ```

mod registry;

pub use registry::*;
