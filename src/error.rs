//! Error types for armcost
//!
//! Library code returns [`EstimateError`]; the binary wraps it in `anyhow`.
//! Almost every variant describes why a single resource was left out of the
//! estimate. [`EstimateError::is_fatal`] picks the ones that abort the batch.

use crate::azure::http::CatalogError;
use crate::azure::id::IdError;
use crate::pricing::calculation::CalculationError;
use crate::pricing::location::LocationError;
use crate::pricing::query::QueryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("Ignoring resource with empty resource ID")]
    MissingResourceId,

    #[error("Ignoring resource with empty desired state")]
    MissingDesiredState,

    #[error("Ignoring resource with invalid ID '{id}': {source}")]
    InvalidResourceId {
        id: String,
        #[source]
        source: IdError,
    },

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("Can't build catalog query for {resource_type}: {source}")]
    Query {
        resource_type: String,
        #[source]
        source: QueryError,
    },

    #[error("Data for {resource_type} is not available: {source}")]
    Catalog {
        resource_type: String,
        #[source]
        source: CatalogError,
    },

    #[error("Got no records for {0} from the price catalog")]
    NoRecords(String),

    #[error("Internal error for {resource_type}: {source}")]
    Strategy {
        resource_type: String,
        #[source]
        source: CalculationError,
    },
}

impl EstimateError {
    /// Errors that leave the batch in an undefined state
    pub fn is_fatal(&self) -> bool {
        matches!(self, EstimateError::Location(LocationError::BrokenChain(_)))
    }

    /// Errors that point at a bug or bad registry data rather than the input
    pub fn is_internal(&self) -> bool {
        match self {
            EstimateError::Strategy { .. } => true,
            EstimateError::Query { source, .. } => matches!(source, QueryError::MissingField(_)),
            EstimateError::Catalog { source, .. } => {
                !source.is_no_data() && !matches!(source, CatalogError::Timeout(_))
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, EstimateError>;
