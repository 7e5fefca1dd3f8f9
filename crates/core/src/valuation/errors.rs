//! Valuation-specific error types.

use thiserror::Error;

/// Reasons a well-formed valuation query cannot be answered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValuationError {
    /// No listings for the neighborhood inside the statistics window.
    #[error("Not enough data for {city}/{district}/{neighborhood}")]
    InsufficientAreaData {
        city: String,
        district: String,
        neighborhood: String,
    },

    /// Area statistics exist but no listing is similar enough to the query.
    #[error("No comparable listings found in {city}/{district} for the requested property")]
    NoComparablesFound { city: String, district: String },
}
