use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::errors::Result;

use super::valuation_model::{AreaSummary, ValuationQuery, ValuationResult};

/// Trait for valuation service operations
#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// Values `query` against the listings observed in the last six months.
    async fn estimate(&self, query: ValuationQuery) -> Result<ValuationResult>;

    /// Same as [`estimate`](Self::estimate) with the time windows anchored at
    /// `as_of` instead of the current time.
    async fn estimate_as_of(
        &self,
        query: ValuationQuery,
        as_of: NaiveDateTime,
    ) -> Result<ValuationResult>;

    /// Market summary of every neighborhood in `city`, optionally limited to
    /// one district.
    async fn list_area_summaries(
        &self,
        city: &str,
        district: Option<&str>,
    ) -> Result<Vec<AreaSummary>>;
}
