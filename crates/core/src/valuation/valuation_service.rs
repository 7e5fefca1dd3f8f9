use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::{debug, info};

use crate::errors::Result;
use crate::properties::{ObservationWindow, PropertyRepositoryTrait};
use crate::utils::time_utils;

use super::area_statistics::{get_area_statistics, summarize_areas};
use super::comparables::find_comparables;
use super::confidence::confidence_score;
use super::errors::ValuationError;
use super::estimator::estimate_price;
use super::valuation_constants::STATISTICS_WINDOW_MONTHS;
use super::valuation_model::{AreaSummary, ValuationQuery, ValuationResult};
use super::valuation_traits::ValuationServiceTrait;

/// Valuation engine.
///
/// Each request reads comparable candidates and area samples concurrently and
/// joins them before estimating. The two reads are separate queries, so a
/// write landing between them can make the comparables and the statistics
/// reflect slightly different snapshots of the store.
pub struct ValuationService {
    property_repository: Arc<dyn PropertyRepositoryTrait>,
}

impl ValuationService {
    pub fn new(property_repository: Arc<dyn PropertyRepositoryTrait>) -> Self {
        ValuationService {
            property_repository,
        }
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn estimate(&self, query: ValuationQuery) -> Result<ValuationResult> {
        self.estimate_as_of(query, time_utils::now_utc()).await
    }

    async fn estimate_as_of(
        &self,
        query: ValuationQuery,
        as_of: NaiveDateTime,
    ) -> Result<ValuationResult> {
        query.validate()?;

        let window = ObservationWindow::last_months(as_of, STATISTICS_WINDOW_MONTHS);
        debug!(
            "Valuing {}m2 {} in {}/{}/{} as of {}",
            query.square_meters,
            query.property_type,
            query.city,
            query.district,
            query.neighborhood,
            as_of
        );

        let (candidates, samples) = futures::try_join!(
            self.property_repository
                .find_comparable_candidates(&query.city, &query.district, window),
            self.property_repository
                .list_area_samples(&query.city, Some(&query.district), window),
        )?;

        let area_stats = get_area_statistics(
            &query.city,
            &query.district,
            &query.neighborhood,
            &samples,
            &window,
        )
        .ok_or_else(|| ValuationError::InsufficientAreaData {
            city: query.city.clone(),
            district: query.district.clone(),
            neighborhood: query.neighborhood.clone(),
        })?;

        let candidate_count = candidates.len();
        let comparables = find_comparables(&query, candidates, &window);
        if comparables.is_empty() {
            return Err(ValuationError::NoComparablesFound {
                city: query.city.clone(),
                district: query.district.clone(),
            }
            .into());
        }

        let estimate = estimate_price(&query, &area_stats, comparables.len())?;
        let confidence = confidence_score(
            &comparables,
            area_stats.neighborhood_listings,
            estimate.breakdown.base_price_per_sqm,
        );

        info!(
            "Valued {}/{}/{} at {} ({} of {} candidates comparable, confidence {})",
            query.city,
            query.district,
            query.neighborhood,
            estimate.estimated_price,
            comparables.len(),
            candidate_count,
            confidence
        );

        Ok(ValuationResult {
            estimated_price: estimate.estimated_price,
            price_range: estimate.price_range,
            confidence_score: confidence,
            comparables,
            area_stats,
            breakdown: estimate.breakdown,
            as_of,
        })
    }

    async fn list_area_summaries(
        &self,
        city: &str,
        district: Option<&str>,
    ) -> Result<Vec<AreaSummary>> {
        let window = ObservationWindow::last_months(time_utils::now_utc(), STATISTICS_WINDOW_MONTHS);
        let samples = self
            .property_repository
            .list_area_samples(city, district, window)
            .await?;
        Ok(summarize_areas(&samples, &window))
    }
}
