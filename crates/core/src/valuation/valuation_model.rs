//! Valuation domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::properties::PropertyRecord;

use super::valuation_constants::MAX_QUERY_SQUARE_METERS;

/// Profile of the unit being valued.
///
/// `room_count`, `floor` and `total_floors` are accepted and carried along but
/// do not take part in scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValuationQuery {
    pub city: String,
    pub district: String,
    pub neighborhood: String,
    pub square_meters: Decimal,
    pub building_age: i32,
    pub property_type: String,
    pub room_count: Option<String>,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
}

impl ValuationQuery {
    /// Validates the query before any data store access.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("city", &self.city),
            ("district", &self.district),
            ("neighborhood", &self.neighborhood),
            ("propertyType", &self.property_type),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation(ValidationError::MissingField(
                    field.to_string(),
                )));
            }
        }
        if self.square_meters <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::OutOfRange {
                field: "squareMeters".to_string(),
                expected: "greater than zero".to_string(),
            }));
        }
        if self.square_meters > MAX_QUERY_SQUARE_METERS {
            return Err(Error::Validation(ValidationError::OutOfRange {
                field: "squareMeters".to_string(),
                expected: format!("at most {}", MAX_QUERY_SQUARE_METERS),
            }));
        }
        if self.building_age < 0 {
            return Err(Error::Validation(ValidationError::OutOfRange {
                field: "buildingAge".to_string(),
                expected: "zero or greater".to_string(),
            }));
        }
        Ok(())
    }
}

/// A listing selected as a comparable, with its similarity to the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredComparable {
    #[serde(flatten)]
    pub property: PropertyRecord,
    /// 0-100
    pub similarity_score: u8,
    pub price_per_sqm: Decimal,
}

/// Neighborhood and district price statistics over the statistics window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AreaStatistics {
    pub city: String,
    pub district: String,
    pub neighborhood: String,
    pub neighborhood_avg_price_per_sqm: Decimal,
    pub neighborhood_median_price_per_sqm: Decimal,
    pub neighborhood_listings: usize,
    pub district_avg_price_per_sqm: Decimal,
    pub district_median_price_per_sqm: Decimal,
    pub district_listings: usize,
    /// Change of the last month's average against the average from six to
    /// five months ago, in percent.
    pub price_trend_pct: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceRange {
    pub low: Decimal,
    pub high: Decimal,
}

/// Intermediate values of the price estimate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EstimateBreakdown {
    pub base_price_per_sqm: Decimal,
    pub age_factor: Decimal,
    pub size_factor: Decimal,
    pub estimated_price_per_sqm: Decimal,
    pub range_factor: Decimal,
}

/// Point estimate and range produced by the price estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceEstimate {
    pub estimated_price: Decimal,
    pub price_range: PriceRange,
    pub breakdown: EstimateBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub estimated_price: Decimal,
    pub price_range: PriceRange,
    /// 0-100
    pub confidence_score: u8,
    pub comparables: Vec<ScoredComparable>,
    pub area_stats: AreaStatistics,
    pub breakdown: EstimateBreakdown,
    /// Instant the statistics windows were anchored to
    pub as_of: NaiveDateTime,
}

/// Per-neighborhood market summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AreaSummary {
    pub city: String,
    pub district: String,
    pub neighborhood: String,
    pub avg_price_per_sqm: Decimal,
    pub avg_property_age: Option<Decimal>,
    pub total_listings: usize,
    pub price_trend_pct: Decimal,
}
