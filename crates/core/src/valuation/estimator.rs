//! Price estimator.

use rust_decimal::Decimal;

use crate::errors::{Error, Result, ValidationError};

use super::valuation_constants::{
    DISTRICT_WEIGHT, NEIGHBORHOOD_WEIGHT, NEUTRAL_FACTOR, NEW_BUILDING_FACTOR,
    OVER_150_SQM_FACTOR, OVER_200_SQM_FACTOR, OVER_20_YEARS_FACTOR, OVER_30_YEARS_FACTOR,
    PRICE_RANGE_FACTOR, UNDER_10_YEARS_FACTOR, UNDER_5_YEARS_FACTOR, UNDER_80_SQM_FACTOR,
    WIDE_PRICE_RANGE_FACTOR, WIDE_RANGE_COMPARABLE_THRESHOLD,
};
use super::valuation_model::{
    AreaStatistics, EstimateBreakdown, PriceEstimate, PriceRange, ValuationQuery,
};

/// Blend of neighborhood and district averages, `None` on overflow.
pub fn base_price_per_sqm(stats: &AreaStatistics) -> Option<Decimal> {
    let neighborhood = stats
        .neighborhood_avg_price_per_sqm
        .checked_mul(NEIGHBORHOOD_WEIGHT)?;
    let district = stats.district_avg_price_per_sqm.checked_mul(DISTRICT_WEIGHT)?;
    neighborhood.checked_add(district)
}

/// First matching band wins; `> 30` is checked before `> 20`.
pub fn age_factor(building_age: i32) -> Decimal {
    if building_age == 0 {
        NEW_BUILDING_FACTOR
    } else if building_age < 5 {
        UNDER_5_YEARS_FACTOR
    } else if building_age < 10 {
        UNDER_10_YEARS_FACTOR
    } else if building_age > 30 {
        OVER_30_YEARS_FACTOR
    } else if building_age > 20 {
        OVER_20_YEARS_FACTOR
    } else {
        NEUTRAL_FACTOR
    }
}

pub fn size_factor(square_meters: Decimal) -> Decimal {
    if square_meters > Decimal::from(200) {
        OVER_200_SQM_FACTOR
    } else if square_meters > Decimal::from(150) {
        OVER_150_SQM_FACTOR
    } else if square_meters < Decimal::from(80) {
        UNDER_80_SQM_FACTOR
    } else {
        NEUTRAL_FACTOR
    }
}

pub fn range_factor(comparable_count: usize) -> Decimal {
    if comparable_count < WIDE_RANGE_COMPARABLE_THRESHOLD {
        WIDE_PRICE_RANGE_FACTOR
    } else {
        PRICE_RANGE_FACTOR
    }
}

fn out_of_range() -> Error {
    Error::Validation(ValidationError::OutOfRange {
        field: "estimatedPrice".to_string(),
        expected: "representable as a decimal amount".to_string(),
    })
}

/// Point estimate and range for `query`.
///
/// Callers must have checked that statistics exist and at least one
/// comparable was found. Fails with a validation error when the arithmetic
/// overflows.
pub fn estimate_price(
    query: &ValuationQuery,
    stats: &AreaStatistics,
    comparable_count: usize,
) -> Result<PriceEstimate> {
    let base = base_price_per_sqm(stats).ok_or_else(out_of_range)?;
    let age = age_factor(query.building_age);
    let size = size_factor(query.square_meters);
    let estimated_price_per_sqm = base
        .checked_mul(age)
        .and_then(|v| v.checked_mul(size))
        .ok_or_else(out_of_range)?;
    let estimated_price = estimated_price_per_sqm
        .checked_mul(query.square_meters)
        .ok_or_else(out_of_range)?;

    let spread = range_factor(comparable_count);
    let price_range = PriceRange {
        low: estimated_price
            .checked_mul(Decimal::ONE - spread)
            .ok_or_else(out_of_range)?,
        high: estimated_price
            .checked_mul(Decimal::ONE + spread)
            .ok_or_else(out_of_range)?,
    };

    Ok(PriceEstimate {
        estimated_price,
        price_range,
        breakdown: EstimateBreakdown {
            base_price_per_sqm: base,
            age_factor: age,
            size_factor: size,
            estimated_price_per_sqm,
            range_factor: spread,
        },
    })
}
