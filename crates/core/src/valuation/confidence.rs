//! Confidence scoring.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::valuation_constants::{
    AREA_DEPTH_CAP, AREA_DEPTH_POINTS, MAX_CONFIDENCE, MIN_CONFIDENCE, PRICE_CONSISTENCY_POINTS,
    SAMPLE_SIZE_CAP, SAMPLE_SIZE_POINTS,
};
use super::valuation_model::ScoredComparable;

pub fn sample_size_points(comparable_count: usize) -> Decimal {
    Decimal::from(comparable_count.min(SAMPLE_SIZE_CAP)) * SAMPLE_SIZE_POINTS
}

pub fn area_depth_points(neighborhood_listings: usize) -> Decimal {
    Decimal::from(neighborhood_listings.min(AREA_DEPTH_CAP)) * AREA_DEPTH_POINTS
}

/// Penalizes dispersion of comparable prices relative to the base price.
///
/// Not bounded below: a spread wider than the base makes it negative.
/// Zero when there are no comparables or the base is not positive.
pub fn price_consistency_points(comparables: &[ScoredComparable], base_price_per_sqm: Decimal) -> Decimal {
    if base_price_per_sqm <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let mut prices = comparables.iter().map(|c| c.price_per_sqm);
    let Some(first) = prices.next() else {
        return Decimal::ZERO;
    };
    let (min, max) = prices.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
    // A spread too wide to represent is as inconsistent as it gets
    (max - min)
        .checked_div(base_price_per_sqm)
        .and_then(|ratio| (Decimal::ONE - ratio).checked_mul(PRICE_CONSISTENCY_POINTS))
        .unwrap_or(Decimal::MIN)
}

/// Sum of the three terms, truncated toward zero and clamped to 0-100.
pub fn confidence_score(
    comparables: &[ScoredComparable],
    neighborhood_listings: usize,
    base_price_per_sqm: Decimal,
) -> u8 {
    let raw = sample_size_points(comparables.len())
        + area_depth_points(neighborhood_listings)
        + price_consistency_points(comparables, base_price_per_sqm);
    let truncated = raw.trunc().to_i64().unwrap_or(MIN_CONFIDENCE);
    // Clamped into 0..=100 so the narrowing cannot fail
    u8::try_from(truncated.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)).unwrap_or(0)
}
