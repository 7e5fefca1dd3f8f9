//! Comparable selection.
//!
//! Scores every candidate listing against the query profile and keeps the most
//! similar ones. A score is the sum of independent terms:
//!
//! | Term | Points |
//! |------|--------|
//! | area difference | 40 / 30 / 20 / 10 / 0 |
//! | building age difference | 30 / 20 / 10 / 0 |
//! | same neighborhood | 20 |
//! | same property type | 10 |

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::properties::{price_per_sqm, ObservationWindow, PropertyRecord};

use super::valuation_constants::{
    AGE_PROXIMITY_BANDS, AREA_PROXIMITY_BANDS, MAX_COMPARABLES, MIN_SIMILARITY_SCORE,
    SAME_NEIGHBORHOOD_BONUS, SAME_PROPERTY_TYPE_BONUS,
};
use super::valuation_model::{ScoredComparable, ValuationQuery};

pub fn area_proximity_points(query_area: Decimal, candidate_area: Decimal) -> u8 {
    let difference = (candidate_area - query_area).abs();
    AREA_PROXIMITY_BANDS
        .iter()
        .find(|(max_difference, _)| difference <= *max_difference)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

/// A candidate without a recorded building age earns no age points.
pub fn age_proximity_points(query_age: i32, candidate_age: Option<i32>) -> u8 {
    let Some(candidate_age) = candidate_age else {
        return 0;
    };
    let difference = candidate_age.abs_diff(query_age);
    AGE_PROXIMITY_BANDS
        .iter()
        .find(|(max_difference, _)| difference <= *max_difference)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

pub fn similarity_score(query: &ValuationQuery, candidate: &PropertyRecord) -> u8 {
    let mut score = area_proximity_points(query.square_meters, candidate.square_meters)
        + age_proximity_points(query.building_age, candidate.building_age);
    if candidate.neighborhood == query.neighborhood {
        score += SAME_NEIGHBORHOOD_BONUS;
    }
    if candidate.property_type == query.property_type {
        score += SAME_PROPERTY_TYPE_BONUS;
    }
    score
}

/// Whether a listing belongs to the candidate pool of `query`.
fn is_candidate(query: &ValuationQuery, record: &PropertyRecord, window: &ObservationWindow) -> bool {
    record.city == query.city
        && record.district == query.district
        && window.contains(record.observed_at())
        && record.price > Decimal::ZERO
        && record.square_meters > Decimal::ZERO
}

/// Higher score first, then most recently observed, then id so the order is total.
fn rank(a: &ScoredComparable, b: &ScoredComparable) -> Ordering {
    b.similarity_score
        .cmp(&a.similarity_score)
        .then_with(|| b.property.observed_at().cmp(&a.property.observed_at()))
        .then_with(|| a.property.id.cmp(&b.property.id))
}

/// Scores `candidates` against `query` and returns at most
/// [`MAX_COMPARABLES`] listings scoring at least [`MIN_SIMILARITY_SCORE`].
///
/// Listings outside the candidate pool (other city or district, observed
/// outside `window`, non-positive price or area) are ignored even if the
/// store returned them. An empty result is not an error here.
pub fn find_comparables(
    query: &ValuationQuery,
    candidates: Vec<PropertyRecord>,
    window: &ObservationWindow,
) -> Vec<ScoredComparable> {
    let mut scored: Vec<ScoredComparable> = candidates
        .into_iter()
        .filter(|record| is_candidate(query, record, window))
        .filter_map(|record| {
            let score = similarity_score(query, &record);
            if score < MIN_SIMILARITY_SCORE {
                return None;
            }
            let ppsqm = price_per_sqm(record.price, record.square_meters)?;
            Some(ScoredComparable {
                property: record,
                similarity_score: score,
                price_per_sqm: ppsqm,
            })
        })
        .collect();

    scored.sort_by(rank);
    scored.truncate(MAX_COMPARABLES);
    scored
}
