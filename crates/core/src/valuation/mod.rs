//! Valuation module - comparable selection, area statistics, price estimation
//! and confidence scoring.

mod area_statistics;
mod comparables;
mod confidence;
mod errors;
mod estimator;
pub mod valuation_constants;
mod valuation_model;
mod valuation_service;
mod valuation_traits;

pub use area_statistics::{average, get_area_statistics, median, price_trend_pct, summarize_areas};
pub use comparables::{age_proximity_points, area_proximity_points, find_comparables, similarity_score};
pub use confidence::{
    area_depth_points, confidence_score, price_consistency_points, sample_size_points,
};
pub use errors::ValuationError;
pub use estimator::{age_factor, base_price_per_sqm, estimate_price, range_factor, size_factor};
pub use valuation_model::*;
pub use valuation_service::ValuationService;
pub use valuation_traits::ValuationServiceTrait;

#[cfg(test)]
mod valuation_service_tests;
