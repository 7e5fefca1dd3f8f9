//! Unit tests for the valuation service.

use super::*;
use crate::errors::{DatabaseError, Error, Result, ValidationError};
use crate::properties::{
    AreaSample, ObservationWindow, PriceHistoryEntry, PropertyFilter, PropertyRecord,
    PropertyRepositoryTrait, PropertyUpsert,
};
use crate::utils::time_utils;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Mock Implementations
// ============================================================================

#[derive(Default)]
struct MockPropertyRepository {
    candidates: Vec<PropertyRecord>,
    samples: Vec<AreaSample>,
    fail_reads: bool,
    reads: AtomicUsize,
}

impl MockPropertyRepository {
    fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn check_read(&self) -> Result<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "disk I/O error".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PropertyRepositoryTrait for MockPropertyRepository {
    async fn find_comparable_candidates(
        &self,
        _city: &str,
        _district: &str,
        _window: ObservationWindow,
    ) -> Result<Vec<PropertyRecord>> {
        self.check_read()?;
        Ok(self.candidates.clone())
    }

    async fn list_area_samples(
        &self,
        _city: &str,
        _district: Option<&str>,
        _window: ObservationWindow,
    ) -> Result<Vec<AreaSample>> {
        self.check_read()?;
        Ok(self.samples.clone())
    }

    fn list_properties(&self, _filter: &PropertyFilter, _limit: i64) -> Result<Vec<PropertyRecord>> {
        unimplemented!()
    }

    fn get_by_id(&self, _property_id: &str) -> Result<Option<PropertyRecord>> {
        unimplemented!()
    }

    fn get_price_history(&self, _property_id: &str) -> Result<Vec<PriceHistoryEntry>> {
        unimplemented!()
    }

    fn list_cities(&self) -> Result<Vec<String>> {
        unimplemented!()
    }

    fn list_districts(&self, _city: &str) -> Result<Vec<String>> {
        unimplemented!()
    }

    fn list_neighborhoods(&self, _city: &str, _district: &str) -> Result<Vec<String>> {
        unimplemented!()
    }

    async fn upsert_listings(&self, _listings: Vec<PropertyUpsert>) -> Result<usize> {
        unimplemented!()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn as_of() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn query() -> ValuationQuery {
    ValuationQuery {
        city: "Istanbul".to_string(),
        district: "Kadikoy".to_string(),
        neighborhood: "Moda".to_string(),
        square_meters: dec!(100),
        building_age: 5,
        property_type: "apartment".to_string(),
        room_count: Some("3+1".to_string()),
        floor: Some(2),
        total_floors: Some(5),
    }
}

fn listing(id: &str, neighborhood: &str, area: Decimal, price: Decimal) -> PropertyRecord {
    let observed = as_of() - Duration::days(5);
    PropertyRecord {
        id: id.to_string(),
        listing_number: format!("L-{}", id),
        title: None,
        price,
        currency: "TL".to_string(),
        city: "Istanbul".to_string(),
        district: "Kadikoy".to_string(),
        neighborhood: neighborhood.to_string(),
        square_meters: area,
        building_age: Some(5),
        property_type: "apartment".to_string(),
        room_count: None,
        floor: None,
        total_floors: None,
        price_per_sqm: None,
        listing_date: None,
        agency_name: None,
        agent_name: None,
        agent_phones: vec![],
        image_url: None,
        listing_url: None,
        created_at: observed,
        updated_at: observed,
    }
}

fn sample(neighborhood: &str, price_per_sqm: Decimal, observed_at: NaiveDateTime) -> AreaSample {
    AreaSample {
        city: "Istanbul".to_string(),
        district: "Kadikoy".to_string(),
        neighborhood: neighborhood.to_string(),
        price_per_sqm: Some(price_per_sqm),
        building_age: Some(8),
        observed_at,
    }
}

/// Neighborhood average 20000, district average 18000.
fn kadikoy_samples() -> Vec<AreaSample> {
    let observed = as_of() - Duration::days(5);
    vec![
        sample("Moda", dec!(20000), observed),
        sample("Moda", dec!(20000), observed),
        sample("Moda", dec!(20000), observed),
        sample("Fenerbahce", dec!(15000), observed),
        sample("Fenerbahce", dec!(15000), observed),
    ]
}

fn moda_candidates(count: usize) -> Vec<PropertyRecord> {
    (0..count)
        .map(|i| listing(&format!("m{}", i), "Moda", dec!(100), dec!(2000000)))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_estimate_with_six_comparables() {
    let repo = Arc::new(MockPropertyRepository {
        candidates: moda_candidates(6),
        samples: kadikoy_samples(),
        ..Default::default()
    });
    let service = ValuationService::new(repo.clone());

    let result = service.estimate_as_of(query(), as_of()).await.unwrap();

    assert_eq!(result.breakdown.base_price_per_sqm, dec!(19200));
    assert_eq!(result.breakdown.age_factor, dec!(1.05));
    assert_eq!(result.breakdown.size_factor, dec!(1.00));
    assert_eq!(result.estimated_price, dec!(2016000));
    assert_eq!(result.price_range.low, dec!(1814400));
    assert_eq!(result.price_range.high, dec!(2217600));
    assert_eq!(result.comparables.len(), 6);
    assert!(result.comparables.iter().all(|c| c.similarity_score == 100));
    // 6 * 4 + 3 * 0.6 + 30 = 55.8
    assert_eq!(result.confidence_score, 55);
    assert_eq!(result.as_of, as_of());
    assert_eq!(repo.read_count(), 2);
}

#[tokio::test]
async fn test_estimate_with_few_comparables_widens_range() {
    let repo = Arc::new(MockPropertyRepository {
        candidates: moda_candidates(3),
        samples: kadikoy_samples(),
        ..Default::default()
    });
    let service = ValuationService::new(repo);

    let result = service.estimate_as_of(query(), as_of()).await.unwrap();

    assert_eq!(result.breakdown.range_factor, dec!(0.15));
    assert_eq!(result.price_range.low, dec!(1713600));
    assert_eq!(result.price_range.high, dec!(2318400));
}

#[tokio::test]
async fn test_estimate_without_area_data_fails() {
    let repo = Arc::new(MockPropertyRepository {
        candidates: moda_candidates(6),
        samples: vec![sample("Fenerbahce", dec!(15000), as_of() - Duration::days(5))],
        ..Default::default()
    });
    let service = ValuationService::new(repo);

    let err = service.estimate_as_of(query(), as_of()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Valuation(ValuationError::InsufficientAreaData { ref neighborhood, .. })
            if neighborhood == "Moda"
    ));
}

#[tokio::test]
async fn test_area_data_is_checked_before_comparables() {
    let service = ValuationService::new(Arc::new(MockPropertyRepository::default()));

    let err = service.estimate_as_of(query(), as_of()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Valuation(ValuationError::InsufficientAreaData { .. })
    ));
}

#[tokio::test]
async fn test_estimate_without_comparables_fails() {
    // Other neighborhood, other type, far larger and much older: scores 0
    let mut unlike = listing("x", "Fenerbahce", dec!(300), dec!(6000000));
    unlike.property_type = "villa".to_string();
    unlike.building_age = Some(60);
    let repo = Arc::new(MockPropertyRepository {
        candidates: vec![unlike],
        samples: kadikoy_samples(),
        ..Default::default()
    });
    let service = ValuationService::new(repo);

    let err = service.estimate_as_of(query(), as_of()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Valuation(ValuationError::NoComparablesFound { .. })
    ));
}

#[tokio::test]
async fn test_invalid_query_is_rejected_before_store_access() {
    let repo = Arc::new(MockPropertyRepository {
        candidates: moda_candidates(6),
        samples: kadikoy_samples(),
        ..Default::default()
    });
    let service = ValuationService::new(repo.clone());

    let mut zero_area = query();
    zero_area.square_meters = Decimal::ZERO;
    let err = service.estimate_as_of(zero_area, as_of()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::OutOfRange { .. })
    ));

    let mut no_city = query();
    no_city.city = " ".to_string();
    let err = service.estimate_as_of(no_city, as_of()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::MissingField(ref f)) if f == "city"
    ));

    assert_eq!(repo.read_count(), 0);
}

#[tokio::test]
async fn test_oversized_area_is_rejected_before_store_access() {
    let huge = dec!(10000000000000000000000000);
    let repo = Arc::new(MockPropertyRepository {
        candidates: vec![listing("big", "Moda", huge, dec!(2000000))],
        samples: kadikoy_samples(),
        ..Default::default()
    });
    let service = ValuationService::new(repo.clone());

    let mut oversized = query();
    oversized.square_meters = huge;
    let err = service.estimate_as_of(oversized, as_of()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::OutOfRange { ref field, .. }) if field == "squareMeters"
    ));
    assert_eq!(repo.read_count(), 0);

    let mut largest = query();
    largest.square_meters = dec!(1000000);
    assert!(largest.validate().is_ok());
}

#[tokio::test]
async fn test_estimate_overflow_is_a_validation_error() {
    // Stored prices near the Decimal limit overflow once scaled by the area
    let extreme = dec!(70000000000000000000000000000);
    let repo = Arc::new(MockPropertyRepository {
        candidates: moda_candidates(6),
        samples: vec![sample("Moda", extreme, as_of() - Duration::days(5))],
        ..Default::default()
    });
    let service = ValuationService::new(repo);

    let err = service.estimate_as_of(query(), as_of()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::OutOfRange { ref field, .. }) if field == "estimatedPrice"
    ));
}

#[tokio::test]
async fn test_unpriced_listings_deepen_area_without_moving_estimate() {
    let mut samples = kadikoy_samples();
    let mut unpriced = sample("Moda", dec!(0), as_of() - Duration::days(7));
    unpriced.price_per_sqm = None;
    samples.push(unpriced);
    let repo = Arc::new(MockPropertyRepository {
        candidates: moda_candidates(6),
        samples,
        ..Default::default()
    });
    let service = ValuationService::new(repo);

    let result = service.estimate_as_of(query(), as_of()).await.unwrap();
    assert_eq!(result.area_stats.neighborhood_listings, 4);
    assert_eq!(result.area_stats.district_listings, 6);
    assert_eq!(result.area_stats.neighborhood_avg_price_per_sqm, dec!(20000));
    assert_eq!(result.estimated_price, dec!(2016000));
    // 6 * 4 + 4 * 0.6 + 30 = 56.4
    assert_eq!(result.confidence_score, 56);
}

#[tokio::test]
async fn test_data_store_errors_propagate() {
    let repo = Arc::new(MockPropertyRepository {
        fail_reads: true,
        ..Default::default()
    });
    let service = ValuationService::new(repo);

    let err = service.estimate_as_of(query(), as_of()).await.unwrap_err();
    assert!(err.is_data_store_error());
}

#[tokio::test]
async fn test_result_uses_query_location() {
    let repo = Arc::new(MockPropertyRepository {
        candidates: moda_candidates(6),
        samples: kadikoy_samples(),
        ..Default::default()
    });
    let service = ValuationService::new(repo);

    let result = service.estimate_as_of(query(), as_of()).await.unwrap();
    assert_eq!(result.area_stats.city, "Istanbul");
    assert_eq!(result.area_stats.district, "Kadikoy");
    assert_eq!(result.area_stats.neighborhood, "Moda");
    assert_eq!(result.area_stats.neighborhood_listings, 3);
    assert_eq!(result.area_stats.district_listings, 5);
}

#[tokio::test]
async fn test_same_snapshot_gives_same_result() {
    let repo = Arc::new(MockPropertyRepository {
        candidates: moda_candidates(8),
        samples: kadikoy_samples(),
        ..Default::default()
    });
    let service = ValuationService::new(repo);

    let first = service.estimate_as_of(query(), as_of()).await.unwrap();
    let second = service.estimate_as_of(query(), as_of()).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_listings_outside_window_are_ignored() {
    let mut stale = moda_candidates(6);
    for record in stale.iter_mut() {
        record.created_at = as_of() - Duration::days(400);
    }
    let repo = Arc::new(MockPropertyRepository {
        candidates: stale,
        samples: kadikoy_samples(),
        ..Default::default()
    });
    let service = ValuationService::new(repo);

    let err = service.estimate_as_of(query(), as_of()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Valuation(ValuationError::NoComparablesFound { .. })
    ));
}

#[tokio::test]
async fn test_area_summaries_use_recent_samples() {
    let recent = time_utils::now_utc() - Duration::days(3);
    let repo = Arc::new(MockPropertyRepository {
        samples: vec![
            sample("Moda", dec!(20000), recent),
            sample("Moda", dec!(22000), recent),
            sample("Fenerbahce", dec!(15000), recent),
            sample("Fenerbahce", dec!(99000), recent - Duration::days(365)),
        ],
        ..Default::default()
    });
    let service = ValuationService::new(repo);

    let summaries = service.list_area_summaries("Istanbul", None).await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].neighborhood, "Fenerbahce");
    assert_eq!(summaries[0].total_listings, 1);
    assert_eq!(summaries[1].avg_price_per_sqm, dec!(21000));
    assert_eq!(summaries[1].avg_property_age, Some(dec!(8)));
}
