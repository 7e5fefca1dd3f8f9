use async_trait::async_trait;

use crate::errors::Result;
use crate::properties::properties_model::{
    AreaSample, ImportSummary, LocationOption, NewPropertyListing, ObservationWindow,
    PriceHistoryEntry, PropertyFilter, PropertyRecord, PropertyUpsert,
};

/// Read/write access to stored listings.
///
/// The two windowed reads used by the valuation engine are async so that a
/// caller can issue them concurrently.
#[async_trait]
pub trait PropertyRepositoryTrait: Send + Sync {
    /// Listings in `city`/`district` observed inside `window` with a positive
    /// price and a positive area.
    async fn find_comparable_candidates(
        &self,
        city: &str,
        district: &str,
        window: ObservationWindow,
    ) -> Result<Vec<PropertyRecord>>;

    /// Price-per-area samples observed inside `window`, optionally restricted to
    /// a district. Listings without a price-per-area are not returned.
    async fn list_area_samples(
        &self,
        city: &str,
        district: Option<&str>,
        window: ObservationWindow,
    ) -> Result<Vec<AreaSample>>;

    fn list_properties(&self, filter: &PropertyFilter, limit: i64) -> Result<Vec<PropertyRecord>>;

    fn get_by_id(&self, property_id: &str) -> Result<Option<PropertyRecord>>;

    fn get_price_history(&self, property_id: &str) -> Result<Vec<PriceHistoryEntry>>;

    fn list_cities(&self) -> Result<Vec<String>>;

    fn list_districts(&self, city: &str) -> Result<Vec<String>>;

    fn list_neighborhoods(&self, city: &str, district: &str) -> Result<Vec<String>>;

    /// Inserts or updates listings keyed by listing number. Returns the number
    /// of rows written.
    async fn upsert_listings(&self, listings: Vec<PropertyUpsert>) -> Result<usize>;
}

/// Trait for listing service operations
#[async_trait]
pub trait PropertyServiceTrait: Send + Sync {
    fn list_properties(&self, filter: PropertyFilter) -> Result<Vec<PropertyRecord>>;

    fn get_property(&self, property_id: &str) -> Result<PropertyRecord>;

    fn get_price_history(&self, property_id: &str) -> Result<Vec<PriceHistoryEntry>>;

    fn list_cities(&self) -> Result<Vec<LocationOption>>;

    fn list_districts(&self, city: &str) -> Result<Vec<LocationOption>>;

    fn list_neighborhoods(&self, city: &str, district: &str) -> Result<Vec<LocationOption>>;

    async fn import_listings(&self, listings: Vec<NewPropertyListing>) -> Result<ImportSummary>;
}
