use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::constants::{DEFAULT_CURRENCY, DEFAULT_LISTING_LIMIT, MAX_LISTING_LIMIT};
use crate::errors::{DatabaseError, Error, Result};
use crate::utils::time_utils;

use super::properties_model::{
    price_per_sqm, ImportSummary, LocationOption, NewPropertyListing, PriceHistoryEntry,
    PropertyFilter, PropertyRecord, PropertyUpsert,
};
use super::properties_traits::{PropertyRepositoryTrait, PropertyServiceTrait};

/// Service for browsing and importing listings.
pub struct PropertyService {
    repository: Arc<dyn PropertyRepositoryTrait>,
}

impl PropertyService {
    pub fn new(repository: Arc<dyn PropertyRepositoryTrait>) -> Self {
        PropertyService { repository }
    }

    fn effective_limit(limit: Option<i64>) -> i64 {
        limit
            .unwrap_or(DEFAULT_LISTING_LIMIT)
            .clamp(1, MAX_LISTING_LIMIT)
    }
}

/// Returns the trimmed value, or `None` when it is missing or blank.
fn required_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validates an extracted listing. The error carries the reason the listing
/// is skipped.
pub(crate) fn prepare_listing(
    listing: NewPropertyListing,
    imported_at: NaiveDateTime,
) -> std::result::Result<PropertyUpsert, String> {
    let listing_number =
        required_text(listing.listing_number).ok_or_else(|| "missing listing number".to_string())?;
    let city = required_text(listing.city)
        .ok_or_else(|| format!("listing {} has no city", listing_number))?;
    let district = required_text(listing.district)
        .ok_or_else(|| format!("listing {} has no district", listing_number))?;
    let neighborhood = required_text(listing.neighborhood)
        .ok_or_else(|| format!("listing {} has no neighborhood", listing_number))?;
    let property_type = required_text(listing.property_type)
        .ok_or_else(|| format!("listing {} has no property type", listing_number))?;

    if listing.price < Decimal::ZERO || listing.square_meters < Decimal::ZERO {
        return Err(format!(
            "listing {} has a negative price or area",
            listing_number
        ));
    }
    if listing.building_age.is_some_and(|age| age < 0) {
        return Err(format!(
            "listing {} has a negative building age",
            listing_number
        ));
    }

    let ppsqm = price_per_sqm(listing.price, listing.square_meters);
    if ppsqm.is_none() && listing.price > Decimal::ZERO && listing.square_meters > Decimal::ZERO {
        return Err(format!(
            "listing {} has a price per square meter out of range",
            listing_number
        ));
    }

    Ok(PropertyUpsert {
        price_per_sqm: ppsqm,
        currency: required_text(listing.currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        listing_number,
        title: listing.title,
        price: listing.price,
        city,
        district,
        neighborhood,
        square_meters: listing.square_meters,
        building_age: listing.building_age,
        property_type,
        room_count: listing.room_count,
        floor: listing.floor,
        total_floors: listing.total_floors,
        listing_date: listing.listing_date,
        agency_name: listing.agency_name,
        agent_name: listing.agent_name,
        agent_phones: listing.agent_phones,
        image_url: listing.image_url,
        listing_url: listing.listing_url,
        observed_at: listing.observed_at.unwrap_or(imported_at),
    })
}

#[async_trait]
impl PropertyServiceTrait for PropertyService {
    fn list_properties(&self, filter: PropertyFilter) -> Result<Vec<PropertyRecord>> {
        let limit = Self::effective_limit(filter.limit);
        self.repository.list_properties(&filter, limit)
    }

    fn get_property(&self, property_id: &str) -> Result<PropertyRecord> {
        self.repository.get_by_id(property_id)?.ok_or_else(|| {
            Error::Database(DatabaseError::NotFound(format!(
                "Property {} not found",
                property_id
            )))
        })
    }

    fn get_price_history(&self, property_id: &str) -> Result<Vec<PriceHistoryEntry>> {
        // Distinguish an unknown listing from one without history.
        self.get_property(property_id)?;
        self.repository.get_price_history(property_id)
    }

    fn list_cities(&self) -> Result<Vec<LocationOption>> {
        Ok(self
            .repository
            .list_cities()?
            .into_iter()
            .map(LocationOption::from)
            .collect())
    }

    fn list_districts(&self, city: &str) -> Result<Vec<LocationOption>> {
        Ok(self
            .repository
            .list_districts(city)?
            .into_iter()
            .map(LocationOption::from)
            .collect())
    }

    fn list_neighborhoods(&self, city: &str, district: &str) -> Result<Vec<LocationOption>> {
        Ok(self
            .repository
            .list_neighborhoods(city, district)?
            .into_iter()
            .map(LocationOption::from)
            .collect())
    }

    async fn import_listings(&self, listings: Vec<NewPropertyListing>) -> Result<ImportSummary> {
        let imported_at = time_utils::now_utc();
        let total = listings.len();
        let mut skipped = 0usize;
        let mut prepared = Vec::with_capacity(total);

        for listing in listings {
            match prepare_listing(listing, imported_at) {
                Ok(upsert) => prepared.push(upsert),
                Err(reason) => {
                    warn!("Skipping listing during import: {}", reason);
                    skipped += 1;
                }
            }
        }

        let saved = if prepared.is_empty() {
            debug!("No valid listings in import batch of {}", total);
            0
        } else {
            self.repository.upsert_listings(prepared).await?
        };

        info!(
            "Imported {} listings ({} skipped) out of {}",
            saved, skipped, total
        );
        Ok(ImportSummary { saved, skipped })
    }
}
