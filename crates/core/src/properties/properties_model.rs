//! Property listing domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::time_utils;

/// Number of decimal places kept for derived price-per-area values.
pub const PRICE_PER_SQM_SCALE: u32 = 4;

/// Domain model representing one observed listing.
///
/// Records are owned by the storage layer; services only ever read copies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub id: String,
    /// Identifier of the listing on the source site
    pub listing_number: String,
    pub title: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub city: String,
    pub district: String,
    pub neighborhood: String,
    pub square_meters: Decimal,
    pub building_age: Option<i32>,
    pub property_type: String,
    pub room_count: Option<String>,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    pub price_per_sqm: Option<Decimal>,
    /// Listing date as published by the source site
    pub listing_date: Option<String>,
    pub agency_name: Option<String>,
    pub agent_name: Option<String>,
    pub agent_phones: Vec<String>,
    pub image_url: Option<String>,
    pub listing_url: Option<String>,
    /// When the listing was first observed
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PropertyRecord {
    /// Observation timestamp used by every time window in the engine.
    pub fn observed_at(&self) -> NaiveDateTime {
        self.created_at
    }
}

/// Price divided by area, or `None` when either side is not positive or the
/// quotient does not fit in a `Decimal`.
pub fn price_per_sqm(price: Decimal, square_meters: Decimal) -> Option<Decimal> {
    if price > Decimal::ZERO && square_meters > Decimal::ZERO {
        price
            .checked_div(square_meters)
            .map(|v| v.round_dp(PRICE_PER_SQM_SCALE))
    } else {
        None
    }
}

/// Closed time interval `[start, end]` over listing observation timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ObservationWindow {
    /// Window covering the `months` calendar months that end at `as_of`.
    pub fn last_months(as_of: NaiveDateTime, months: u32) -> Self {
        Self {
            start: time_utils::months_before(as_of, months),
            end: as_of,
        }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Projection of a listing used for area-level aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaSample {
    pub city: String,
    pub district: String,
    pub neighborhood: String,
    /// `None` when the listing lacks a positive price or area
    pub price_per_sqm: Option<Decimal>,
    pub building_age: Option<i32>,
    pub observed_at: NaiveDateTime,
}

/// Entry of a listing's price history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryEntry {
    pub id: String,
    pub property_id: String,
    pub price: Decimal,
    pub recorded_at: NaiveDateTime,
}

/// Value/label pair for location pickers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationOption {
    pub value: String,
    pub label: String,
}

impl From<String> for LocationOption {
    fn from(value: String) -> Self {
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Filters for listing queries. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilter {
    pub city: Option<String>,
    pub district: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_size: Option<Decimal>,
    pub max_size: Option<Decimal>,
    pub property_type: Option<String>,
    pub limit: Option<i64>,
}

/// Listing as extracted by an ingestion process, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPropertyListing {
    pub listing_number: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    pub currency: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub square_meters: Decimal,
    pub building_age: Option<i32>,
    pub property_type: Option<String>,
    pub room_count: Option<String>,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    pub listing_date: Option<String>,
    pub agency_name: Option<String>,
    pub agent_name: Option<String>,
    #[serde(default)]
    pub agent_phones: Vec<String>,
    pub image_url: Option<String>,
    pub listing_url: Option<String>,
    /// Observation time; defaults to the import time
    pub observed_at: Option<NaiveDateTime>,
}

/// Validated listing ready to be written by the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyUpsert {
    pub listing_number: String,
    pub title: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub city: String,
    pub district: String,
    pub neighborhood: String,
    pub square_meters: Decimal,
    pub building_age: Option<i32>,
    pub property_type: String,
    pub room_count: Option<String>,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    pub price_per_sqm: Option<Decimal>,
    pub listing_date: Option<String>,
    pub agency_name: Option<String>,
    pub agent_name: Option<String>,
    pub agent_phones: Vec<String>,
    pub image_url: Option<String>,
    pub listing_url: Option<String>,
    pub observed_at: NaiveDateTime,
}

/// Outcome of an import batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub saved: usize,
    pub skipped: usize,
}
