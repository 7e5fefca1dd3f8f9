//! Database models for listings and their price history.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use emlak_core::properties::{AreaSample, PriceHistoryEntry, PropertyRecord, PropertyUpsert};

use crate::errors::StorageError;

/// Converts a stored floating-point amount, rejecting NaN and infinities.
pub(crate) fn decimal_from_db(value: f64, field: &str) -> Result<Decimal, StorageError> {
    Decimal::from_f64(value)
        .ok_or_else(|| StorageError::MalformedRow(format!("{} is not a finite number: {}", field, value)))
}

pub(crate) fn decimal_to_db(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Agent phone numbers are stored as a JSON array in a single text column.
fn phones_from_db(value: Option<String>) -> Result<Vec<String>, StorageError> {
    match value {
        None => Ok(Vec::new()),
        Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| StorageError::MalformedRow(format!("agent_phone: {}", e))),
    }
}

fn phones_to_db(phones: &[String]) -> Option<String> {
    if phones.is_empty() {
        None
    } else {
        serde_json::to_string(phones).ok()
    }
}

/// Database model for listings
#[derive(Queryable, Identifiable, Insertable, Selectable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::properties)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PropertyDB {
    pub id: String,
    pub listing_number: String,
    pub title: Option<String>,
    pub price: f64,
    pub currency: String,
    pub city: String,
    pub district: String,
    pub neighborhood: String,
    pub square_meters: f64,
    pub building_age: Option<i32>,
    pub property_type: String,
    pub room_count: Option<String>,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    pub price_per_sqm: Option<f64>,
    pub listing_date: Option<String>,
    pub agency_name: Option<String>,
    pub agent_name: Option<String>,
    pub agent_phone: Option<String>,
    pub image_url: Option<String>,
    pub listing_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PropertyDB {
    /// Row for a listing seen for the first time.
    pub fn from_upsert(new_id: String, upsert: &PropertyUpsert) -> Self {
        PropertyDB {
            id: new_id,
            listing_number: upsert.listing_number.clone(),
            title: upsert.title.clone(),
            price: decimal_to_db(upsert.price),
            currency: upsert.currency.clone(),
            city: upsert.city.clone(),
            district: upsert.district.clone(),
            neighborhood: upsert.neighborhood.clone(),
            square_meters: decimal_to_db(upsert.square_meters),
            building_age: upsert.building_age,
            property_type: upsert.property_type.clone(),
            room_count: upsert.room_count.clone(),
            floor: upsert.floor,
            total_floors: upsert.total_floors,
            price_per_sqm: upsert.price_per_sqm.map(decimal_to_db),
            listing_date: upsert.listing_date.clone(),
            agency_name: upsert.agency_name.clone(),
            agent_name: upsert.agent_name.clone(),
            agent_phone: phones_to_db(&upsert.agent_phones),
            image_url: upsert.image_url.clone(),
            listing_url: upsert.listing_url.clone(),
            created_at: upsert.observed_at,
            updated_at: upsert.observed_at,
        }
    }

    /// Existing row refreshed with newly extracted values. Identity and the
    /// first observation time are kept.
    pub fn refreshed(&self, upsert: &PropertyUpsert, now: NaiveDateTime) -> Self {
        let mut row = PropertyDB::from_upsert(self.id.clone(), upsert);
        row.created_at = self.created_at;
        row.updated_at = now;
        row
    }
}

impl TryFrom<PropertyDB> for PropertyRecord {
    type Error = StorageError;

    fn try_from(db: PropertyDB) -> Result<Self, Self::Error> {
        Ok(PropertyRecord {
            price: decimal_from_db(db.price, "price")?,
            square_meters: decimal_from_db(db.square_meters, "square_meters")?,
            price_per_sqm: db
                .price_per_sqm
                .map(|v| decimal_from_db(v, "price_per_sqm"))
                .transpose()?,
            agent_phones: phones_from_db(db.agent_phone)?,
            id: db.id,
            listing_number: db.listing_number,
            title: db.title,
            currency: db.currency,
            city: db.city,
            district: db.district,
            neighborhood: db.neighborhood,
            building_age: db.building_age,
            property_type: db.property_type,
            room_count: db.room_count,
            floor: db.floor,
            total_floors: db.total_floors,
            listing_date: db.listing_date,
            agency_name: db.agency_name,
            agent_name: db.agent_name,
            image_url: db.image_url,
            listing_url: db.listing_url,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

/// Projection used for area statistics
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::properties)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AreaSampleDB {
    pub city: String,
    pub district: String,
    pub neighborhood: String,
    pub price_per_sqm: Option<f64>,
    pub building_age: Option<i32>,
    pub created_at: NaiveDateTime,
}

impl AreaSampleDB {
    pub fn into_sample(self) -> Result<AreaSample, StorageError> {
        Ok(AreaSample {
            price_per_sqm: self
                .price_per_sqm
                .map(|raw| decimal_from_db(raw, "price_per_sqm"))
                .transpose()?,
            city: self.city,
            district: self.district,
            neighborhood: self.neighborhood,
            building_age: self.building_age,
            observed_at: self.created_at,
        })
    }
}

/// Database model for price history entries
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::price_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceHistoryDB {
    pub id: String,
    pub property_id: String,
    pub price: f64,
    pub recorded_at: NaiveDateTime,
}

impl TryFrom<PriceHistoryDB> for PriceHistoryEntry {
    type Error = StorageError;

    fn try_from(db: PriceHistoryDB) -> Result<Self, Self::Error> {
        Ok(PriceHistoryEntry {
            price: decimal_from_db(db.price, "price")?,
            id: db.id,
            property_id: db.property_id,
            recorded_at: db.recorded_at,
        })
    }
}
