use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use uuid::Uuid;

use emlak_core::properties::{
    AreaSample, ObservationWindow, PriceHistoryEntry, PropertyFilter, PropertyRecord,
    PropertyRepositoryTrait, PropertyUpsert,
};
use emlak_core::utils::time_utils;
use emlak_core::Result;

use super::model::{decimal_to_db, AreaSampleDB, PriceHistoryDB, PropertyDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{price_history, properties};

fn into_records(rows: Vec<PropertyDB>) -> Result<Vec<PropertyRecord>> {
    rows.into_iter()
        .map(|row| PropertyRecord::try_from(row).map_err(Into::into))
        .collect()
}

/// Runs a blocking read on the blocking thread pool.
async fn run_blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::TaskFailed(e.to_string()))?
}

pub struct PropertyRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PropertyRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        PropertyRepository { pool, writer }
    }

    fn find_comparable_candidates_impl(
        pool: &DbPool,
        city: &str,
        district: &str,
        window: ObservationWindow,
    ) -> Result<Vec<PropertyRecord>> {
        let mut conn = get_connection(pool)?;
        let rows = properties::table
            .filter(properties::city.eq(city))
            .filter(properties::district.eq(district))
            .filter(properties::created_at.ge(window.start))
            .filter(properties::created_at.le(window.end))
            .filter(properties::price.gt(0.0))
            .filter(properties::square_meters.gt(0.0))
            .order((properties::created_at.desc(), properties::id.asc()))
            .select(PropertyDB::as_select())
            .load::<PropertyDB>(&mut conn)
            .into_core()?;
        into_records(rows)
    }

    fn list_area_samples_impl(
        pool: &DbPool,
        city: &str,
        district: Option<&str>,
        window: ObservationWindow,
    ) -> Result<Vec<AreaSample>> {
        let mut conn = get_connection(pool)?;
        let mut query = properties::table
            .filter(properties::city.eq(city))
            .filter(properties::created_at.ge(window.start))
            .filter(properties::created_at.le(window.end))
            .select(AreaSampleDB::as_select())
            .into_boxed();

        if let Some(district) = district {
            query = query.filter(properties::district.eq(district));
        }

        let rows = query.load::<AreaSampleDB>(&mut conn).into_core()?;
        rows.into_iter()
            .map(|row| row.into_sample().map_err(Into::into))
            .collect()
    }

    /// Inserts or refreshes one listing. Returns true when a price history
    /// entry was appended.
    fn upsert_listing(conn: &mut SqliteConnection, upsert: &PropertyUpsert) -> Result<bool> {
        let existing = properties::table
            .filter(properties::listing_number.eq(&upsert.listing_number))
            .select(PropertyDB::as_select())
            .first::<PropertyDB>(conn)
            .optional()
            .into_core()?;

        let (property_id, price_changed) = match existing {
            Some(current) => {
                let row = current.refreshed(upsert, time_utils::now_utc());
                diesel::update(properties::table.find(current.id.as_str()))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                (current.id.clone(), current.price != row.price)
            }
            None => {
                let row = PropertyDB::from_upsert(Uuid::new_v4().to_string(), upsert);
                diesel::insert_into(properties::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                (row.id, true)
            }
        };

        if price_changed {
            let entry = PriceHistoryDB {
                id: Uuid::new_v4().to_string(),
                property_id,
                price: decimal_to_db(upsert.price),
                recorded_at: upsert.observed_at,
            };
            diesel::insert_into(price_history::table)
                .values(&entry)
                .execute(conn)
                .into_core()?;
        }
        Ok(price_changed)
    }
}

#[async_trait]
impl PropertyRepositoryTrait for PropertyRepository {
    async fn find_comparable_candidates(
        &self,
        city: &str,
        district: &str,
        window: ObservationWindow,
    ) -> Result<Vec<PropertyRecord>> {
        let pool = Arc::clone(&self.pool);
        let (city, district) = (city.to_string(), district.to_string());
        run_blocking(move || Self::find_comparable_candidates_impl(&pool, &city, &district, window))
            .await
    }

    async fn list_area_samples(
        &self,
        city: &str,
        district: Option<&str>,
        window: ObservationWindow,
    ) -> Result<Vec<AreaSample>> {
        let pool = Arc::clone(&self.pool);
        let city = city.to_string();
        let district = district.map(str::to_string);
        run_blocking(move || {
            Self::list_area_samples_impl(&pool, &city, district.as_deref(), window)
        })
        .await
    }

    fn list_properties(&self, filter: &PropertyFilter, limit: i64) -> Result<Vec<PropertyRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = properties::table
            .select(PropertyDB::as_select())
            .into_boxed();

        if let Some(city) = &filter.city {
            query = query.filter(properties::city.eq(city));
        }
        if let Some(district) = &filter.district {
            query = query.filter(properties::district.eq(district));
        }
        if let Some(property_type) = &filter.property_type {
            query = query.filter(properties::property_type.eq(property_type));
        }
        if let Some(min_price) = filter.min_price {
            query = query.filter(properties::price.ge(decimal_to_db(min_price)));
        }
        if let Some(max_price) = filter.max_price {
            query = query.filter(properties::price.le(decimal_to_db(max_price)));
        }
        if let Some(min_size) = filter.min_size {
            query = query.filter(properties::square_meters.ge(decimal_to_db(min_size)));
        }
        if let Some(max_size) = filter.max_size {
            query = query.filter(properties::square_meters.le(decimal_to_db(max_size)));
        }

        let rows = query
            .order((properties::created_at.desc(), properties::id.asc()))
            .limit(limit)
            .load::<PropertyDB>(&mut conn)
            .into_core()?;
        into_records(rows)
    }

    fn get_by_id(&self, property_id: &str) -> Result<Option<PropertyRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let row = properties::table
            .find(property_id)
            .select(PropertyDB::as_select())
            .first::<PropertyDB>(&mut conn)
            .optional()
            .into_core()?;
        row.map(PropertyRecord::try_from)
            .transpose()
            .map_err(Into::into)
    }

    fn get_price_history(&self, property_id: &str) -> Result<Vec<PriceHistoryEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = price_history::table
            .filter(price_history::property_id.eq(property_id))
            .order((price_history::recorded_at.desc(), price_history::id.asc()))
            .select(PriceHistoryDB::as_select())
            .load::<PriceHistoryDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|row| PriceHistoryEntry::try_from(row).map_err(Into::into))
            .collect()
    }

    fn list_cities(&self) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        properties::table
            .select(properties::city)
            .distinct()
            .order(properties::city.asc())
            .load::<String>(&mut conn)
            .into_core()
    }

    fn list_districts(&self, city: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        properties::table
            .filter(properties::city.eq(city))
            .select(properties::district)
            .distinct()
            .order(properties::district.asc())
            .load::<String>(&mut conn)
            .into_core()
    }

    fn list_neighborhoods(&self, city: &str, district: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        properties::table
            .filter(properties::city.eq(city))
            .filter(properties::district.eq(district))
            .select(properties::neighborhood)
            .distinct()
            .order(properties::neighborhood.asc())
            .load::<String>(&mut conn)
            .into_core()
    }

    async fn upsert_listings(&self, listings: Vec<PropertyUpsert>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut history_entries = 0usize;
                for upsert in &listings {
                    if Self::upsert_listing(conn, upsert)? {
                        history_entries += 1;
                    }
                }
                debug!(
                    "Upserted {} listings, {} price changes recorded",
                    listings.len(),
                    history_entries
                );
                Ok(listings.len())
            })
            .await
    }
}
