use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use emlak_core::properties as core_properties;
use emlak_core::valuation as core_valuation;

// ===================== Valuation =====================

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRequest {
    pub city: String,
    pub district: String,
    pub neighborhood: String,
    #[schema(value_type = f64)]
    pub square_meters: Decimal,
    pub building_age: i32,
    pub property_type: String,
    pub room_count: Option<String>,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
}

impl From<ValuationRequest> for core_valuation::ValuationQuery {
    fn from(r: ValuationRequest) -> Self {
        Self {
            city: r.city,
            district: r.district,
            neighborhood: r.neighborhood,
            square_meters: r.square_meters,
            building_age: r.building_age,
            property_type: r.property_type,
            room_count: r.room_count,
            floor: r.floor,
            total_floors: r.total_floors,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct PriceRange {
    #[schema(value_type = f64)]
    pub low: Decimal,
    #[schema(value_type = f64)]
    pub high: Decimal,
}

impl From<core_valuation::PriceRange> for PriceRange {
    fn from(r: core_valuation::PriceRange) -> Self {
        Self {
            low: r.low,
            high: r.high,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ComparableListing {
    #[serde(flatten)]
    pub property: PropertyListing,
    pub similarity_score: u8,
    #[schema(value_type = f64)]
    pub price_per_sqm: Decimal,
}

impl From<core_valuation::ScoredComparable> for ComparableListing {
    fn from(c: core_valuation::ScoredComparable) -> Self {
        Self {
            property: c.property.into(),
            similarity_score: c.similarity_score,
            price_per_sqm: c.price_per_sqm,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AreaStatistics {
    pub city: String,
    pub district: String,
    pub neighborhood: String,
    #[schema(value_type = f64)]
    pub neighborhood_avg_price_per_sqm: Decimal,
    #[schema(value_type = f64)]
    pub neighborhood_median_price_per_sqm: Decimal,
    pub neighborhood_listings: usize,
    #[schema(value_type = f64)]
    pub district_avg_price_per_sqm: Decimal,
    #[schema(value_type = f64)]
    pub district_median_price_per_sqm: Decimal,
    pub district_listings: usize,
    #[schema(value_type = f64)]
    pub price_trend_pct: Decimal,
}

impl From<core_valuation::AreaStatistics> for AreaStatistics {
    fn from(s: core_valuation::AreaStatistics) -> Self {
        Self {
            city: s.city,
            district: s.district,
            neighborhood: s.neighborhood,
            neighborhood_avg_price_per_sqm: s.neighborhood_avg_price_per_sqm,
            neighborhood_median_price_per_sqm: s.neighborhood_median_price_per_sqm,
            neighborhood_listings: s.neighborhood_listings,
            district_avg_price_per_sqm: s.district_avg_price_per_sqm,
            district_median_price_per_sqm: s.district_median_price_per_sqm,
            district_listings: s.district_listings,
            price_trend_pct: s.price_trend_pct,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EstimateBreakdown {
    #[schema(value_type = f64)]
    pub base_price_per_sqm: Decimal,
    #[schema(value_type = f64)]
    pub age_factor: Decimal,
    #[schema(value_type = f64)]
    pub size_factor: Decimal,
    #[schema(value_type = f64)]
    pub estimated_price_per_sqm: Decimal,
    #[schema(value_type = f64)]
    pub range_factor: Decimal,
}

impl From<core_valuation::EstimateBreakdown> for EstimateBreakdown {
    fn from(b: core_valuation::EstimateBreakdown) -> Self {
        Self {
            base_price_per_sqm: b.base_price_per_sqm,
            age_factor: b.age_factor,
            size_factor: b.size_factor,
            estimated_price_per_sqm: b.estimated_price_per_sqm,
            range_factor: b.range_factor,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResponse {
    #[schema(value_type = f64)]
    pub estimated_price: Decimal,
    pub price_range: PriceRange,
    /// 0-100
    pub confidence_score: u8,
    pub comparables: Vec<ComparableListing>,
    pub area_stats: AreaStatistics,
    pub breakdown: EstimateBreakdown,
    pub as_of: NaiveDateTime,
}

impl From<core_valuation::ValuationResult> for ValuationResponse {
    fn from(v: core_valuation::ValuationResult) -> Self {
        Self {
            estimated_price: v.estimated_price,
            price_range: v.price_range.into(),
            confidence_score: v.confidence_score,
            comparables: v.comparables.into_iter().map(Into::into).collect(),
            area_stats: v.area_stats.into(),
            breakdown: v.breakdown.into(),
            as_of: v.as_of,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AreaSummary {
    pub city: String,
    pub district: String,
    pub neighborhood: String,
    #[schema(value_type = f64)]
    pub avg_price_per_sqm: Decimal,
    #[schema(value_type = Option<f64>)]
    pub avg_property_age: Option<Decimal>,
    pub total_listings: usize,
    #[schema(value_type = f64)]
    pub price_trend_pct: Decimal,
}

impl From<core_valuation::AreaSummary> for AreaSummary {
    fn from(s: core_valuation::AreaSummary) -> Self {
        Self {
            city: s.city,
            district: s.district,
            neighborhood: s.neighborhood,
            avg_price_per_sqm: s.avg_price_per_sqm,
            avg_property_age: s.avg_property_age,
            total_listings: s.total_listings,
            price_trend_pct: s.price_trend_pct,
        }
    }
}

// ===================== Listings =====================

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListing {
    pub id: String,
    pub listing_number: String,
    pub title: Option<String>,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub currency: String,
    pub city: String,
    pub district: String,
    pub neighborhood: String,
    #[schema(value_type = f64)]
    pub square_meters: Decimal,
    pub building_age: Option<i32>,
    pub property_type: String,
    pub room_count: Option<String>,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    #[schema(value_type = Option<f64>)]
    pub price_per_sqm: Option<Decimal>,
    pub listing_date: Option<String>,
    pub agency_name: Option<String>,
    pub agent_name: Option<String>,
    pub agent_phones: Vec<String>,
    pub image_url: Option<String>,
    pub listing_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<core_properties::PropertyRecord> for PropertyListing {
    fn from(p: core_properties::PropertyRecord) -> Self {
        Self {
            id: p.id,
            listing_number: p.listing_number,
            title: p.title,
            price: p.price,
            currency: p.currency,
            city: p.city,
            district: p.district,
            neighborhood: p.neighborhood,
            square_meters: p.square_meters,
            building_age: p.building_age,
            property_type: p.property_type,
            room_count: p.room_count,
            floor: p.floor,
            total_floors: p.total_floors,
            price_per_sqm: p.price_per_sqm,
            listing_date: p.listing_date,
            agency_name: p.agency_name,
            agent_name: p.agent_name,
            agent_phones: p.agent_phones,
            image_url: p.image_url,
            listing_url: p.listing_url,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryPoint {
    pub id: String,
    pub property_id: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub recorded_at: NaiveDateTime,
}

impl From<core_properties::PriceHistoryEntry> for PriceHistoryPoint {
    fn from(h: core_properties::PriceHistoryEntry) -> Self {
        Self {
            id: h.id,
            property_id: h.property_id,
            price: h.price,
            recorded_at: h.recorded_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct LocationOption {
    pub value: String,
    pub label: String,
}

impl From<core_properties::LocationOption> for LocationOption {
    fn from(o: core_properties::LocationOption) -> Self {
        Self {
            value: o.value,
            label: o.label,
        }
    }
}

/// Listing as produced by an extractor. Listings missing a listing number or
/// a location field are skipped.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub listing_number: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub currency: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub neighborhood: Option<String>,
    #[serde(default)]
    #[schema(value_type = f64)]
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
    pub observed_at: Option<NaiveDateTime>,
}

impl From<NewListing> for core_properties::NewPropertyListing {
    fn from(l: NewListing) -> Self {
        Self {
            listing_number: l.listing_number,
            title: l.title,
            price: l.price,
            currency: l.currency,
            city: l.city,
            district: l.district,
            neighborhood: l.neighborhood,
            square_meters: l.square_meters,
            building_age: l.building_age,
            property_type: l.property_type,
            room_count: l.room_count,
            floor: l.floor,
            total_floors: l.total_floors,
            listing_date: l.listing_date,
            agency_name: l.agency_name,
            agent_name: l.agent_name,
            agent_phones: l.agent_phones,
            image_url: l.image_url,
            listing_url: l.listing_url,
            observed_at: l.observed_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct ImportListingsRequest {
    pub listings: Vec<NewListing>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub saved: usize,
    pub skipped: usize,
}

impl From<core_properties::ImportSummary> for ImportSummary {
    fn from(s: core_properties::ImportSummary) -> Self {
        Self {
            saved: s.saved,
            skipped: s.skipped,
        }
    }
}
