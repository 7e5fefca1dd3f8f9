//! Valuation engine tuning constants.
//!
//! Every threshold and weight used by comparable selection, area statistics,
//! price estimation and confidence scoring lives here.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Time windows
// ---------------------------------------------------------------------------

/// Listings older than this many months are ignored by the engine.
pub const STATISTICS_WINDOW_MONTHS: u32 = 6;

/// Recent side of the trend comparison: listings from the last month.
pub const TREND_RECENT_MONTHS: u32 = 1;

/// Older side of the trend comparison: listings observed between six and five
/// months ago (start inclusive, end exclusive).
pub const TREND_BASELINE_FROM_MONTHS: u32 = 6;
pub const TREND_BASELINE_TO_MONTHS: u32 = 5;

// ---------------------------------------------------------------------------
// Query bounds
// ---------------------------------------------------------------------------

/// Largest area a valuation query may ask about.
pub const MAX_QUERY_SQUARE_METERS: Decimal = dec!(1000000);

// ---------------------------------------------------------------------------
// Comparable selection
// ---------------------------------------------------------------------------

/// Area difference bands (inclusive upper bound, points).
pub const AREA_PROXIMITY_BANDS: [(Decimal, u8); 4] = [
    (dec!(10), 40),
    (dec!(20), 30),
    (dec!(30), 20),
    (dec!(40), 10),
];

/// Building age difference bands (inclusive upper bound in years, points).
pub const AGE_PROXIMITY_BANDS: [(u32, u8); 3] = [(2, 30), (5, 20), (10, 10)];

pub const SAME_NEIGHBORHOOD_BONUS: u8 = 20;
pub const SAME_PROPERTY_TYPE_BONUS: u8 = 10;

/// Candidates scoring below this are not comparables.
pub const MIN_SIMILARITY_SCORE: u8 = 50;

pub const MAX_COMPARABLES: usize = 10;

// ---------------------------------------------------------------------------
// Price estimation
// ---------------------------------------------------------------------------

pub const NEIGHBORHOOD_WEIGHT: Decimal = dec!(0.6);
pub const DISTRICT_WEIGHT: Decimal = dec!(0.4);

pub const NEW_BUILDING_FACTOR: Decimal = dec!(1.15);
pub const UNDER_5_YEARS_FACTOR: Decimal = dec!(1.10);
pub const UNDER_10_YEARS_FACTOR: Decimal = dec!(1.05);
pub const OVER_30_YEARS_FACTOR: Decimal = dec!(0.90);
pub const OVER_20_YEARS_FACTOR: Decimal = dec!(0.95);

pub const OVER_200_SQM_FACTOR: Decimal = dec!(0.90);
pub const OVER_150_SQM_FACTOR: Decimal = dec!(0.95);
pub const UNDER_80_SQM_FACTOR: Decimal = dec!(1.05);

pub const NEUTRAL_FACTOR: Decimal = Decimal::ONE;

/// Half-width of the price range as a fraction of the estimate.
pub const PRICE_RANGE_FACTOR: Decimal = dec!(0.10);
/// Half-width used when fewer than `WIDE_RANGE_COMPARABLE_THRESHOLD`
/// comparables support the estimate.
pub const WIDE_PRICE_RANGE_FACTOR: Decimal = dec!(0.15);
pub const WIDE_RANGE_COMPARABLE_THRESHOLD: usize = 5;

// ---------------------------------------------------------------------------
// Confidence scoring
// ---------------------------------------------------------------------------

pub const SAMPLE_SIZE_CAP: usize = 10;
pub const SAMPLE_SIZE_POINTS: Decimal = dec!(4);

pub const AREA_DEPTH_CAP: usize = 50;
pub const AREA_DEPTH_POINTS: Decimal = dec!(0.6);

pub const PRICE_CONSISTENCY_POINTS: Decimal = dec!(30);

pub const MIN_CONFIDENCE: i64 = 0;
pub const MAX_CONFIDENCE: i64 = 100;
