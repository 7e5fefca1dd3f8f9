/// Currency assumed for imported listings that do not state one
pub const DEFAULT_CURRENCY: &str = "TL";

/// Default number of listings returned by a listing query
pub const DEFAULT_LISTING_LIMIT: i64 = 100;

/// Upper bound on the number of listings returned by a listing query
pub const MAX_LISTING_LIMIT: i64 = 500;
