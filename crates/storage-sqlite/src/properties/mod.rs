//! SQLite storage for listings and price history.

mod model;
mod repository;

pub use model::{AreaSampleDB, PriceHistoryDB, PropertyDB};
pub use repository::PropertyRepository;
