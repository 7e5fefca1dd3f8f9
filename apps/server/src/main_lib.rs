use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use emlak_core::properties::{PropertyService, PropertyServiceTrait};
use emlak_core::valuation::{ValuationService, ValuationServiceTrait};
use emlak_storage_sqlite::{self as storage, PropertyRepository};

use crate::config::{Config, LogFormat};

pub struct AppState {
    pub property_service: Arc<dyn PropertyServiceTrait + Send + Sync>,
    pub valuation_service: Arc<dyn ValuationServiceTrait + Send + Sync>,
}

/// Installs the global subscriber. `log` records from the library crates are
/// forwarded to it.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = storage::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = storage::create_pool(&db_path)?;
    storage::run_migrations(&pool)?;
    let writer = storage::spawn_writer((*pool).clone());

    let property_repository = Arc::new(PropertyRepository::new(pool.clone(), writer.clone()));
    let property_service = Arc::new(PropertyService::new(property_repository.clone()));
    let valuation_service = Arc::new(ValuationService::new(property_repository));

    Ok(Arc::new(AppState {
        property_service,
        valuation_service,
    }))
}
