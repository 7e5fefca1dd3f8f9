use std::sync::Arc;

use anyhow::Context;
use axum::{http::HeaderValue, routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{config::Config, error::ErrorBody, main_lib::AppState, models};

pub mod locations;
pub mod properties;
pub mod valuation;

#[utoipa::path(get, path = "/api/v1/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

#[derive(OpenApi)]
#[openapi(
    paths(
        healthz,
        valuation::estimate_valuation,
        valuation::list_area_statistics,
        properties::list_properties,
        properties::get_property,
        properties::get_price_history,
        properties::import_properties,
        locations::list_cities,
        locations::list_districts,
        locations::list_neighborhoods
    ),
    components(schemas(
        ErrorBody,
        models::ValuationRequest,
        models::ValuationResponse,
        models::PriceRange,
        models::ComparableListing,
        models::AreaStatistics,
        models::EstimateBreakdown,
        models::AreaSummary,
        models::PropertyListing,
        models::PriceHistoryPoint,
        models::LocationOption,
        models::NewListing,
        models::ImportListingsRequest,
        models::ImportSummary
    )),
    tags((name = "emlak"))
)]
pub struct ApiDoc;

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    if config.cors_allow.iter().any(|o| o == "*") {
        return Ok(CorsLayer::new().allow_origin(Any).allow_headers(Any));
    }
    let origins = config
        .cors_allow
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin {}", o))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(CorsLayer::new().allow_origin(origins).allow_headers(Any))
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> anyhow::Result<Router> {
    let cors = cors_layer(config)?;
    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .route("/healthz", get(healthz))
        .merge(valuation::router())
        .merge(properties::router())
        .merge(locations::router());

    Ok(Router::new()
        .nest("/api/v1", api)
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http()))
}
