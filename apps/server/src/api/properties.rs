use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use emlak_core::properties::PropertyFilter;

use crate::{
    error::{ApiResult, ErrorBody},
    main_lib::AppState,
    models::{ImportListingsRequest, ImportSummary, PriceHistoryPoint, PropertyListing},
};

#[utoipa::path(
    get,
    path = "/api/v1/properties",
    params(
        ("city" = Option<String>, Query, description = "City"),
        ("district" = Option<String>, Query, description = "District"),
        ("minPrice" = Option<f64>, Query, description = "Minimum price"),
        ("maxPrice" = Option<f64>, Query, description = "Maximum price"),
        ("minSize" = Option<f64>, Query, description = "Minimum area"),
        ("maxSize" = Option<f64>, Query, description = "Maximum area"),
        ("propertyType" = Option<String>, Query, description = "Property type"),
        ("limit" = Option<i64>, Query, description = "Page size, 100 by default and at most 500")
    ),
    responses((status = 200, description = "Newest listings first", body = [PropertyListing]))
)]
pub async fn list_properties(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<PropertyFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<PropertyListing>>> {
    let Query(filter) = filter?;
    let listings = state.property_service.list_properties(filter)?;
    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}",
    params(("id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Listing", body = PropertyListing),
        (status = 404, description = "Unknown listing", body = ErrorBody)
    )
)]
pub async fn get_property(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<PropertyListing>> {
    let listing = state.property_service.get_property(&id)?;
    Ok(Json(listing.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/price-history",
    params(("id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Newest change first", body = [PriceHistoryPoint]),
        (status = 404, description = "Unknown listing", body = ErrorBody)
    )
)]
pub async fn get_price_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<PriceHistoryPoint>>> {
    let history = state.property_service.get_price_history(&id)?;
    Ok(Json(history.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/properties/import",
    request_body = ImportListingsRequest,
    responses(
        (status = 200, description = "Import outcome", body = ImportSummary),
        (status = 400, description = "Malformed body", body = ErrorBody)
    )
)]
pub async fn import_properties(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ImportListingsRequest>, JsonRejection>,
) -> ApiResult<Json<ImportSummary>> {
    let Json(request) = body?;
    let summary = state
        .property_service
        .import_listings(request.listings.into_iter().map(Into::into).collect())
        .await?;
    Ok(Json(summary.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/properties", get(list_properties))
        .route("/properties/import", post(import_properties))
        .route("/properties/{id}", get(get_property))
        .route("/properties/{id}/price-history", get(get_price_history))
}
