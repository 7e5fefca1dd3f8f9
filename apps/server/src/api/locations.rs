use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState, models::LocationOption};

#[derive(Deserialize, Debug)]
pub struct DistrictsQuery {
    city: String,
}

#[derive(Deserialize, Debug)]
pub struct NeighborhoodsQuery {
    city: String,
    district: String,
}

fn options(values: Vec<emlak_core::properties::LocationOption>) -> Json<Vec<LocationOption>> {
    Json(values.into_iter().map(Into::into).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/cities",
    responses((status = 200, description = "Cities with listings", body = [LocationOption]))
)]
pub async fn list_cities(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<LocationOption>>> {
    Ok(options(state.property_service.list_cities()?))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/districts",
    params(("city" = String, Query, description = "City")),
    responses((status = 200, description = "Districts of a city", body = [LocationOption]))
)]
pub async fn list_districts(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DistrictsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<LocationOption>>> {
    let Query(query) = query?;
    Ok(options(state.property_service.list_districts(&query.city)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/neighborhoods",
    params(
        ("city" = String, Query, description = "City"),
        ("district" = String, Query, description = "District")
    ),
    responses((status = 200, description = "Neighborhoods of a district", body = [LocationOption]))
)]
pub async fn list_neighborhoods(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NeighborhoodsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<LocationOption>>> {
    let Query(query) = query?;
    Ok(options(
        state
            .property_service
            .list_neighborhoods(&query.city, &query.district)?,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/locations/cities", get(list_cities))
        .route("/locations/districts", get(list_districts))
        .route("/locations/neighborhoods", get(list_neighborhoods))
}
