use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    error::{ApiError, ApiResult, ErrorBody},
    main_lib::AppState,
    models::{AreaSummary, ValuationRequest, ValuationResponse},
};

#[utoipa::path(
    post,
    path = "/api/v1/valuation/estimate",
    request_body = ValuationRequest,
    responses(
        (status = 200, description = "Estimated price", body = ValuationResponse),
        (status = 400, description = "Malformed query", body = ErrorBody),
        (status = 422, description = "Not enough market data", body = ErrorBody),
        (status = 500, description = "Data store failure", body = ErrorBody)
    )
)]
pub async fn estimate_valuation(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ValuationRequest>, JsonRejection>,
) -> ApiResult<Json<ValuationResponse>> {
    let Json(request) = body?;
    let result = state.valuation_service.estimate(request.into()).await?;
    Ok(Json(result.into()))
}

#[derive(Deserialize, Debug)]
pub struct AreaStatisticsQuery {
    city: String,
    district: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/area-statistics",
    params(
        ("city" = String, Query, description = "City"),
        ("district" = Option<String>, Query, description = "District")
    ),
    responses((status = 200, description = "Per-neighborhood summaries", body = [AreaSummary]))
)]
pub async fn list_area_statistics(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AreaStatisticsQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<Json<Vec<AreaSummary>>> {
    let Query(query) = query?;
    if query.city.trim().is_empty() {
        return Err(ApiError::BadRequest("city is required".to_string()));
    }
    let summaries = state
        .valuation_service
        .list_area_summaries(&query.city, query.district.as_deref())
        .await?;
    Ok(Json(summaries.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/valuation/estimate", post(estimate_valuation))
        .route("/area-statistics", get(list_area_statistics))
}
