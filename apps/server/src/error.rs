use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use emlak_core::errors::{DatabaseError, Error as CoreError};
use emlak_core::valuation::ValuationError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Error payload returned by every endpoint.
#[derive(Serialize, ToSchema, Debug)]
pub struct ErrorBody {
    pub code: u16,
    /// Machine-readable error kind, e.g. `insufficient_area_data`
    pub kind: String,
    pub message: String,
}

const DATA_STORE_MESSAGE: &str = "The data store is unavailable";

impl ApiError {
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Core(CoreError::Validation(_)) | ApiError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            ApiError::Core(CoreError::Valuation(ValuationError::InsufficientAreaData { .. })) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_area_data")
            }
            ApiError::Core(CoreError::Valuation(ValuationError::NoComparablesFound { .. })) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "no_comparables_found")
            }
            ApiError::Core(CoreError::Database(DatabaseError::NotFound(_))) => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            ApiError::Core(_) | ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "data_store_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.classify();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            DATA_STORE_MESSAGE.to_string()
        } else {
            self.to_string()
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            kind: kind.to_string(),
            message,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
