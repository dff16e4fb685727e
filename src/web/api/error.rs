use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::anomaly::AnomalyError;
use crate::store::StoreError;

#[derive(Debug)]
pub enum ApiError {
    InvalidId(String),
    Validation(String),
    NotFound,
    ModelUnavailable,
    AnomalyCheck(String),
    Storage(StoreError),
    Export(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidId(id) => ApiError::InvalidId(id),
            _ => ApiError::Storage(e),
        }
    }
}

impl From<AnomalyError> for ApiError {
    fn from(e: AnomalyError) -> Self {
        match e {
            AnomalyError::ModelUnavailable => ApiError::ModelUnavailable,
            AnomalyError::FeatureComputation { .. } => ApiError::AnomalyCheck(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidId(id) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message(
                    "invalid_id",
                    &format!("Invalid satellite ID format: {}", id),
                )),
            )
                .into_response(),
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message("validation_failed", &msg)),
            )
                .into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("satellite_not_found")),
            )
                .into_response(),
            ApiError::ModelUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::with_message(
                    "model_unavailable",
                    "Anomaly model not loaded",
                )),
            )
                .into_response(),
            ApiError::AnomalyCheck(msg) => {
                log::error!("Anomaly check failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::with_message("anomaly_check_failed", &msg)),
                )
                    .into_response()
            }
            ApiError::Storage(e) => {
                log::error!("Store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::with_message("storage_error", &e.to_string())),
                )
                    .into_response()
            }
            ApiError::Export(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_message("export_failed", &msg)),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
