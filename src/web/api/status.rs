use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub message: String,
    pub model_loaded: bool,
}

#[utoipa::path(
    get,
    path = "/api/status",
    tag = "status",
    responses(
        (status = 200, description = "Service is up", body = StatusResponse)
    )
)]
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Satellite tracker running".to_string(),
        model_loaded: state.classifier.is_loaded(),
    })
}
