use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};

use crate::report::{write_csv, PositionReport};
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::state::AppState;

#[utoipa::path(
    get,
    path = "/api/satellite/export.csv",
    tag = "satellites",
    responses(
        (status = 200, description = "Position report for every satellite", content_type = "text/csv", body = String)
    )
)]
pub async fn export_csv(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let now = state.clock.now();
    let reports: Vec<PositionReport> = state
        .store
        .find_all()?
        .iter()
        .map(|sat| {
            let record = &sat.record;
            PositionReport::compute(
                &record.name,
                record.norad_id,
                &record.tle_line1,
                &record.tle_line2,
                now,
            )
        })
        .collect();

    let mut body = Vec::new();
    write_csv(&reports, &mut body).map_err(|e| ApiError::Export(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"satellites.csv\"",
            ),
        ],
        body,
    ))
}
