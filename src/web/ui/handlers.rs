use axum::{extract::State, response::IntoResponse};

use crate::report::{PositionReport, TIMESTAMP_FORMAT};
use crate::web::api::error::ApiResult;
use crate::web::state::AppState;

use super::templates::{DashboardRow, DashboardTemplate};

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let now = state.clock.now();
    let rows = state
        .store
        .find_all()?
        .into_iter()
        .map(|sat| {
            let record = &sat.record;
            let report = PositionReport::compute(
                &record.name,
                record.norad_id,
                &record.tle_line1,
                &record.tle_line2,
                now,
            );
            DashboardRow::new(sat.id.to_string(), &report)
        })
        .collect();

    Ok(DashboardTemplate {
        rows,
        model_loaded: state.classifier.is_loaded(),
        generated_at: now.format(TIMESTAMP_FORMAT).to_string(),
    })
}
