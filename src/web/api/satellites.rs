use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::anomaly::{AnomalyVerdict, OrbitalFeatures};
use crate::orbit::{risk_timeline, RiskPoint};
use crate::report::{DecayListing, PositionReport, SatelliteSnapshot};
use crate::store::{SatelliteId, SatelliteRecord, StoredSatellite};
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::state::AppState;

const TLE_LINE_LENGTH: usize = 69;

#[derive(Debug, Serialize, ToSchema)]
pub struct AddSatelliteResponse {
    pub message: String,
    pub id: String,
    pub snapshot: SatelliteSnapshot,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SatelliteSummary {
    pub id: String,
    #[serde(flatten)]
    pub record: SatelliteRecord,
    #[serde(flatten)]
    pub decay: DecayListing,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnomalyCheckResponse {
    pub satellite: String,
    pub norad_id: u32,
    #[serde(flatten)]
    pub verdict: AnomalyVerdict,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RiskTimelineResponse {
    pub name: String,
    pub norad_id: u32,
    pub altitude_km: Option<f64>,
    pub lifetime_days: Option<f64>,
    /// Empty when either altitude or lifetime is unavailable.
    pub points: Vec<RiskPoint>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
}

fn validate(record: &mut SatelliteRecord) -> Result<(), ApiError> {
    if record.name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }

    for (number, line) in [("1", &mut record.tle_line1), ("2", &mut record.tle_line2)] {
        let trimmed = line.trim();
        if trimmed.chars().count() != TLE_LINE_LENGTH {
            return Err(ApiError::Validation(format!(
                "tle_line{} must be {} characters, got {}",
                number,
                TLE_LINE_LENGTH,
                trimmed.chars().count()
            )));
        }
        if !trimmed.starts_with(&format!("{} ", number)) {
            return Err(ApiError::Validation(format!(
                "tle_line{} must start with \"{} \"",
                number, number
            )));
        }
        *line = trimmed.to_string();
    }
    Ok(())
}

fn find(state: &AppState, id: &str) -> ApiResult<StoredSatellite> {
    let id: SatelliteId = id.parse()?;
    state.store.find_by_id(&id)?.ok_or(ApiError::NotFound)
}

#[utoipa::path(
    post,
    path = "/api/satellite/add",
    tag = "satellites",
    request_body = SatelliteRecord,
    responses(
        (status = 201, description = "Satellite stored", body = AddSatelliteResponse),
        (status = 400, description = "Invalid satellite", body = super::error::ErrorResponse)
    )
)]
pub async fn add_satellite(
    State(state): State<AppState>,
    body: String,
) -> ApiResult<impl IntoResponse> {
    let mut record: SatelliteRecord =
        serde_json::from_str(&body).map_err(|e| ApiError::Validation(e.to_string()))?;
    validate(&mut record)?;

    let snapshot = SatelliteSnapshot::compute(
        &record.tle_line1,
        &record.tle_line2,
        state.clock.now(),
    );
    let name = record.name.clone();
    let id = state.store.insert(record)?;
    log::info!("Added satellite {} as {}", name, id);

    Ok((
        StatusCode::CREATED,
        Json(AddSatelliteResponse {
            message: "Satellite added".to_string(),
            id: id.to_string(),
            snapshot,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/satellite/all",
    tag = "satellites",
    responses(
        (status = 200, description = "All satellites with decay estimates", body = Vec<SatelliteSummary>)
    )
)]
pub async fn list_satellites(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let now = state.clock.now();
    let summaries: Vec<SatelliteSummary> = state
        .store
        .find_all()?
        .into_iter()
        .map(|sat| {
            let decay = DecayListing::compute(&sat.record.tle_line1, now);
            SatelliteSummary {
                id: sat.id.to_string(),
                record: sat.record,
                decay,
            }
        })
        .collect();

    Ok(Json(summaries))
}

#[utoipa::path(
    get,
    path = "/api/satellite/position/{id}",
    tag = "satellites",
    params(("id" = String, Path, description = "Satellite ID")),
    responses(
        (status = 200, description = "Live position", body = PositionReport),
        (status = 400, description = "Malformed ID", body = super::error::ErrorResponse),
        (status = 404, description = "Satellite not found", body = super::error::ErrorResponse)
    )
)]
pub async fn get_position(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let sat = find(&state, &id)?;
    let record = &sat.record;

    Ok(Json(PositionReport::compute(
        &record.name,
        record.norad_id,
        &record.tle_line1,
        &record.tle_line2,
        state.clock.now(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/satellite/anomaly-check/{id}",
    tag = "satellites",
    params(("id" = String, Path, description = "Satellite ID")),
    responses(
        (status = 200, description = "Anomaly verdict", body = AnomalyCheckResponse),
        (status = 400, description = "Malformed ID", body = super::error::ErrorResponse),
        (status = 404, description = "Satellite not found", body = super::error::ErrorResponse),
        (status = 500, description = "Features could not be computed", body = super::error::ErrorResponse),
        (status = 503, description = "No anomaly model loaded", body = super::error::ErrorResponse)
    )
)]
pub async fn check_anomaly(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let sat = find(&state, &id)?;
    let features = OrbitalFeatures::from_record(&sat.record);
    let verdict = state.classifier.classify(&features)?;

    Ok(Json(AnomalyCheckResponse {
        satellite: sat.record.name,
        norad_id: sat.record.norad_id,
        verdict,
    }))
}

#[utoipa::path(
    get,
    path = "/api/satellite/risk-timeline/{id}",
    tag = "satellites",
    params(("id" = String, Path, description = "Satellite ID")),
    responses(
        (status = 200, description = "Projected altitude decay", body = RiskTimelineResponse),
        (status = 400, description = "Malformed ID", body = super::error::ErrorResponse),
        (status = 404, description = "Satellite not found", body = super::error::ErrorResponse)
    )
)]
pub async fn get_risk_timeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let sat = find(&state, &id)?;
    let record = sat.record;
    let report = PositionReport::compute(
        &record.name,
        record.norad_id,
        &record.tle_line1,
        &record.tle_line2,
        state.clock.now(),
    );

    let points = report
        .altitude_km
        .zip(report.lifetime_days)
        .and_then(|(altitude, lifetime)| risk_timeline(altitude, lifetime))
        .unwrap_or_default();

    Ok(Json(RiskTimelineResponse {
        name: record.name,
        norad_id: record.norad_id,
        altitude_km: report.altitude_km,
        lifetime_days: report.lifetime_days,
        points,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/satellite/delete/{id}",
    tag = "satellites",
    params(("id" = String, Path, description = "Satellite ID")),
    responses(
        (status = 200, description = "Satellite deleted", body = DeleteResponse),
        (status = 400, description = "Malformed ID", body = super::error::ErrorResponse),
        (status = 404, description = "Satellite not found", body = super::error::ErrorResponse)
    )
)]
pub async fn delete_satellite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: SatelliteId = id.parse()?;
    if state.store.delete_by_id(&id)? == 0 {
        return Err(ApiError::NotFound);
    }
    log::info!("Deleted satellite {}", id);

    Ok(Json(DeleteResponse {
        message: "Satellite deleted".to_string(),
    }))
}
