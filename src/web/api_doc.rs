use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::satellites::{
    AddSatelliteResponse, AnomalyCheckResponse, DeleteResponse, RiskTimelineResponse,
    SatelliteSummary,
};
use super::api::status::StatusResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::status::status,
        super::api::satellites::add_satellite,
        super::api::satellites::list_satellites,
        super::api::satellites::get_position,
        super::api::satellites::check_anomaly,
        super::api::satellites::get_risk_timeline,
        super::api::satellites::delete_satellite,
        super::api::export::export_csv,
    ),
    components(
        schemas(
            StatusResponse,
            AddSatelliteResponse,
            SatelliteSummary,
            AnomalyCheckResponse,
            RiskTimelineResponse,
            DeleteResponse,
            ErrorResponse,
            crate::store::SatelliteRecord,
            crate::store::SatelliteStatus,
            crate::report::SatelliteSnapshot,
            crate::report::DecayListing,
            crate::report::PositionReport,
            crate::orbit::DecayStatus,
            crate::orbit::RiskPoint,
            crate::anomaly::AnomalyStatus,
            crate::anomaly::AnomalyVerdict,
            crate::anomaly::OrbitalFeatures,
        )
    ),
    info(
        title = "satwatch API",
        description = "Satellite tracking, decay estimation and orbital anomaly checks",
        version = "0.1.0"
    ),
    tags(
        (name = "status", description = "Service status"),
        (name = "satellites", description = "Satellite records and derived data")
    )
)]
pub struct ApiDoc;
