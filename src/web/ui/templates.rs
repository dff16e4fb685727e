use askama::Template;
use askama_web::WebTemplate;

use crate::report::PositionReport;

const NOT_AVAILABLE: &str = "N/A";

/// One table row, already formatted for display.
pub struct DashboardRow {
    pub id: String,
    pub name: String,
    pub norad_id: u32,
    pub position: String,
    pub altitude: String,
    pub epoch: String,
    pub lifetime: String,
    pub decay_status: String,
}

impl DashboardRow {
    pub fn new(id: String, report: &PositionReport) -> Self {
        let position = match (report.latitude, report.longitude) {
            (Some(lat), Some(lon)) => format!("{:.2}, {:.2}", lat, lon),
            _ => NOT_AVAILABLE.to_string(),
        };

        Self {
            id,
            name: report.name.clone(),
            norad_id: report.norad_id,
            position,
            altitude: display_or_na(report.altitude_km.map(|a| format!("{:.2} km", a))),
            epoch: display_or_na(report.epoch.clone()),
            lifetime: display_or_na(report.lifetime_days.map(|l| format!("{:.2} days", l))),
            decay_status: report.decay_status.to_string(),
        }
    }
}

fn display_or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub rows: Vec<DashboardRow>,
    pub model_loaded: bool,
    pub generated_at: String,
}
