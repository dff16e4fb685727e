use axum::{routing::delete, routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::anomaly::AnomalyClassifier;
use crate::store::{FileStore, MemoryStore, SatelliteStore};

use super::api::export as export_handlers;
use super::api::satellites as satellite_handlers;
use super::api::status as status_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;
use super::state::AppState;
use super::ui::handlers as ui_handlers;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // UI routes
        .route("/", get(ui_handlers::dashboard))
        // Satellite API endpoints
        .route("/api/status", get(status_handlers::status))
        .route("/api/satellite/add", post(satellite_handlers::add_satellite))
        .route("/api/satellite/all", get(satellite_handlers::list_satellites))
        .route(
            "/api/satellite/position/{id}",
            get(satellite_handlers::get_position),
        )
        .route(
            "/api/satellite/anomaly-check/{id}",
            get(satellite_handlers::check_anomaly),
        )
        .route(
            "/api/satellite/risk-timeline/{id}",
            get(satellite_handlers::get_risk_timeline),
        )
        .route(
            "/api/satellite/delete/{id}",
            delete(satellite_handlers::delete_satellite),
        )
        .route("/api/satellite/export.csv", get(export_handlers::export_csv))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Store selected by the config: file-backed when a folder is set.
pub fn open_store(config: &Config) -> Arc<dyn SatelliteStore> {
    match &config.storage.base_folder {
        Some(folder) => {
            log::info!("Storing satellites in {}", folder.display());
            Arc::new(FileStore::new(folder.clone()))
        }
        None => {
            log::info!("No storage folder configured, keeping satellites in memory");
            Arc::new(MemoryStore::new())
        }
    }
}

/// Load the configured anomaly model. Without one the service still runs and
/// anomaly checks answer as unavailable.
pub fn load_classifier(config: &Config) -> AnomalyClassifier {
    let Some(path) = &config.anomaly.model_path else {
        log::warn!("No anomaly model configured");
        return AnomalyClassifier::unavailable();
    };

    match AnomalyClassifier::load(path) {
        Ok(classifier) => {
            log::info!("Loaded anomaly model from {}", path.display());
            classifier
        }
        Err(e) => {
            log::warn!("Failed to load anomaly model {}: {}", path.display(), e);
            AnomalyClassifier::unavailable()
        }
    }
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let state = AppState::new(open_store(&config), load_classifier(&config));
    let app = build_router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
