// src/web/handlers/system_handlers.rs
use crate::core::ConfigManager;
use crate::session::SessionStore;
use crate::web::types::{DataResponse, FormOptionsData, HealthData};
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

pub async fn health_handler(
    config: &State<ConfigManager>,
    sessions: &State<SessionStore>,
) -> Json<DataResponse<HealthData>> {
    let data = HealthData {
        status: "OK",
        sessions: sessions.len().await,
        ocr_configured: config.ocr.api_key.is_some() && !config.ocr.endpoint.is_empty(),
        llm_configured: config.llm.api_key.is_some() && !config.llm.endpoint.is_empty(),
    };

    info!("Health check: {} active session(s)", data.sessions);
    Json(DataResponse::success("OK".to_string(), data, None))
}

pub async fn form_options_handler(config: &State<ConfigManager>) -> Json<DataResponse<FormOptionsData>> {
    Json(DataResponse::success(
        "Registration form options".to_string(),
        FormOptionsData::new(config.server.max_upload_mb),
        None,
    ))
}
