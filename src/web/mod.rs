// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::core::ConfigManager;
use crate::session::SessionStore;
use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, delete, get, options, post, routes, Config, Request, Response, State};
use tracing::{info, info_span, Instrument};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[post("/candidates", data = "<upload>")]
pub async fn create_candidate(
    upload: Form<CandidateUpload<'_>>,
    config: &State<ConfigManager>,
    sessions: &State<SessionStore>,
) -> Result<Json<DataResponse<SessionData>>, Json<StandardErrorResponse>> {
    handlers::create_candidate_handler(upload, config, sessions)
        .instrument(info_span!("candidate_registration"))
        .await
}

#[get("/sessions/<session_id>")]
pub async fn get_session(
    session_id: &str,
    sessions: &State<SessionStore>,
) -> Result<Json<DataResponse<SessionData>>, Json<StandardErrorResponse>> {
    handlers::get_session_handler(session_id, sessions).await
}

#[delete("/sessions/<session_id>")]
pub async fn delete_session(
    session_id: &str,
    sessions: &State<SessionStore>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::delete_session_handler(session_id, sessions).await
}

#[post("/sessions/<session_id>/search")]
pub async fn search_jobs(
    session_id: &str,
    config: &State<ConfigManager>,
    sessions: &State<SessionStore>,
) -> Result<Json<DataResponse<SearchData>>, Json<StandardErrorResponse>> {
    handlers::search_jobs_handler(session_id, config, sessions)
        .instrument(info_span!("job_search", session_id = %session_id))
        .await
}

#[delete("/sessions/<session_id>/results")]
pub async fn clear_results(
    session_id: &str,
    sessions: &State<SessionStore>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::clear_results_handler(session_id, sessions).await
}

#[post("/sessions/<session_id>/postings/<number>/report", data = "<request>")]
pub async fn generate_report(
    session_id: &str,
    number: usize,
    request: Option<Json<ReportRequest>>,
    config: &State<ConfigManager>,
    sessions: &State<SessionStore>,
) -> Result<Json<DataResponse<ReportData>>, Json<StandardErrorResponse>> {
    handlers::generate_report_handler(session_id, number, request, config, sessions)
        .instrument(info_span!("report_generation", session_id = %session_id, posting = number))
        .await
}

#[get("/sessions/<session_id>/postings/<number>/report")]
pub async fn download_report(
    session_id: &str,
    number: usize,
    sessions: &State<SessionStore>,
) -> Result<TextDownload, Json<StandardErrorResponse>> {
    handlers::download_report_handler(session_id, number, sessions).await
}

#[get("/health")]
pub async fn health(
    config: &State<ConfigManager>,
    sessions: &State<SessionStore>,
) -> Json<DataResponse<HealthData>> {
    handlers::health_handler(config, sessions).await
}

#[get("/form-options")]
pub async fn form_options(config: &State<ConfigManager>) -> Json<DataResponse<FormOptionsData>> {
    handlers::form_options_handler(config).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(404)]
pub fn not_found(request: &Request<'_>) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        format!("No route for {} {}", request.method(), request.uri()),
        "NOT_FOUND".to_string(),
        vec!["Check the endpoint path".to_string()],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
        None,
    ))
}

pub fn build_rocket(config: ConfigManager) -> rocket::Rocket<rocket::Build> {
    // Multipart bodies carry the résumé plus the other fields.
    let upload_limit = (config.server.max_upload_mb * 2).max(1);
    let limits = Limits::default()
        .limit("file", upload_limit.mebibytes())
        .limit("data-form", (upload_limit + 1).mebibytes());

    let sessions = SessionStore::with_ttl(chrono::Duration::minutes(config.server.session_ttl_minutes));

    let figment = Config::figment()
        .merge(("port", config.server.port))
        .merge(("address", "0.0.0.0"))
        .merge(("limits", limits));

    rocket::custom(figment)
        .attach(Cors)
        .manage(config)
        .manage(sessions)
        .register("/api", catchers![bad_request, not_found, internal_error])
        .mount(
            "/api",
            routes![
                create_candidate,
                get_session,
                delete_session,
                search_jobs,
                clear_results,
                generate_report,
                download_report,
                health,
                form_options,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    config.ensure_directories().await?;

    info!("Starting job preparation API server");
    info!("Reports: {}", config.environment.output_path.display());
    info!("Server: http://0.0.0.0:{}", config.server.port);

    let _rocket = build_rocket(config)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;

    Ok(())
}
