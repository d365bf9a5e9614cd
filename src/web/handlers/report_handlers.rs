// src/web/handlers/report_handlers.rs
use crate::core::{ConfigManager, FsOps};
use crate::llm::{LlmClient, ReportGenerator};
use crate::session::SessionStore;
use crate::web::types::{
    parse_session_id, DataResponse, ReportData, ReportRequest, StandardErrorResponse, TextDownload,
};
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

fn posting_not_found(session_id: &str, number: usize) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        format!("Posting {} not found", number),
        "POSTING_NOT_FOUND".to_string(),
        vec!["Run a job search and pick one of the listed postings".to_string()],
        Some(session_id.to_string()),
    ))
}

pub async fn generate_report_handler(
    session_id: &str,
    number: usize,
    request: Option<Json<ReportRequest>>,
    config: &State<ConfigManager>,
    sessions: &State<SessionStore>,
) -> Result<Json<DataResponse<ReportData>>, Json<StandardErrorResponse>> {
    let id = parse_session_id(session_id).map_err(Json)?;
    let session = sessions
        .get(&id)
        .await
        .ok_or_else(|| Json(StandardErrorResponse::session_not_found(session_id)))?;
    let posting = session
        .posting(number)
        .cloned()
        .ok_or_else(|| posting_not_found(session_id, number))?;

    let request = request.map(Json::into_inner).unwrap_or_default();

    let model = LlmClient::new(&config.llm).map_err(|e| {
        error!("Language model configuration error: {:#}", e);
        Json(StandardErrorResponse::new(
            "Language model is not configured".to_string(),
            "SERVICE_CONFIG_ERROR".to_string(),
            vec!["Set AZURE_OPENAI_ENDPOINT and AZURE_OPENAI_API_KEY".to_string()],
            Some(session_id.to_string()),
        ))
    })?;
    let generator = ReportGenerator::new(model);
    let profile = session.candidate.report_profile();

    info!("Generating report for posting {} of session {}", number, id);
    let result = if request.simple {
        generator.simple_report(&posting.body, &profile).await
    } else {
        generator
            .preparation_report(
                &posting.body,
                &profile,
                request.system_instructions.as_deref(),
            )
            .await
    };

    let report = result.map_err(|e| {
        error!("Report generation failed: {:#}", e);
        Json(StandardErrorResponse::new(
            format!("Erro ao gerar o relatório: {}", e),
            "REPORT_ERROR".to_string(),
            vec!["Por favor, tente novamente mais tarde.".to_string()],
            Some(session_id.to_string()),
        ))
    })?;

    let file_name = FsOps::report_file_name(number);
    let path = config.reports_dir(session_id).join(&file_name);
    if let Err(e) = FsOps::write_file_safe(&path, &report).await {
        warn!("Could not keep a copy of the report: {:#}", e);
    }

    sessions
        .store_report(&id, number, report.clone())
        .await
        .ok_or_else(|| posting_not_found(session_id, number))?;

    Ok(Json(DataResponse::success(
        "Relatório gerado com sucesso!".to_string(),
        ReportData {
            session_id: id,
            posting: number,
            title: posting.title,
            report,
            file_name,
        },
        Some(session_id.to_string()),
    )))
}

pub async fn download_report_handler(
    session_id: &str,
    number: usize,
    sessions: &State<SessionStore>,
) -> Result<TextDownload, Json<StandardErrorResponse>> {
    let id = parse_session_id(session_id).map_err(Json)?;
    let content = sessions.report(&id, number).await.ok_or_else(|| {
        Json(StandardErrorResponse::new(
            format!("No report generated for posting {}", number),
            "REPORT_NOT_FOUND".to_string(),
            vec!["Generate the report before downloading it".to_string()],
            Some(session_id.to_string()),
        ))
    })?;

    Ok(TextDownload {
        content,
        filename: FsOps::report_file_name(number),
    })
}
