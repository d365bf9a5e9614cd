// src/web/handlers/candidate_handlers.rs
//! Candidate registration: validation, résumé OCR and LinkedIn scrape

use crate::candidate::ResumeUpload;
use crate::core::{ConfigManager, FsOps};
use crate::linkedin::ProfileScraper;
use crate::ocr::ReadClient;
use crate::session::SessionStore;
use crate::web::types::{CandidateUpload, DataResponse, SessionData, StandardErrorResponse};
use anyhow::Context;
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

pub async fn create_candidate_handler(
    mut upload: Form<CandidateUpload<'_>>,
    config: &State<ConfigManager>,
    sessions: &State<SessionStore>,
) -> Result<Json<DataResponse<SessionData>>, Json<StandardErrorResponse>> {
    let resume = match upload.resume.as_mut() {
        Some(file) => match read_resume(file).await {
            Ok(resume) => Some(resume),
            Err(e) => {
                error!("Failed to read uploaded résumé: {:#}", e);
                return Err(Json(StandardErrorResponse::new(
                    "Failed to process uploaded file".to_string(),
                    "FILE_SAVE_ERROR".to_string(),
                    vec!["Try uploading the file again".to_string()],
                    None,
                )));
            }
        },
        None => None,
    };

    let form = upload.to_form(resume);
    let errors = form.validate(config.server.max_upload_mb);
    if !errors.is_empty() {
        info!("Candidate form rejected: {}", errors.join("; "));
        return Err(Json(StandardErrorResponse::new(
            format!("Corrija os campos: {}", errors.join("; ")),
            "VALIDATION_ERROR".to_string(),
            errors,
            None,
        )));
    }

    let resume_bytes = form
        .resume
        .as_ref()
        .map(|r| r.content.clone())
        .unwrap_or_default();

    if let Err(e) = FsOps::validate_pdf(&resume_bytes) {
        return Err(Json(StandardErrorResponse::new(
            e.to_string(),
            "INVALID_FORMAT".to_string(),
            vec!["Upload the résumé as a PDF file (.pdf)".to_string()],
            None,
        )));
    }

    let ocr = ReadClient::new(&config.ocr).map_err(|e| {
        error!("OCR client configuration error: {:#}", e);
        Json(StandardErrorResponse::new(
            "Text recognition service is not configured".to_string(),
            "SERVICE_CONFIG_ERROR".to_string(),
            vec!["Set AZURE_COMPUTER_VISION_ENDPOINT and AZURE_COMPUTER_VISION_API_KEY".to_string()],
            None,
        ))
    })?;

    let resume_text = ocr.extract_text(resume_bytes).await.map_err(|e| {
        error!("Résumé text recognition failed: {}", e);
        Json(StandardErrorResponse::new(
            format!("Failed to read the résumé: {}", e),
            e.code().to_string(),
            vec![
                "Ensure the PDF has readable text".to_string(),
                "Try again in a few moments".to_string(),
            ],
            None,
        ))
    })?;

    let linkedin_text = linkedin_profile_text(config, &form.linkedin_url).await;

    let profile = form.into_profile(resume_text, linkedin_text);
    let session = sessions.create(profile).await;

    info!(
        "Candidate {} registered with session {}",
        session.candidate.name, session.id
    );

    let session_id = session.id.to_string();
    Ok(Json(
        DataResponse::success(
            "Dados coletados com sucesso!".to_string(),
            SessionData::from(session),
            Some(session_id),
        ),
    ))
}

async fn read_resume(file: &mut TempFile<'_>) -> anyhow::Result<ResumeUpload> {
    let file_name = file
        .raw_name()
        .and_then(|n| n.as_str())
        .map(|stem| format!("{}.pdf", stem))
        .unwrap_or_else(|| "curriculo.pdf".to_string());

    let temp_path = FsOps::temp_upload_path("resume_upload");
    file.persist_to(&temp_path)
        .await
        .context("Failed to save uploaded file")?;

    let content = FsOps::read_bytes(&temp_path).await;
    FsOps::remove_file_quiet(&temp_path).await;

    Ok(ResumeUpload {
        file_name,
        content: content?,
    })
}

/// LinkedIn text, or a marker explaining why it is missing.
async fn linkedin_profile_text(config: &ConfigManager, url: &str) -> String {
    let result = match ProfileScraper::new(&config.scraper) {
        Ok(scraper) => scraper.get_profile_text(url).await,
        Err(e) => Err(e),
    };

    result.unwrap_or_else(|e| {
        warn!("LinkedIn profile unavailable for {}: {:#}", url, e);
        format!("LinkedIn data unavailable: {}", e)
    })
}
