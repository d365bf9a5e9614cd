// src/web/handlers/job_handlers.rs
use crate::core::ConfigManager;
use crate::linkedin::{JobSearchTool, LinkedInJobScraper, QueryOptions};
use crate::llm::{JobSearchAgent, LlmClient};
use crate::postings::{is_sparse_response, parse_postings};
use crate::session::SessionStore;
use crate::web::types::{
    parse_session_id, ActionResponse, DataResponse, DisplayFormat, SearchData, SessionData,
    StandardErrorResponse,
};
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn get_session_handler(
    session_id: &str,
    sessions: &State<SessionStore>,
) -> Result<Json<DataResponse<SessionData>>, Json<StandardErrorResponse>> {
    let id = parse_session_id(session_id).map_err(Json)?;
    let session = sessions
        .get(&id)
        .await
        .ok_or_else(|| Json(StandardErrorResponse::session_not_found(session_id)))?;

    let display = DisplayFormat::postings(&session.postings);
    Ok(Json(
        DataResponse::success(
            format!("Session for {}", session.candidate.name),
            SessionData::from(session),
            Some(session_id.to_string()),
        )
        .with_display_format(display),
    ))
}

pub async fn search_jobs_handler(
    session_id: &str,
    config: &State<ConfigManager>,
    sessions: &State<SessionStore>,
) -> Result<Json<DataResponse<SearchData>>, Json<StandardErrorResponse>> {
    let id = parse_session_id(session_id).map_err(Json)?;
    let session = sessions
        .get(&id)
        .await
        .ok_or_else(|| Json(StandardErrorResponse::session_not_found(session_id)))?;

    let service_error = |e: anyhow::Error| {
        error!("Job search configuration error: {:#}", e);
        Json(StandardErrorResponse::new(
            "Job search services are not configured".to_string(),
            "SERVICE_CONFIG_ERROR".to_string(),
            vec!["Set AZURE_OPENAI_ENDPOINT and AZURE_OPENAI_API_KEY".to_string()],
            Some(session_id.to_string()),
        ))
    };

    let model = LlmClient::new(&config.llm).map_err(service_error)?;
    let scraper = LinkedInJobScraper::new(&config.scraper).map_err(service_error)?;
    let options = QueryOptions {
        locations: vec![config.scraper.default_location.clone()],
        limit: config.scraper.limit,
        ..QueryOptions::default()
    };
    let agent = JobSearchAgent::new(model, JobSearchTool::new(scraper, options));

    info!("Searching jobs for session {}", id);
    let reply = agent.run(&session.candidate.search_request()).await;

    let answer = match (reply.text, reply.error) {
        (Some(text), None) => text,
        (_, error) => {
            let error = error.unwrap_or_else(|| "empty answer".to_string());
            error!("Job search failed for session {}: {}", id, error);
            return Err(Json(StandardErrorResponse::new(
                format!("Erro ao buscar vagas: {}", error),
                "SEARCH_ERROR".to_string(),
                vec![
                    "Try again in a few moments".to_string(),
                    "Check the language model deployment".to_string(),
                ],
                Some(session_id.to_string()),
            )));
        }
    };

    let sparse = is_sparse_response(&answer);
    let postings = parse_postings(&answer);
    sessions
        .set_postings(&id, postings.clone())
        .await
        .ok_or_else(|| Json(StandardErrorResponse::session_not_found(session_id)))?;

    let display = DisplayFormat::postings(&postings);
    let message = if sparse {
        "A resposta não contém vagas suficientes".to_string()
    } else {
        format!("{} vaga(s) encontrada(s)", postings.len())
    };

    Ok(Json(
        DataResponse::success(
            message,
            SearchData {
                session_id: id,
                postings,
                sparse,
                raw_answer: answer,
            },
            Some(session_id.to_string()),
        )
        .with_display_format(display),
    ))
}

pub async fn clear_results_handler(
    session_id: &str,
    sessions: &State<SessionStore>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    let id = parse_session_id(session_id).map_err(Json)?;
    sessions
        .clear_results(&id)
        .await
        .ok_or_else(|| Json(StandardErrorResponse::session_not_found(session_id)))?;

    info!("Cleared results of session {}", id);
    Ok(Json(
        ActionResponse::success(
            "Results cleared, candidate data kept".to_string(),
            "cleared".to_string(),
            Some(session_id.to_string()),
        )
        .with_next_actions(vec!["Run a new job search".to_string()]),
    ))
}

pub async fn delete_session_handler(
    session_id: &str,
    sessions: &State<SessionStore>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    let id = parse_session_id(session_id).map_err(Json)?;
    sessions
        .remove(&id)
        .await
        .ok_or_else(|| Json(StandardErrorResponse::session_not_found(session_id)))?;

    info!("Deleted session {}", id);
    Ok(Json(ActionResponse::success(
        "Session deleted".to_string(),
        "deleted".to_string(),
        Some(session_id.to_string()),
    )))
}
