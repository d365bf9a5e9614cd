// src/web/types.rs
use crate::candidate::{
    CandidateForm, CandidateProfile, ResumeUpload, AREA_OPTIONS, OTHER_OPTION, SECTOR_OPTIONS,
};
use crate::postings::Posting;
use crate::session::Session;
use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::ContentType;
use rocket::response::{self, Responder};
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};
use uuid::Uuid;

/// Plain-text report offered as a file download.
pub struct TextDownload {
    pub content: String,
    pub filename: String,
}

impl<'r> Responder<'r, 'static> for TextDownload {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let bytes = self.content.into_bytes();
        Response::build()
            .header(ContentType::new("text", "plain").with_params(("charset", "utf-8")))
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            )
            .sized_body(bytes.len(), std::io::Cursor::new(bytes))
            .ok()
    }
}

/// Multipart registration form. Every field is optional here so that
/// validation can report all problems at once.
#[derive(FromForm)]
pub struct CandidateUpload<'f> {
    pub name: Option<String>,
    pub course: Option<String>,
    pub semester: Option<String>,
    pub areas: Vec<String>,
    pub other_area: Option<String>,
    pub sectors: Vec<String>,
    pub other_sector: Option<String>,
    pub resume: Option<TempFile<'f>>,
    pub linkedin_url: Option<String>,
    pub privacy_consent: bool,
}

impl CandidateUpload<'_> {
    pub fn to_form(&self, resume: Option<ResumeUpload>) -> CandidateForm {
        CandidateForm {
            name: self.name.clone().unwrap_or_default(),
            course: self.course.clone().unwrap_or_default(),
            semester: self.semester.clone().unwrap_or_default(),
            areas: self.areas.clone(),
            other_area: self.other_area.clone().unwrap_or_default(),
            sectors: self.sectors.clone(),
            other_sector: self.other_sector.clone().unwrap_or_default(),
            resume,
            linkedin_url: self.linkedin_url.clone().unwrap_or_default(),
            privacy_consent: self.privacy_consent,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(crate = "rocket::serde")]
pub struct ReportRequest {
    #[serde(default)]
    pub simple: bool,
    #[serde(default)]
    pub system_instructions: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SessionData {
    pub session_id: Uuid,
    pub candidate: CandidateProfile,
    pub postings: Vec<Posting>,
    pub reports: Vec<usize>,
    pub active_report: Option<usize>,
}

impl From<Session> for SessionData {
    fn from(session: Session) -> Self {
        Self {
            session_id: session.id,
            candidate: session.candidate,
            postings: session.postings,
            reports: session.reports.into_keys().collect(),
            active_report: session.active_report,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SearchData {
    pub session_id: Uuid,
    pub postings: Vec<Posting>,
    /// Set when the answer looked too short to hold postings.
    pub sparse: bool,
    pub raw_answer: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ReportData {
    pub session_id: Uuid,
    pub posting: usize,
    pub title: String,
    pub report: String,
    pub file_name: String,
}

/// Choices offered by the registration form.
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct FormOptionsData {
    pub areas: Vec<&'static str>,
    pub sectors: Vec<&'static str>,
    pub other_option: &'static str,
    pub max_upload_mb: u64,
}

impl FormOptionsData {
    pub fn new(max_upload_mb: u64) -> Self {
        Self {
            areas: AREA_OPTIONS.to_vec(),
            sectors: SECTOR_OPTIONS.to_vec(),
            other_option: OTHER_OPTION,
            max_upload_mb,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthData {
    pub status: &'static str,
    pub sessions: usize,
    pub ocr_configured: bool,
    pub llm_configured: bool,
}

// Standard response envelopes

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_format: Option<DisplayFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Data,
    Action,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DisplayFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<DisplaySection>>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DisplaySection {
    pub title: String,
    pub content: String,
}

impl DisplayFormat {
    /// One collapsible section per posting.
    pub fn postings(postings: &[Posting]) -> Self {
        Self {
            format_type: "sections".to_string(),
            sections: Some(
                postings
                    .iter()
                    .map(|p| DisplaySection {
                        title: p.title.clone(),
                        content: p.body.clone(),
                    })
                    .collect(),
            ),
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T, session_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
            display_format: None,
            session_id,
        }
    }

    pub fn with_display_format(mut self, display_format: DisplayFormat) -> Self {
        self.display_format = Some(display_format);
        self
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String, session_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
            next_actions: None,
            session_id,
        }
    }

    pub fn with_next_actions(mut self, next_actions: Vec<String>) -> Self {
        self.next_actions = Some(next_actions);
        self
    }
}

impl StandardErrorResponse {
    pub fn new(
        error: String,
        error_code: String,
        suggestions: Vec<String>,
        session_id: Option<String>,
    ) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
            session_id,
        }
    }

    pub fn session_not_found(session_id: &str) -> Self {
        Self::new(
            format!("Session not found: {}", session_id),
            "SESSION_NOT_FOUND".to_string(),
            vec!["Submit the candidate form again to start a new session".to_string()],
            Some(session_id.to_string()),
        )
    }
}

/// Session id from a route segment.
pub fn parse_session_id(raw: &str) -> Result<Uuid, StandardErrorResponse> {
    Uuid::parse_str(raw).map_err(|_| {
        StandardErrorResponse::new(
            format!("Invalid session id: {}", raw),
            "INVALID_SESSION_ID".to_string(),
            vec!["Use the session_id returned when the candidate form was submitted".to_string()],
            None,
        )
    })
}
