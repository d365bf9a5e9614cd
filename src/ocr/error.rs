use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    /// Recognizer output that breaks the geometry contract.
    #[error("Invalid recognition input: {0}")]
    InvalidInput(String),

    #[error("Recognition failed with status: {status}")]
    RecognitionFailed { status: String },

    #[error("Recognition still pending after {attempts} polls")]
    Timeout { attempts: u32 },

    #[error("Recognition service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode recognition response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl OcrError {
    /// Error code used in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "OCR_INVALID_INPUT",
            Self::RecognitionFailed { .. } => "OCR_FAILED",
            Self::Timeout { .. } => "OCR_TIMEOUT",
            Self::Http(_) => "OCR_SERVICE_ERROR",
            Self::Decode(_) => "OCR_DECODE_ERROR",
        }
    }
}
