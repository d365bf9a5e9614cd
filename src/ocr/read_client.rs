// src/ocr/read_client.rs
//! Client for the cloud Read API: submit a document, poll until the
//! operation settles, then rebuild the text of every page.

use anyhow::Context;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::error::OcrError;
use super::layout::{reconstruct_document, reconstruct_pages, DEFAULT_VERTICAL_TOLERANCE};
use super::types::{OperationStatus, ReadOperationResult};
use crate::core::OcrConfig;

const ANALYZE_ENDPOINT: &str = "/vision/v3.2/read/analyze";
const RESULTS_ENDPOINT: &str = "/vision/v3.2/read/analyzeResults";
const SUBSCRIPTION_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "Operation-Location";

pub struct ReadClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    language: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl ReadClient {
    pub fn new(config: &OcrConfig) -> anyhow::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .context("AZURE_COMPUTER_VISION_API_KEY environment variable not set")?;

        if config.endpoint.is_empty() {
            anyhow::bail!("AZURE_COMPUTER_VISION_ENDPOINT environment variable not set");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            language: config.language.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_polls: config.max_polls.max(1),
        })
    }

    /// Whole-document transcript, pages separated by a newline
    pub async fn extract_text(&self, content: Vec<u8>) -> Result<String, OcrError> {
        let result = self.recognize(content).await?;
        document_from_result(result)
    }

    pub async fn page_transcripts(&self, content: Vec<u8>) -> Result<Vec<String>, OcrError> {
        let result = self.recognize(content).await?;
        transcripts_from_result(result)
    }

    /// Submit and wait for a settled operation. Any status other than
    /// `succeeded` is returned as `RecognitionFailed`.
    pub async fn recognize(&self, content: Vec<u8>) -> Result<ReadOperationResult, OcrError> {
        let operation_id = self.submit(content).await?;

        for attempt in 1..=self.max_polls {
            let result = self.get_read_result(&operation_id).await?;
            if !result.status.is_pending() {
                info!(
                    "Read operation {} settled as {} after {} polls",
                    operation_id,
                    result.status.as_str(),
                    attempt
                );
                return ensure_succeeded(result);
            }
            debug!(
                "Read operation {} still {} (poll {})",
                operation_id,
                result.status.as_str(),
                attempt
            );
            tokio::time::sleep(self.poll_interval).await;
        }

        warn!("Read operation {} timed out", operation_id);
        Err(OcrError::Timeout {
            attempts: self.max_polls,
        })
    }

    /// Send the document, returning the operation id to poll
    pub async fn submit(&self, content: Vec<u8>) -> Result<String, OcrError> {
        let url = format!("{}{}", self.endpoint, ANALYZE_ENDPOINT);
        info!("Submitting {} bytes to Read API: {}", content.len(), url);

        let response = self
            .client
            .post(&url)
            .query(&[("language", self.language.as_str())])
            .header(SUBSCRIPTION_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(content)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Read API rejected the document {}: {}", status, error_text);
            return Err(OcrError::RecognitionFailed {
                status: format!("HTTP {}: {}", status, error_text),
            });
        }

        response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(operation_id_from_location)
            .ok_or_else(|| OcrError::RecognitionFailed {
                status: format!("missing {} header", OPERATION_LOCATION_HEADER),
            })
    }

    pub async fn get_read_result(&self, operation_id: &str) -> Result<ReadOperationResult, OcrError> {
        let url = format!("{}{}/{}", self.endpoint, RESULTS_ENDPOINT, operation_id);

        let body = self
            .client
            .get(&url)
            .header(SUBSCRIPTION_HEADER, &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }
}

/// Last path segment of an `Operation-Location` URL, without query string.
pub fn operation_id_from_location(location: &str) -> Option<String> {
    let path = location.split(['?', '#']).next()?;
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn ensure_succeeded(result: ReadOperationResult) -> Result<ReadOperationResult, OcrError> {
    if result.status != OperationStatus::Succeeded {
        return Err(OcrError::RecognitionFailed {
            status: result.status.as_str().to_string(),
        });
    }
    Ok(result)
}

/// Transcript of a settled operation.
pub fn document_from_result(result: ReadOperationResult) -> Result<String, OcrError> {
    let result = ensure_succeeded(result)?;
    let pages = result.into_pages().into_iter().map(|page| page.lines);
    Ok(reconstruct_document(pages))
}

/// Page transcripts of a settled operation, in page order.
pub fn transcripts_from_result(result: ReadOperationResult) -> Result<Vec<String>, OcrError> {
    let result = ensure_succeeded(result)?;
    let pages = result.into_pages().into_iter().map(|page| page.lines);
    Ok(reconstruct_pages(pages, DEFAULT_VERTICAL_TOLERANCE))
}
