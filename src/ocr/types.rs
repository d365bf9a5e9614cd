// src/ocr/types.rs
//! Wire models of the Read API results.

use serde::Deserialize;

use super::layout::Word;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    #[serde(other)]
    Unknown,
}

impl OperationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::NotStarted | Self::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "notStarted",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadOperationResult {
    pub status: OperationStatus,
    pub created_date_time: Option<String>,
    pub last_updated_date_time: Option<String>,
    pub analyze_result: Option<AnalyzeResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    pub version: Option<String>,
    #[serde(default)]
    pub read_results: Vec<ReadPage>,
}

/// One recognized page. Its `lines` are the recognizer's text elements,
/// in no guaranteed order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadPage {
    pub page: u32,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub unit: Option<String>,
    #[serde(default)]
    pub lines: Vec<Word>,
}

impl ReadOperationResult {
    pub fn pages(&self) -> &[ReadPage] {
        self.analyze_result
            .as_ref()
            .map(|r| r.read_results.as_slice())
            .unwrap_or(&[])
    }

    pub fn into_pages(self) -> Vec<ReadPage> {
        self.analyze_result
            .map(|r| r.read_results)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "status": "succeeded",
        "createdDateTime": "2025-03-01T12:00:00Z",
        "lastUpdatedDateTime": "2025-03-01T12:00:02Z",
        "analyzeResult": {
            "version": "3.2.0",
            "readResults": [
                {
                    "page": 1, "angle": 0, "width": 8.5, "height": 11, "unit": "inch",
                    "lines": [
                        {"boundingBox": [1, 2, 3, 2, 3, 2.2, 1, 2.2], "text": "Python", "words": []},
                        {"boundingBox": [0.5, 1, 2, 1, 2, 1.3, 0.5, 1.3], "text": "Ana Souza", "words": []}
                    ]
                },
                {"page": 2, "width": 8.5, "height": 11, "unit": "inch", "lines": []}
            ]
        }
    }"#;

    #[test]
    fn test_parse_read_result() {
        let result: ReadOperationResult = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(result.status, OperationStatus::Succeeded);
        assert_eq!(result.pages().len(), 2);
        assert_eq!(result.pages()[0].lines[1].text, "Ana Souza");
        assert!(result.pages()[1].lines.is_empty());
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let result: ReadOperationResult =
            serde_json::from_str(r#"{"status":"cancelled"}"#).unwrap();
        assert_eq!(result.status, OperationStatus::Unknown);
        assert!(!result.status.is_pending());
        assert!(result.pages().is_empty());
    }

    #[test]
    fn test_pending_statuses() {
        assert!(OperationStatus::NotStarted.is_pending());
        assert!(OperationStatus::Running.is_pending());
        assert!(!OperationStatus::Failed.is_pending());
    }
}
