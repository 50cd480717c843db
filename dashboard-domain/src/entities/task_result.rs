// Result entity
// One completed run of a task

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    pub id: String,
    pub task: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub count: ResultCount,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub results: Vec<ResultMessage>,
}

impl TaskResult {
    pub fn passed(&self) -> bool {
        self.count.error == 0
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ResultCount {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub error: u32,
    #[serde(default)]
    pub warning: u32,
    #[serde(default)]
    pub notice: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMessage {
    pub code: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub selector: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Json => "application/json",
            ReportFormat::Csv => "text/csv; charset=utf-8",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            _ => None,
        }
    }
}

/// Stored report body, relayed to the browser without buffering.
pub struct ReportDownload {
    pub content_type: String,
    pub body: BoxStream<'static, Result<Bytes, BackendError>>,
}

impl std::fmt::Debug for ReportDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportDownload")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_result_and_reports_pass_state() {
        let result: TaskResult = serde_json::from_str(
            r#"{
                "id": "7",
                "task": "42",
                "date": "2024-03-01T10:00:00Z",
                "count": {"total": 3, "error": 1, "warning": 2, "notice": 0},
                "results": [
                    {"code": "WCAG2AA.Principle1.Guideline1_1.1_1_1.H37", "type": "error", "message": "Img element missing an alt attribute."}
                ]
            }"#,
        )
        .expect("result");
        assert_eq!(result.count.total, 3);
        assert!(!result.passed());
        assert_eq!(result.results[0].kind, "error");
        assert!(result.results[0].selector.is_none());
    }

    #[test]
    fn report_format_parsing() {
        assert_eq!(ReportFormat::parse("CSV"), Some(ReportFormat::Csv));
        assert_eq!(ReportFormat::parse("json"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::parse("xml"), None);
    }
}
