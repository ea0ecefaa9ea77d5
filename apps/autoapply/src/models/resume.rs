use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Number of ATS keywords shown next to a resume.
pub const DISPLAY_KEYWORDS: usize = 8;

/// A generated resume. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: String,
    pub job_title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    /// Explicit link to the application created alongside this resume, when
    /// the backend provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
}

impl Resume {
    pub fn display_keywords(&self) -> &[String] {
        &self.keywords[..self.keywords.len().min(DISPLAY_KEYWORDS)]
    }

    /// File name used when the PDF export is saved locally.
    pub fn pdf_file_name(resume_id: &str) -> String {
        format!("resume_{resume_id}.pdf")
    }
}
