use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one apply action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub job_title: String,
    pub company: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Application status. Any status may be set from any other; there is no
/// terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Interview,
    Rejected,
    Offer,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interview,
        ApplicationStatus::Rejected,
        ApplicationStatus::Offer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Offer => "Offer",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown status '{s}' (expected Applied, Interview, Rejected or Offer)"))
    }
}

/// Status filter for the applications view. `All` is the identity filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: ApplicationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusUpdate {
    pub status: ApplicationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_format_is_capitalized() {
        assert_eq!(
            serde_json::to_value(StatusUpdate {
                status: ApplicationStatus::Interview
            })
            .unwrap(),
            json!({"status": "Interview"})
        );
    }

    #[test]
    fn test_unknown_status_fails_to_decode() {
        let result = serde_json::from_value::<Application>(json!({
            "id": "a1",
            "job_title": "Engineer",
            "company": "Acme",
            "status": "Ghosted",
            "applied_at": "2024-05-01T10:00:00Z"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_optional_link_fields_are_accepted() {
        let app: Application = serde_json::from_value(json!({
            "id": "a1",
            "user_id": "u1",
            "job_id": "j1",
            "job_title": "Engineer",
            "company": "Acme",
            "status": "Applied",
            "resume_id": "r1",
            "cover_letter": "Dear Acme",
            "applied_at": "2024-05-01T10:00:00+00:00",
            "updated_at": "2024-05-01T10:00:00+00:00"
        }))
        .unwrap();
        assert_eq!(app.status, ApplicationStatus::Applied);
        assert_eq!(app.resume_id.as_deref(), Some("r1"));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("offer".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::Offer);
        assert!("hired".parse::<ApplicationStatus>().is_err());
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "Rejected".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(ApplicationStatus::Rejected)
        );
    }
}
