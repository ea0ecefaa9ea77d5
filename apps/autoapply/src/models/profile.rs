use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// The user's structured profile. One per authenticated user.
///
/// `Default` is the "absent profile": every collection empty, never missing.
/// Saving always sends the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferred_roles: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub field: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Free text as typed by the user, e.g. "Rust, Tokio, Postgres".
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: String,
}

impl UserProfile {
    /// Sets `user_id` when the document does not name an owner. The backend
    /// rejects a profile without one.
    pub fn claim_for(&mut self, user_id: &str) {
        if self.user_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            self.user_id = Some(user_id.to_string());
        }
    }

    /// True when nothing beyond identity has been filled in.
    pub fn is_blank(&self) -> bool {
        self.summary.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.skills.is_empty()
            && self.preferred_roles.is_empty()
            && self.education.is_empty()
            && self.experience.is_empty()
            && self.projects.is_empty()
    }
}
