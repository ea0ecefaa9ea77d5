// Response envelopes used by the backend. Missing collection keys decode as
// empty lists: "no records yet" is not an error.

use serde::Deserialize;

use crate::models::application::Application;
use crate::models::job::JobPosting;
use crate::models::null_as_default;
use crate::models::profile::UserProfile;
use crate::models::resume::Resume;

#[derive(Debug, Deserialize)]
pub(crate) struct JobsEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub jobs: Vec<JobPosting>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationsEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub applications: Vec<Application>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResumesEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub resumes: Vec<Resume>,
}

/// `PUT /profile` answers either with the stored profile or with
/// `{"message": ..., "profile": {...}}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProfileReply {
    Envelope { profile: UserProfile },
    Bare(UserProfile),
}

impl ProfileReply {
    pub fn into_profile(self) -> UserProfile {
        match self {
            ProfileReply::Envelope { profile } | ProfileReply::Bare(profile) => profile,
        }
    }
}

/// `PUT /applications/{id}` answers with the updated record or a plain ack.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum StatusReply {
    Record(Application),
    Envelope { application: Application },
    Ack(serde_json::Value),
}

impl StatusReply {
    pub fn into_application(self) -> Option<Application> {
        match self {
            StatusReply::Record(app) | StatusReply::Envelope { application: app } => Some(app),
            StatusReply::Ack(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}
