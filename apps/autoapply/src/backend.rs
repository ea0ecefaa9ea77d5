//! The backend seam. Components talk to the matching/generation service only
//! through this trait; `ApiClient` is the HTTP implementation.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::ClientError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::job::{JobPosting, Platform};
use crate::models::profile::UserProfile;
use crate::models::resume::Resume;
use crate::session::{LoginRequest, RegisterRequest, Session};

/// Acknowledgement of `POST /jobs/apply`.
///
/// Carries nothing the client is allowed to store: the new application and
/// resume only become visible through the next list refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReceipt {
    #[serde(default)]
    pub message: Option<String>,
}

/// One method per backend operation. Every non-auth call carries the session
/// credential.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<Session, ClientError>;

    async fn login(&self, request: &LoginRequest) -> Result<Session, ClientError>;

    /// `Ok(None)` when the backend has no profile for the user yet.
    async fn get_profile(&self) -> Result<Option<UserProfile>, ClientError>;

    async fn put_profile(&self, profile: &UserProfile) -> Result<UserProfile, ClientError>;

    async fn search_jobs(&self, platform: Option<Platform>) -> Result<Vec<JobPosting>, ClientError>;

    async fn apply_to_job(&self, job_id: &str) -> Result<ApplyReceipt, ClientError>;

    async fn list_applications(&self) -> Result<Vec<Application>, ClientError>;

    /// Returns the updated record when the backend echoes one, `None` for a bare ack.
    async fn update_application_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, ClientError>;

    async fn list_resumes(&self) -> Result<Vec<Resume>, ClientError>;

    async fn export_resume_pdf(&self, resume_id: &str) -> Result<Bytes, ClientError>;
}
