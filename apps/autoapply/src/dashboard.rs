use serde::Serialize;
use tracing::info;

use crate::applications::count_by_status;
use crate::backend::Backend;
use crate::errors::ClientError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::resume::Resume;

/// Number of applications listed under "recent".
pub const RECENT_APPLICATIONS: usize = 5;

/// Counters and recent activity shown on the landing screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_applications: usize,
    pub applied: usize,
    pub interview: usize,
    pub total_resumes: usize,
    pub recent: Vec<Application>,
}

impl DashboardSummary {
    /// `applications` is expected newest first, as the backend lists them.
    pub fn from_records(applications: &[Application], resumes: &[Resume]) -> Self {
        let counts = count_by_status(applications);
        Self {
            total_applications: applications.len(),
            applied: counts[&ApplicationStatus::Applied],
            interview: counts[&ApplicationStatus::Interview],
            total_resumes: resumes.len(),
            recent: applications
                .iter()
                .take(RECENT_APPLICATIONS)
                .cloned()
                .collect(),
        }
    }

    pub async fn load(backend: &dyn Backend) -> Result<Self, ClientError> {
        let (applications, resumes) =
            tokio::try_join!(backend.list_applications(), backend.list_resumes())?;
        let summary = Self::from_records(&applications, &resumes);
        info!(
            "Dashboard: {} applications, {} resumes",
            summary.total_applications, summary.total_resumes
        );
        Ok(summary)
    }
}
