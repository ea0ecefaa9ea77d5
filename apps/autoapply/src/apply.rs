use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::{ApplyReceipt, Backend};
use crate::errors::{ClientError, Notification};
use crate::inflight::InFlight;

pub const APPLY_SUCCESS_MESSAGE: &str =
    "Application submitted successfully! AI generated your resume and cover letter.";

/// Submits apply requests. Applying is the one action that makes the backend
/// generate a resume and cover letter and record an application.
///
/// Nothing is created locally: the new application and resume show up on the
/// next list refresh of `ApplicationLifecycleManager` / `ResumeArchive`.
pub struct AutoApplyOrchestrator {
    backend: Arc<dyn Backend>,
    in_flight: InFlight,
}

impl AutoApplyOrchestrator {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            in_flight: InFlight::new("job"),
        }
    }

    /// Applies to `job_id`. A second call for the same job while the first
    /// is pending fails with `ClientError::InFlight` and sends nothing.
    pub async fn apply(&self, job_id: &str) -> Result<ApplyReceipt, ClientError> {
        let _guard = self.in_flight.try_acquire(job_id)?;
        info!("Applying to job {job_id}");

        match self.backend.apply_to_job(job_id).await {
            Ok(receipt) => {
                info!("Application submitted for job {job_id}");
                Ok(receipt)
            }
            Err(e) => {
                warn!("Apply to job {job_id} failed: {e}");
                Err(e)
            }
        }
    }

    /// Whether the apply control for `job_id` should be disabled.
    pub fn is_applying(&self, job_id: &str) -> bool {
        self.in_flight.is_in_flight(job_id)
    }

    pub fn pending(&self) -> Vec<String> {
        self.in_flight.pending()
    }
}

/// The notification shown once an apply call resolves.
pub fn apply_notification(result: &Result<ApplyReceipt, ClientError>) -> Notification {
    match result {
        Ok(_) => Notification::success(APPLY_SUCCESS_MESSAGE),
        Err(e) => e.notification("Apply"),
    }
}
