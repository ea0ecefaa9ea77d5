//! Application lifecycle: listing, status filtering and per-item status changes.
//!
//! Status changes are unconstrained: any of the four statuses can be set from
//! any other, and none is terminal. The local copy is only touched after the
//! backend confirms a change, so a failed update needs no rollback.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::errors::ClientError;
use crate::inflight::InFlight;
use crate::models::application::{Application, ApplicationStatus, StatusFilter};

/// Keeps applications matching `filter`, in their original relative order.
pub fn filter_by_status(applications: &[Application], filter: StatusFilter) -> Vec<Application> {
    applications
        .iter()
        .filter(|app| filter.matches(app.status))
        .cloned()
        .collect()
}

/// Number of applications per status. Every status is present, possibly at 0.
pub fn count_by_status(applications: &[Application]) -> HashMap<ApplicationStatus, usize> {
    let mut counts: HashMap<ApplicationStatus, usize> =
        ApplicationStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for app in applications {
        *counts.entry(app.status).or_default() += 1;
    }
    counts
}

pub struct ApplicationLifecycleManager {
    backend: Arc<dyn Backend>,
    applications: Mutex<Vec<Application>>,
    in_flight: InFlight,
}

impl ApplicationLifecycleManager {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            applications: Mutex::new(Vec::new()),
            in_flight: InFlight::new("application"),
        }
    }

    /// Fetches all applications. None yet is an empty list.
    pub async fn list(&self) -> Result<Vec<Application>, ClientError> {
        let applications = self.backend.list_applications().await?;
        info!("Loaded {} applications", applications.len());
        *self.lock() = applications.clone();
        Ok(applications)
    }

    pub fn applications(&self) -> Vec<Application> {
        self.lock().clone()
    }

    pub fn filtered(&self, filter: StatusFilter) -> Vec<Application> {
        filter_by_status(&self.lock(), filter)
    }

    /// Whether the status control of `application_id` should be disabled.
    pub fn is_updating(&self, application_id: &str) -> bool {
        self.in_flight.is_in_flight(application_id)
    }

    /// Sets the status of one application.
    ///
    /// Only one update per application can be pending; updates on different
    /// applications proceed independently. On success only the `status` field
    /// of the local copy changes, and that copy is returned.
    ///
    /// If a refresh dropped the record while the update was pending, the
    /// change is still confirmed; the backend's echo, if any, is returned.
    pub async fn update_status(
        &self,
        application_id: &str,
        new_status: ApplicationStatus,
    ) -> Result<Option<Application>, ClientError> {
        if !self.lock().iter().any(|a| a.id == application_id) {
            return Err(ClientError::Validation(format!(
                "Application {application_id} not found"
            )));
        }

        let _guard = self.in_flight.try_acquire(application_id)?;
        info!("Updating application {application_id} to {new_status}");

        let echoed = match self
            .backend
            .update_application_status(application_id, new_status)
            .await
        {
            Ok(echoed) => echoed,
            Err(e) => {
                warn!("Status update for application {application_id} failed: {e}");
                return Err(e);
            }
        };

        let mut applications = self.lock();
        match applications.iter_mut().find(|a| a.id == application_id) {
            Some(app) => {
                app.status = new_status;
                Ok(Some(app.clone()))
            }
            None => {
                debug!("Application {application_id} left the list before its update was confirmed");
                Ok(echoed)
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Application>> {
        self.applications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
