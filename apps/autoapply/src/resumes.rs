//! Archive of generated resumes and their PDF export.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tracing::{info, warn};

use crate::backend::Backend;
use crate::errors::ClientError;
use crate::inflight::InFlight;
use crate::models::application::Application;
use crate::models::resume::Resume;

/// Read-only view of the resumes the backend generated. Resumes are never
/// created, edited or deleted from here.
pub struct ResumeArchive {
    backend: Arc<dyn Backend>,
    resumes: Mutex<Vec<Resume>>,
    in_flight: InFlight,
}

impl ResumeArchive {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            resumes: Mutex::new(Vec::new()),
            in_flight: InFlight::new("resume"),
        }
    }

    pub async fn list(&self) -> Result<Vec<Resume>, ClientError> {
        let resumes = self.backend.list_resumes().await?;
        info!("Loaded {} resumes", resumes.len());
        *self.lock() = resumes.clone();
        Ok(resumes)
    }

    pub fn resumes(&self) -> Vec<Resume> {
        self.lock().clone()
    }

    pub fn is_exporting(&self, resume_id: &str) -> bool {
        self.in_flight.is_in_flight(resume_id)
    }

    /// Requests a PDF rendering of `resume_id`. The bytes are not cached; each
    /// call asks the backend again.
    pub async fn export_pdf(&self, resume_id: &str) -> Result<Bytes, ClientError> {
        let _guard = self.in_flight.try_acquire(resume_id)?;
        self.fetch_pdf(resume_id).await
    }

    /// Exports `resume_id` and writes it to `dir` as `resume_{id}.pdf`.
    /// The resume stays marked as exporting until the file is written.
    pub async fn export_pdf_to(&self, resume_id: &str, dir: &Path) -> Result<PathBuf, ClientError> {
        let _guard = self.in_flight.try_acquire(resume_id)?;
        let pdf = self.fetch_pdf(resume_id).await?;

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(Resume::pdf_file_name(resume_id));
        tokio::fs::write(&path, &pdf).await?;
        info!("Saved {} bytes to {}", pdf.len(), path.display());
        Ok(path)
    }

    /// The resume generated for `application`.
    ///
    /// Uses the application's `resume_id`, then a resume carrying the
    /// application's id, then the first resume with the same job title.
    /// Titles are not unique, so the last fallback can pick an older resume
    /// when the user applied to two postings with one title.
    pub fn resume_for(&self, application: &Application) -> Option<Resume> {
        let resumes = self.lock();
        if let Some(id) = application.resume_id.as_deref() {
            if let Some(found) = resumes.iter().find(|r| r.id == id) {
                return Some(found.clone());
            }
        }
        resumes
            .iter()
            .find(|r| r.application_id.as_deref() == Some(application.id.as_str()))
            .or_else(|| resumes.iter().find(|r| r.job_title == application.job_title))
            .cloned()
    }

    async fn fetch_pdf(&self, resume_id: &str) -> Result<Bytes, ClientError> {
        match self.backend.export_resume_pdf(resume_id).await {
            Ok(pdf) => {
                info!("Exported resume {resume_id} ({} bytes)", pdf.len());
                Ok(pdf)
            }
            Err(e) => {
                warn!("PDF export for resume {resume_id} failed: {e}");
                Err(e)
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Resume>> {
        self.resumes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
