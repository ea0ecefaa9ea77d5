//! Job catalog: platform-scoped search plus local text filtering.
//!
//! Compatibility scores come from the backend and are only ever read here.

use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::backend::Backend;
use crate::errors::ClientError;
use crate::models::job::{JobPosting, PlatformFilter};

/// Case-insensitive substring match on title or company.
///
/// A blank (empty or whitespace-only) term returns every posting unchanged.
/// Relative order is preserved, so applying the same term twice is a no-op.
pub fn apply_text_filter(postings: &[JobPosting], term: &str) -> Vec<JobPosting> {
    if term.trim().is_empty() {
        return postings.to_vec();
    }
    let needle = term.to_lowercase();
    postings
        .iter()
        .filter(|job| {
            job.title.to_lowercase().contains(&needle)
                || job.company.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

#[derive(Debug, Default)]
struct CatalogState {
    platform: PlatformFilter,
    postings: Vec<JobPosting>,
    term: String,
}

impl CatalogState {
    fn visible(&self) -> Vec<JobPosting> {
        apply_text_filter(&self.postings, &self.term)
    }
}

/// Current search result set and the text filter applied on top of it.
/// Results are not cached beyond the latest search.
pub struct JobCatalogClient {
    backend: Arc<dyn Backend>,
    state: Mutex<CatalogState>,
}

impl JobCatalogClient {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            state: Mutex::new(CatalogState::default()),
        }
    }

    /// Runs a search and replaces the base set. Returns the postings visible
    /// under the current text filter. On failure the previous set is kept.
    pub async fn search(&self, filter: PlatformFilter) -> Result<Vec<JobPosting>, ClientError> {
        let mut postings = self.backend.search_jobs(filter.platform()).await?;

        if let Some(platform) = filter.platform() {
            let before = postings.len();
            postings.retain(|job| job.is_on(platform));
            if postings.len() != before {
                debug!(
                    "Dropped {} postings outside platform {}",
                    before - postings.len(),
                    platform.as_str()
                );
            }
        }
        info!("Job search ({filter}) returned {} postings", postings.len());

        let mut state = self.lock();
        state.platform = filter;
        state.postings = postings;
        Ok(state.visible())
    }

    /// Changes the text filter and returns the re-filtered view.
    pub fn set_term(&self, term: &str) -> Vec<JobPosting> {
        let mut state = self.lock();
        state.term = term.to_string();
        state.visible()
    }

    pub fn visible(&self) -> Vec<JobPosting> {
        self.lock().visible()
    }

    pub fn postings(&self) -> Vec<JobPosting> {
        self.lock().postings.clone()
    }

    pub fn platform(&self) -> PlatformFilter {
        self.lock().platform
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
