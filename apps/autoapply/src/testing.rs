//! In-memory stand-in for the backend, used by component tests.
//!
//! It follows the backend contract: apply validates the job, creates one
//! resume and one `Applied` application, and rejects a second apply to the
//! same job. Calls can be made to fail, or held pending on a gate so tests can
//! observe in-flight state.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::backend::{ApplyReceipt, Backend};
use crate::errors::ClientError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::job::{JobPosting, Platform};
use crate::models::profile::UserProfile;
use crate::models::resume::Resume;
use crate::session::{LoginRequest, RegisterRequest, Session, SessionUser};

#[derive(Debug, Clone)]
pub enum Failure {
    Unauthorized,
    Validation(String),
    Server,
}

impl Failure {
    fn to_error(&self) -> ClientError {
        match self {
            Failure::Unauthorized => ClientError::Unauthorized("Invalid token".into()),
            Failure::Validation(msg) => ClientError::Validation(msg.clone()),
            Failure::Server => ClientError::Server {
                status: 500,
                message: "Internal Server Error".into(),
            },
        }
    }
}

#[derive(Default)]
struct State {
    users: HashMap<String, (SessionUser, String)>,
    profile: Option<UserProfile>,
    jobs: Vec<JobPosting>,
    applications: Vec<Application>,
    hidden: HashSet<String>,
    resumes: Vec<Resume>,
    failures: HashMap<&'static str, Failure>,
    gates: HashMap<&'static str, Arc<Semaphore>>,
    calls: HashMap<&'static str, usize>,
    ignore_platform: bool,
}

#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(jobs: Vec<JobPosting>) -> Self {
        let backend = Self::new();
        backend.state().jobs = jobs;
        backend
    }

    pub fn add_user(&self, name: &str, email: &str, password: &str) {
        let user = SessionUser {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
        };
        self.state()
            .users
            .insert(email.to_string(), (user, password.to_string()));
    }

    pub fn set_profile(&self, profile: UserProfile) {
        self.state().profile = Some(profile);
    }

    pub fn stored_profile(&self) -> Option<UserProfile> {
        self.state().profile.clone()
    }

    pub fn add_application(&self, application: Application) {
        self.state().applications.push(application);
    }

    /// Leaves `application_id` out of list responses while still accepting
    /// updates to it, as when another session changes the list.
    pub fn hide_application(&self, application_id: &str) {
        self.state().hidden.insert(application_id.to_string());
    }

    pub fn add_resume(&self, resume: Resume) {
        self.state().resumes.push(resume);
    }

    pub fn server_applications(&self) -> Vec<Application> {
        self.state().applications.clone()
    }

    /// Makes searches return every posting regardless of the platform asked for.
    pub fn ignore_platform_filter(&self) {
        self.state().ignore_platform = true;
    }

    /// Every later call of `op` fails until `recover(op)`.
    pub fn fail(&self, op: &'static str, failure: Failure) {
        self.state().failures.insert(op, failure);
    }

    pub fn recover(&self, op: &'static str) {
        self.state().failures.remove(op);
    }

    /// Calls of `op` stay pending until `release(op)`.
    pub fn hold(&self, op: &'static str) {
        self.state().gates.insert(op, Arc::new(Semaphore::new(0)));
    }

    /// Lets every held and future call of `op` through. Closing the semaphore
    /// wakes current waiters and makes later acquires return at once.
    pub fn release(&self, op: &'static str) {
        if let Some(gate) = self.state().gates.remove(op) {
            gate.close();
        }
    }

    pub fn calls(&self, op: &'static str) -> usize {
        self.state().calls.get(op).copied().unwrap_or(0)
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn enter(&self, op: &'static str) -> Result<(), ClientError> {
        let gate = {
            let mut state = self.state();
            *state.calls.entry(op).or_default() += 1;
            state.gates.get(op).cloned()
        };
        if let Some(gate) = gate {
            let _ = gate.acquire().await;
        }
        match self.state().failures.get(op) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

pub fn job(id: &str, title: &str, company: &str, platform: &str, score: Option<u8>) -> JobPosting {
    JobPosting {
        id: id.to_string(),
        title: title.to_string(),
        company: company.to_string(),
        location: "Remote".to_string(),
        description: format!("{title} at {company}"),
        requirements: vec!["Rust".to_string(), "SQL".to_string()],
        job_type: "Full-time".to_string(),
        platform: platform.to_string(),
        salary_range: None,
        compatibility_score: score,
        posted_date: None,
    }
}

/// Six postings spread over the three boards, like the backend's demo catalog.
pub fn sample_jobs() -> Vec<JobPosting> {
    vec![
        job("J1", "Senior Full Stack Developer", "TechCorp", "LinkedIn", Some(88)),
        job("J2", "AI/ML Engineer", "InnovateLabs", "Indeed", Some(74)),
        job("J3", "Frontend Developer", "DesignCo", "Wellfound", Some(61)),
        job("J4", "DevOps Engineer", "CloudSystems", "LinkedIn", Some(59)),
        job("J5", "Data Scientist", "DataDrive", "Indeed", None),
        job("J6", "Backend Developer", "ServerTech", "Wellfound", Some(80)),
    ]
}

pub fn application(id: &str, title: &str, status: ApplicationStatus) -> Application {
    Application {
        id: id.to_string(),
        job_title: title.to_string(),
        company: "Acme".to_string(),
        status,
        applied_at: Utc::now(),
        cover_letter: Some(format!("Cover letter for {title}")),
        job_id: None,
        resume_id: None,
        updated_at: None,
    }
}

pub fn resume(id: &str, title: &str) -> Resume {
    Resume {
        id: id.to_string(),
        job_title: title.to_string(),
        created_at: Utc::now(),
        keywords: vec!["Rust".to_string()],
        content: format!("Resume for {title}"),
        job_description: None,
        application_id: None,
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn register(&self, request: &RegisterRequest) -> Result<Session, ClientError> {
        self.enter("register").await?;
        let mut state = self.state();
        if state.users.contains_key(&request.email) {
            return Err(ClientError::Validation("Email already registered".into()));
        }
        let user = SessionUser {
            id: Uuid::new_v4().to_string(),
            email: request.email.clone(),
            name: request.name.clone(),
        };
        state
            .users
            .insert(request.email.clone(), (user.clone(), request.password.clone()));
        Ok(Session {
            token: format!("token-{}", user.id),
            user,
        })
    }

    async fn login(&self, request: &LoginRequest) -> Result<Session, ClientError> {
        self.enter("login").await?;
        match self.state().users.get(&request.email) {
            Some((user, password)) if *password == request.password => Ok(Session {
                token: format!("token-{}", user.id),
                user: user.clone(),
            }),
            _ => Err(ClientError::Unauthorized("Invalid credentials".into())),
        }
    }

    async fn get_profile(&self) -> Result<Option<UserProfile>, ClientError> {
        self.enter("get_profile").await?;
        Ok(self.state().profile.clone())
    }

    async fn put_profile(&self, profile: &UserProfile) -> Result<UserProfile, ClientError> {
        self.enter("put_profile").await?;
        self.state().profile = Some(profile.clone());
        Ok(profile.clone())
    }

    async fn search_jobs(&self, platform: Option<Platform>) -> Result<Vec<JobPosting>, ClientError> {
        self.enter("search_jobs").await?;
        let state = self.state();
        let jobs = state.jobs.clone();
        Ok(match platform {
            Some(p) if !state.ignore_platform => jobs.into_iter().filter(|j| j.is_on(p)).collect(),
            _ => jobs,
        })
    }

    async fn apply_to_job(&self, job_id: &str) -> Result<ApplyReceipt, ClientError> {
        self.enter("apply_to_job").await?;
        let mut state = self.state();
        let job = state
            .jobs
            .iter()
            .find(|j| j.id == job_id)
            .cloned()
            .ok_or_else(|| ClientError::Validation("Job not found".into()))?;
        if state
            .applications
            .iter()
            .any(|a| a.job_id.as_deref() == Some(job_id))
        {
            return Err(ClientError::Validation("Already applied to this job".into()));
        }

        // Newest first, matching the backend's list ordering.
        let created_at = Utc::now() + Duration::milliseconds(state.resumes.len() as i64);
        let resume_id = Uuid::new_v4().to_string();
        let application_id = Uuid::new_v4().to_string();
        state.resumes.insert(
            0,
            Resume {
                id: resume_id.clone(),
                job_title: job.title.clone(),
                created_at,
                keywords: job.requirements.clone(),
                content: format!("{}\n\n{}", job.title.to_uppercase(), job.description),
                job_description: Some(job.description.clone()),
                application_id: None,
            },
        );
        state.applications.insert(
            0,
            Application {
                id: application_id,
                job_title: job.title.clone(),
                company: job.company.clone(),
                status: ApplicationStatus::Applied,
                applied_at: created_at,
                cover_letter: Some(format!("Dear {} hiring team", job.company)),
                job_id: Some(job.id.clone()),
                resume_id: Some(resume_id),
                updated_at: Some(created_at),
            },
        );
        Ok(ApplyReceipt {
            message: Some("Application submitted successfully".into()),
        })
    }

    async fn list_applications(&self) -> Result<Vec<Application>, ClientError> {
        self.enter("list_applications").await?;
        let state = self.state();
        Ok(state
            .applications
            .iter()
            .filter(|a| !state.hidden.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn update_application_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, ClientError> {
        self.enter("update_application_status").await?;
        let mut state = self.state();
        let app = state
            .applications
            .iter_mut()
            .find(|a| a.id == application_id)
            .ok_or_else(|| ClientError::Validation("Application not found".into()))?;
        app.status = status;
        app.updated_at = Some(Utc::now());
        Ok(None)
    }

    async fn list_resumes(&self) -> Result<Vec<Resume>, ClientError> {
        self.enter("list_resumes").await?;
        Ok(self.state().resumes.clone())
    }

    async fn export_resume_pdf(&self, resume_id: &str) -> Result<Bytes, ClientError> {
        self.enter("export_resume_pdf").await?;
        let state = self.state();
        let resume = state
            .resumes
            .iter()
            .find(|r| r.id == resume_id)
            .ok_or_else(|| ClientError::Validation("Resume not found".into()))?;
        Ok(Bytes::from(format!("%PDF-1.4\n{}", resume.content)))
    }
}
