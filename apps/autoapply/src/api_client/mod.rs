//! HTTP transport: the single point of entry for all backend calls.
//!
//! Components never issue HTTP themselves; they hold an `Arc<dyn Backend>` and
//! this type is the production implementation. Every request except
//! registration and login carries `Authorization: Bearer <token>` from the
//! injected `SessionContext`.
//!
//! No timeout and no retry: a request runs to completion or failure, and a
//! failure is reported once.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub mod wire;

use crate::backend::{ApplyReceipt, Backend};
use crate::errors::ClientError;
use crate::models::application::{Application, ApplicationStatus, StatusUpdate};
use crate::models::job::{JobPosting, Platform};
use crate::models::profile::UserProfile;
use crate::models::resume::Resume;
use crate::session::{LoginRequest, RegisterRequest, Session, SessionContext};
use wire::{
    ApplicationsEnvelope, HealthStatus, JobsEnvelope, ProfileReply, ResumesEnvelope, StatusReply,
};

#[derive(Debug, serde::Serialize)]
struct ApplyRequest<'a> {
    job_id: &'a str,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    /// `GET /health`. Does not need a session.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.send(self.request(Method::GET, "/health"), "/health").await?;
        decode(response).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    /// Builds a request with the bearer credential attached. Fails before any
    /// network I/O when nobody is signed in.
    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.session.require_token()?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response, ClientError> {
        let response = self.dispatch(request, path).await?;
        check(response, path).await
    }

    async fn dispatch(&self, request: RequestBuilder, path: &str) -> Result<Response, ClientError> {
        request.send().await.map_err(|e| {
            warn!("Request to {path} failed: {e}");
            ClientError::Transport(e)
        })
    }
}

async fn check(response: Response, path: &str) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        debug!("{path} -> {status}");
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("{path} returned {status}: {body}");
    Err(ClientError::from_status(status.as_u16(), &body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

#[async_trait]
impl Backend for ApiClient {
    async fn register(&self, request: &RegisterRequest) -> Result<Session, ClientError> {
        let path = "/auth/register";
        let response = self
            .send(self.request(Method::POST, path).json(request), path)
            .await?;
        decode(response).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<Session, ClientError> {
        let path = "/auth/login";
        let response = self
            .send(self.request(Method::POST, path).json(request), path)
            .await?;
        decode(response).await
    }

    async fn get_profile(&self) -> Result<Option<UserProfile>, ClientError> {
        let path = "/profile";
        let response = self.dispatch(self.authed(Method::GET, path)?, path).await?;
        // No stored profile yet is the empty profile, not a failure.
        if response.status() == StatusCode::NOT_FOUND {
            debug!("{path} -> 404, using empty profile");
            return Ok(None);
        }
        Ok(Some(decode(check(response, path).await?).await?))
    }

    async fn put_profile(&self, profile: &UserProfile) -> Result<UserProfile, ClientError> {
        let path = "/profile";
        let response = self
            .send(self.authed(Method::PUT, path)?.json(profile), path)
            .await?;
        let reply: ProfileReply = decode(response).await?;
        Ok(reply.into_profile())
    }

    async fn search_jobs(&self, platform: Option<Platform>) -> Result<Vec<JobPosting>, ClientError> {
        let path = "/jobs/search";
        let mut request = self.authed(Method::GET, path)?;
        if let Some(platform) = platform {
            request = request.query(&[("platform", platform.as_str())]);
        }
        let envelope: JobsEnvelope = decode(self.send(request, path).await?).await?;
        Ok(envelope.jobs)
    }

    async fn apply_to_job(&self, job_id: &str) -> Result<ApplyReceipt, ClientError> {
        let path = "/jobs/apply";
        let response = self
            .send(
                self.authed(Method::POST, path)?.json(&ApplyRequest { job_id }),
                path,
            )
            .await?;
        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(ApplyReceipt::default());
        }
        Ok(serde_json::from_slice(&body).unwrap_or_default())
    }

    async fn list_applications(&self) -> Result<Vec<Application>, ClientError> {
        let path = "/applications";
        let envelope: ApplicationsEnvelope =
            decode(self.send(self.authed(Method::GET, path)?, path).await?).await?;
        Ok(envelope.applications)
    }

    async fn update_application_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, ClientError> {
        let path = format!("/applications/{application_id}");
        let response = self
            .send(
                self.authed(Method::PUT, &path)?.json(&StatusUpdate { status }),
                &path,
            )
            .await?;
        let body = response.bytes().await?;
        // Any 2xx is a confirmed change; a body that is not a record is an ack.
        match serde_json::from_slice::<StatusReply>(&body) {
            Ok(reply) => Ok(reply.into_application()),
            Err(_) => {
                debug!("{path} -> non-record ack ({} bytes)", body.len());
                Ok(None)
            }
        }
    }

    async fn list_resumes(&self) -> Result<Vec<Resume>, ClientError> {
        let path = "/resumes";
        let envelope: ResumesEnvelope =
            decode(self.send(self.authed(Method::GET, path)?, path).await?).await?;
        Ok(envelope.resumes)
    }

    async fn export_resume_pdf(&self, resume_id: &str) -> Result<Bytes, ClientError> {
        let path = "/resume/export-pdf";
        let request = self
            .authed(Method::POST, path)?
            .query(&[("resume_id", resume_id)]);
        let response = self.send(request, path).await?;
        Ok(response.bytes().await?)
    }
}
