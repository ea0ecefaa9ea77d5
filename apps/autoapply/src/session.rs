//! Session context: the bearer credential and the signed-in user's identity.
//!
//! `SessionContext` is passed to the transport explicitly. `SessionStore`
//! persists only the credential and identity between runs; no entity data is
//! ever written to disk.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backend::Backend;
use crate::errors::ClientError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Response of `POST /auth/register` and `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Shared handle to the current session. Cloning shares the same slot.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        let context = Self::new();
        context.set(session);
        context
    }

    pub fn set(&self, session: Session) {
        *self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(session);
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The bearer token, or `Unauthorized` when nobody is signed in.
    pub fn require_token(&self) -> Result<String, ClientError> {
        self.token()
            .ok_or_else(|| ClientError::Unauthorized("not signed in".to_string()))
    }
}

/// JSON file holding the persisted session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing file means "signed out".
    pub fn load(&self) -> Result<Option<Session>, ClientError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(session_io(&self.path, e)),
        };
        let session = serde_json::from_str(&raw)?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| session_io(parent, e))?;
            }
        }
        let raw = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, raw).map_err(|e| session_io(&self.path, e))?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(session_io(&self.path, e)),
        }
    }
}

fn session_io(path: &Path, e: std::io::Error) -> ClientError {
    ClientError::Session(format!("{}: {e}", path.display()))
}

/// Sign-in lifecycle: set at login/registration, cleared at logout.
pub struct Authenticator {
    backend: Arc<dyn Backend>,
    context: SessionContext,
    store: SessionStore,
}

impl Authenticator {
    pub fn new(backend: Arc<dyn Backend>, context: SessionContext, store: SessionStore) -> Self {
        Self {
            backend,
            context,
            store,
        }
    }

    /// Reinstalls a previously persisted session, if any.
    pub fn restore(&self) -> Result<Option<SessionUser>, ClientError> {
        let Some(session) = self.store.load()? else {
            return Ok(None);
        };
        let user = session.user.clone();
        self.context.set(session);
        Ok(Some(user))
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, ClientError> {
        let session = self
            .backend
            .register(&RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        info!("Registered account for {}", session.user.email);
        self.install(session)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ClientError> {
        let session = self
            .backend
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        info!("Signed in as {}", session.user.email);
        self.install(session)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.context.clear();
        self.store.clear()?;
        info!("Signed out");
        Ok(())
    }

    fn install(&self, session: Session) -> Result<SessionUser, ClientError> {
        let user = session.user.clone();
        self.store.save(&session)?;
        self.context.set(session);
        Ok(user)
    }
}
