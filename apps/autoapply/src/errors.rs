use serde::Deserialize;
use thiserror::Error;

/// Client-level error type.
/// Every component returns `Result<T, ClientError>`; front ends turn failures into
/// a [`Notification`] instead of aborting.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Server error (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Operation already in flight for {key}")]
    InFlight { key: String },

    #[error("Session storage error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification used to decide how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or rejected credential. The user must sign in again.
    Authentication,
    /// The backend refused the request as invalid. No state changed.
    Validation,
    /// Network, server or decoding failure. Not retried.
    Transient,
    /// Another operation on the same entity is still pending.
    Busy,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Unauthorized(_) => ErrorKind::Authentication,
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::InFlight { .. } => ErrorKind::Busy,
            ClientError::Server { .. }
            | ClientError::Transport(_)
            | ClientError::Decode(_)
            | ClientError::Session(_)
            | ClientError::Io(_) => ErrorKind::Transient,
        }
    }

    /// Maps a non-success HTTP status and its body onto the taxonomy.
    /// FastAPI-style `{"detail": "..."}` bodies contribute their message.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or_else(|| body.to_string());

        match status {
            401 | 403 => ClientError::Unauthorized(message),
            400 | 404 | 409 | 422 => ClientError::Validation(message),
            _ => ClientError::Server { status, message },
        }
    }

    /// Converts this error into the user-visible notification for `action`.
    pub fn notification(&self, action: &str) -> Notification {
        match self.kind() {
            ErrorKind::Authentication => Notification {
                level: NotificationLevel::Error,
                message: format!("{action}: please sign in again"),
                reauthenticate: true,
            },
            ErrorKind::Validation => Notification {
                level: NotificationLevel::Error,
                message: match self {
                    ClientError::Validation(detail) if !detail.is_empty() => detail.clone(),
                    _ => format!("{action} failed"),
                },
                reauthenticate: false,
            },
            ErrorKind::Transient => Notification {
                level: NotificationLevel::Error,
                message: format!("Failed to {}", action.to_lowercase()),
                reauthenticate: false,
            },
            ErrorKind::Busy => Notification {
                level: NotificationLevel::Warning,
                message: format!("{action} is already in progress"),
                reauthenticate: false,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// A non-fatal, user-visible message produced at the end of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// Set when the front end should send the user back to sign-in.
    pub reauthenticate: bool,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            reauthenticate: false,
        }
    }
}
