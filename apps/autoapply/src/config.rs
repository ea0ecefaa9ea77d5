use std::path::PathBuf;

use anyhow::{Context, Result};

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL including the `/api` prefix, without a trailing slash.
    pub api_url: String,
    pub session_file: PathBuf,
    pub export_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let session_file = match std::env::var("AUTOAPPLY_SESSION_FILE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_session_file()?,
        };

        Ok(Config {
            api_url: require_env("AUTOAPPLY_API_URL")?
                .trim_end_matches('/')
                .to_string(),
            session_file,
            export_dir: std::env::var("AUTOAPPLY_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn default_session_file() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "autoapply")
        .context("Could not determine a data directory; set AUTOAPPLY_SESSION_FILE")?;
    Ok(dirs.data_dir().join("session.json"))
}
