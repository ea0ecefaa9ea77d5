use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use autoapply::api_client::ApiClient;
use autoapply::applications::ApplicationLifecycleManager;
use autoapply::apply::{apply_notification, AutoApplyOrchestrator};
use autoapply::backend::Backend;
use autoapply::config::Config;
use autoapply::dashboard::DashboardSummary;
use autoapply::errors::{ClientError, Notification, NotificationLevel};
use autoapply::jobs::JobCatalogClient;
use autoapply::models::application::{ApplicationStatus, StatusFilter};
use autoapply::models::job::PlatformFilter;
use autoapply::models::profile::UserProfile;
use autoapply::profile::ProfileStore;
use autoapply::resumes::ResumeArchive;
use autoapply::session::{Authenticator, SessionContext, SessionStore};

#[derive(Parser)]
#[command(name = "autoapply", version, about = "Job search and auto-apply client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and sign in
    Register {
        name: String,
        email: String,
        password: String,
    },
    /// Sign in with an existing account
    Login { email: String, password: String },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show or replace the profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Search job postings
    Jobs {
        /// all, linkedin, indeed or wellfound
        #[arg(long, default_value = "all")]
        platform: PlatformFilter,
        /// Case-insensitive match on title or company
        #[arg(long)]
        search: Option<String>,
    },
    /// Apply to a job; the backend generates a resume and cover letter
    Apply { job_id: String },
    /// List applications
    Applications {
        /// all, applied, interview, rejected or offer
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    /// Change the status of an application
    Status {
        application_id: String,
        status: ApplicationStatus,
    },
    /// List generated resumes
    Resumes,
    /// Export a resume as PDF
    Export {
        resume_id: String,
        /// Output directory, defaults to AUTOAPPLY_EXPORT_DIR
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Application and resume counters
    Dashboard,
    /// Check that the backend is reachable
    Health,
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    /// Replace the whole profile with the contents of a JSON file.
    /// A missing `user_id` is taken from the signed-in session.
    Save { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("autoapply v{} using {}", env!("CARGO_PKG_VERSION"), config.api_url);

    let session = SessionContext::new();
    let client = Arc::new(ApiClient::new(config.api_url.clone(), session.clone())?);
    let backend: Arc<dyn Backend> = client.clone();
    let auth = Authenticator::new(
        backend.clone(),
        session.clone(),
        SessionStore::new(config.session_file.clone()),
    );
    auth.restore()
        .with_context(|| format!("Failed to read session from {}", config.session_file.display()))?;

    match cli.command {
        Command::Register {
            name,
            email,
            password,
        } => {
            if let Some(user) = report("Register", auth.register(&name, &email, &password).await)? {
                println!("Registered and signed in as {} <{}>", user.name, user.email);
            }
        }
        Command::Login { email, password } => {
            if let Some(user) = report("Login", auth.login(&email, &password).await)? {
                println!("Signed in as {} <{}>", user.name, user.email);
            }
        }
        Command::Logout => {
            auth.logout().context("Failed to clear session")?;
            println!("Signed out");
        }
        Command::Whoami => match session.user() {
            Some(user) => println!("{} <{}> ({})", user.name, user.email, user.id),
            None => println!("Not signed in"),
        },
        Command::Profile { action } => {
            let store = ProfileStore::new(backend.clone());
            match action {
                ProfileAction::Show => {
                    if let Some(profile) = report("Load profile", store.load().await)? {
                        if profile.is_blank() {
                            println!("Profile is empty; fill it in with `autoapply profile save <file.json>`");
                        }
                        println!("{}", serde_json::to_string_pretty(&profile)?);
                    }
                }
                ProfileAction::Save { file } => {
                    let raw = std::fs::read_to_string(&file)
                        .with_context(|| format!("Failed to read {}", file.display()))?;
                    let mut profile: UserProfile = serde_json::from_str(&raw)
                        .with_context(|| format!("Invalid profile JSON in {}", file.display()))?;
                    if let Some(user) = session.user() {
                        profile.claim_for(&user.id);
                    }
                    if report("Save profile", store.save(profile).await)?.is_some() {
                        notify(&Notification::success("Profile saved successfully!"));
                    }
                }
            }
        }
        Command::Jobs { platform, search } => {
            let catalog = JobCatalogClient::new(backend.clone());
            if let Some(term) = &search {
                catalog.set_term(term);
            }
            if let Some(jobs) = report("Search jobs", catalog.search(platform).await)? {
                println!("{} of {} postings", jobs.len(), catalog.postings().len());
                for job in jobs {
                    let score = job
                        .compatibility_score
                        .map(|s| format!("{s}%"))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<38} {:>4} {:<8} {:<10} {} @ {} ({})",
                        job.id,
                        score,
                        job.score_tier().label(),
                        job.platform,
                        job.title,
                        job.company,
                        job.location
                    );
                }
            }
        }
        Command::Apply { job_id } => {
            let orchestrator = AutoApplyOrchestrator::new(backend.clone());
            let result = orchestrator.apply(&job_id).await;
            notify(&apply_notification(&result));
        }
        Command::Applications { status } => {
            let manager = ApplicationLifecycleManager::new(backend.clone());
            if report("Load applications", manager.list().await)?.is_some() {
                for app in manager.filtered(status) {
                    println!(
                        "{:<38} {:<10} {} @ {} (applied {})",
                        app.id,
                        app.status.as_str(),
                        app.job_title,
                        app.company,
                        app.applied_at.format("%Y-%m-%d")
                    );
                }
            }
        }
        Command::Status {
            application_id,
            status,
        } => {
            let manager = ApplicationLifecycleManager::new(backend.clone());
            if report("Load applications", manager.list().await)?.is_some() {
                let result = manager.update_status(&application_id, status).await;
                if report("Update status", result)?.is_some() {
                    notify(&Notification::success(format!("Status updated to {status}")));
                }
            }
        }
        Command::Resumes => {
            let archive = ResumeArchive::new(backend.clone());
            if let Some(resumes) = report("Load resumes", archive.list().await)? {
                for resume in resumes {
                    println!(
                        "{:<38} {} ({})",
                        resume.id,
                        resume.job_title,
                        resume.created_at.format("%Y-%m-%d")
                    );
                    if !resume.keywords.is_empty() {
                        println!("    {}", resume.display_keywords().join(", "));
                    }
                }
            }
        }
        Command::Export { resume_id, out } => {
            let archive = ResumeArchive::new(backend.clone());
            let dir = out.unwrap_or_else(|| config.export_dir.clone());
            if let Some(path) = report("Export PDF", archive.export_pdf_to(&resume_id, &dir).await)? {
                notify(&Notification::success(format!("Saved {}", path.display())));
            }
        }
        Command::Dashboard => {
            if let Some(summary) = report("Load dashboard", DashboardSummary::load(backend.as_ref()).await)? {
                println!("Total applications: {}", summary.total_applications);
                println!("Applied:            {}", summary.applied);
                println!("Interviews:         {}", summary.interview);
                println!("Resumes generated:  {}", summary.total_resumes);
                if !summary.recent.is_empty() {
                    println!("\nRecent applications:");
                    for app in &summary.recent {
                        println!("  {:<10} {} @ {}", app.status.as_str(), app.job_title, app.company);
                    }
                }
            }
        }
        Command::Health => {
            if let Some(health) = report("Health check", client.health().await)? {
                println!("Backend status: {}", health.status);
            }
        }
    }

    Ok(())
}

/// Prints component failures as notifications. Only session file failures
/// abort the process.
fn report<T>(action: &str, result: Result<T, ClientError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ClientError::Session(message)) => anyhow::bail!("Session storage failed: {message}"),
        Err(e) => {
            notify(&e.notification(action));
            Ok(None)
        }
    }
}

fn notify(notification: &Notification) {
    let tag = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Warning => "warning",
        NotificationLevel::Error => "error",
    };
    println!("[{tag}] {}", notification.message);
    if notification.reauthenticate {
        println!("Run `autoapply login <email> <password>` to sign in again.");
    }
}
