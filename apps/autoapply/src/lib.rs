pub mod api_client;
pub mod applications;
pub mod apply;
pub mod backend;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod inflight;
pub mod jobs;
pub mod models;
pub mod profile;
pub mod resumes;
pub mod session;

#[cfg(test)]
mod testing;
