//! Repository traits describing the job data source.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::JobRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("data source request failed: {0}")]
    Transport(String),
    #[error("data source responded with status {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("data source payload could not be decoded: {0}")]
    Decode(String),
    #[error("data source is not configured: {0}")]
    Configuration(String),
}

impl RepoError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Read-only access to published jobs.
#[async_trait]
pub trait JobsRepo: Send + Sync {
    /// All active jobs, newest posting first.
    async fn list_active_jobs(&self) -> Result<Vec<JobRecord>, RepoError>;

    /// A single job; missing and inactive records both resolve to `None`.
    async fn find_active_job(&self, id: &str) -> Result<Option<JobRecord>, RepoError>;
}
