//! Narrow capability contracts for the remote vault service.
//!
//! The reconciler and orchestrator only ever see these traits. `thawctl`
//! provides the SDK-backed implementation; [`crate::testing::MemoryVault`]
//! provides a deterministic in-memory one.

use std::fmt;

use async_trait::async_trait;
use thaw_model::{ArchiveId, Job, JobId, JobStatus, RestoreTier};

use crate::error::RemoteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobOutcome {
    Succeeded,
    Failed,
}

/// Listing filter. `None` fields are not sent to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct JobFilter {
    pub completed: Option<bool>,
    pub outcome: Option<JobOutcome>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(completed) = self.completed
            && job.status.is_completed() != completed
        {
            return false;
        }
        match self.outcome {
            Some(JobOutcome::Succeeded) => job.status == JobStatus::Succeeded,
            Some(JobOutcome::Failed) => job.status == JobStatus::Failed,
            None => true,
        }
    }
}

/// The three listing queries issued by the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobQuery {
    Succeeded,
    Failed,
    InProgress,
}

impl JobQuery {
    pub fn filter(self) -> JobFilter {
        match self {
            JobQuery::Succeeded => JobFilter {
                completed: Some(true),
                outcome: Some(JobOutcome::Succeeded),
            },
            JobQuery::Failed => JobFilter {
                completed: Some(true),
                outcome: Some(JobOutcome::Failed),
            },
            JobQuery::InProgress => JobFilter {
                completed: Some(false),
                outcome: None,
            },
        }
    }
}

impl fmt::Display for JobQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobQuery::Succeeded => "succeeded",
            JobQuery::Failed => "failed",
            JobQuery::InProgress => "in-progress",
        })
    }
}

/// One page of a job listing. `marker` is the continuation token; `None`
/// means the listing is exhausted.
#[derive(Debug, Clone, Default)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub marker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalRequest {
    pub archive_id: ArchiveId,
    /// Stored on the job and echoed back on completion; carries the
    /// restore-relative destination path.
    pub description: String,
    pub tier: RestoreTier,
}

/// Downloaded job output. The service only hands this out once, so callers
/// must persist `body` before dropping it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutput {
    pub archive_description: Option<String>,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait JobListing: Send + Sync {
    async fn list_jobs_page(
        &self,
        filter: JobFilter,
        marker: Option<String>,
    ) -> Result<JobPage, RemoteError>;
}

#[async_trait]
pub trait JobInitiator: Send + Sync {
    async fn initiate_retrieval_job(
        &self,
        request: &RetrievalRequest,
    ) -> Result<JobId, RemoteError>;
}

#[async_trait]
pub trait JobOutputFetcher: Send + Sync {
    async fn get_job_output(
        &self,
        job_id: &JobId,
    ) -> Result<JobOutput, RemoteError>;
}

/// Everything the run driver needs from the vault.
pub trait VaultClient: JobListing + JobInitiator + JobOutputFetcher {}

impl<T> VaultClient for T where T: JobListing + JobInitiator + JobOutputFetcher
{}
