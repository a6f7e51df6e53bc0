//! Deterministic in-memory vault for tests and local experiments.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use thaw_model::{Job, JobId, JobStatus};

use crate::error::{RemoteError, RemoteErrorKind};
use crate::ports::{
    JobFilter, JobInitiator, JobListing, JobOutput, JobOutputFetcher, JobPage,
    JobQuery, RetrievalRequest,
};

#[derive(Debug, Default)]
struct VaultState {
    jobs: Vec<Job>,
    outputs: HashMap<JobId, Vec<u8>>,
    page_size: Option<usize>,
    listing_failures: HashMap<JobFilter, RemoteError>,
    initiation_failure: Option<RemoteError>,
    initiated: Vec<RetrievalRequest>,
    output_fetches: Vec<JobId>,
    pages_served: usize,
    next_job: u64,
}

/// Vault whose jobs live in a `Vec`, listed in insertion order.
///
/// Initiated jobs are appended as in-progress jobs, so a later reconciliation
/// against the same vault sees them just like the real service would.
#[derive(Debug, Default)]
pub struct MemoryVault {
    state: Mutex<VaultState>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve listings `size` jobs at a time. Unpaged by default.
    pub fn with_page_size(self, size: usize) -> Self {
        self.state().page_size = Some(size.max(1));
        self
    }

    pub fn push_job(&self, job: Job) {
        self.state().jobs.push(job);
    }

    /// Add a succeeded job together with the output it will hand out.
    pub fn push_completed(&self, mut job: Job, body: impl Into<Vec<u8>>) {
        job.status = JobStatus::Succeeded;
        let mut state = self.state();
        state.outputs.insert(job.job_id.clone(), body.into());
        state.jobs.push(job);
    }

    pub fn fail_listing(&self, query: JobQuery, error: RemoteError) {
        self.state().listing_failures.insert(query.filter(), error);
    }

    pub fn fail_initiation(&self, error: RemoteError) {
        self.state().initiation_failure = Some(error);
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.state().jobs.clone()
    }

    /// Retrieval requests received so far.
    pub fn initiated(&self) -> Vec<RetrievalRequest> {
        self.state().initiated.clone()
    }

    /// Job ids whose output has been fetched, in call order.
    pub fn output_fetches(&self) -> Vec<JobId> {
        self.state().output_fetches.clone()
    }

    pub fn pages_served(&self) -> usize {
        self.state().pages_served
    }

    fn state(&self) -> MutexGuard<'_, VaultState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl JobListing for MemoryVault {
    async fn list_jobs_page(
        &self,
        filter: JobFilter,
        marker: Option<String>,
    ) -> Result<JobPage, RemoteError> {
        let mut state = self.state();
        if let Some(error) = state.listing_failures.get(&filter) {
            return Err(error.clone());
        }

        let offset = match marker {
            Some(marker) => marker.parse::<usize>().map_err(|_| {
                RemoteError::new(
                    RemoteErrorKind::InvalidParameter,
                    format!("invalid marker {marker}"),
                )
            })?,
            None => 0,
        };

        let matching: Vec<Job> = state
            .jobs
            .iter()
            .filter(|job| filter.matches(job))
            .cloned()
            .collect();
        let page_size = state.page_size.unwrap_or(matching.len().max(1));
        let end = (offset + page_size).min(matching.len());
        let jobs = matching
            .get(offset..end)
            .map(<[Job]>::to_vec)
            .unwrap_or_default();
        let marker = (end < matching.len()).then(|| end.to_string());

        state.pages_served += 1;
        Ok(JobPage { jobs, marker })
    }
}

#[async_trait]
impl JobInitiator for MemoryVault {
    async fn initiate_retrieval_job(
        &self,
        request: &RetrievalRequest,
    ) -> Result<JobId, RemoteError> {
        let mut state = self.state();
        if let Some(error) = &state.initiation_failure {
            return Err(error.clone());
        }

        state.next_job += 1;
        let job_id = JobId(format!("job-{}", state.next_job));
        state.initiated.push(request.clone());
        state.jobs.push(Job::initiated(
            job_id.clone(),
            request.archive_id.clone(),
            request.description.clone(),
            request.tier,
            Utc::now(),
        ));
        Ok(job_id)
    }
}

#[async_trait]
impl JobOutputFetcher for MemoryVault {
    async fn get_job_output(
        &self,
        job_id: &JobId,
    ) -> Result<JobOutput, RemoteError> {
        let mut state = self.state();
        state.output_fetches.push(job_id.clone());

        let body = state.outputs.get(job_id).cloned().ok_or_else(|| {
            RemoteError::new(
                RemoteErrorKind::ResourceNotFound,
                format!("no output for job {job_id}"),
            )
        })?;
        let archive_description = state
            .jobs
            .iter()
            .find(|job| &job.job_id == job_id)
            .and_then(|job| job.description.clone());

        Ok(JobOutput {
            archive_description,
            body,
        })
    }
}
