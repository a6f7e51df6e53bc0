//! Classification of existing vault jobs and the per-run job index.

use std::collections::HashMap;

use thaw_model::{ArchiveId, Job};
use tracing::{info, warn};

use crate::config::RestoreConfig;
use crate::error::{RemoteError, Result, ThawError};
use crate::ports::{JobFilter, JobListing, JobQuery};

/// Archive id -> the single most relevant existing retrieval job.
///
/// Only archive-retrieval jobs that carry an archive id are ever indexed.
#[derive(Debug, Clone, Default)]
pub struct JobIndex {
    entries: HashMap<ArchiveId, Job>,
}

impl JobIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `jobs` in order. A later job for an already indexed archive
    /// replaces the earlier one and a warning is logged.
    pub fn build<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> Self {
        let mut index = Self::new();
        for job in jobs {
            if let (Some(previous), Some(archive_id)) =
                (index.record(job), job.archive_id.as_ref())
            {
                warn!(
                    archive_id = %archive_id,
                    previous_job_id = %previous.job_id,
                    job_id = %job.job_id,
                    "duplicate retrieval job for archive"
                );
            }
        }
        index
    }

    /// Insert a retrieval job, returning the entry it replaced. Jobs of any
    /// other action, or without an archive id, are ignored.
    pub fn record(&mut self, job: &Job) -> Option<Job> {
        let archive_id = job.retrieval_archive_id()?;
        self.entries.insert(archive_id.clone(), job.clone())
    }

    pub fn get(&self, archive_id: &ArchiveId) -> Option<&Job> {
        self.entries.get(archive_id)
    }

    pub fn contains(&self, archive_id: &ArchiveId) -> bool {
        self.entries.contains_key(archive_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Jobs observed at the start of a run.
#[derive(Debug, Clone, Default)]
pub struct JobSnapshot {
    pub succeeded: Vec<Job>,
    pub failed: Vec<Job>,
    pub in_progress: Vec<Job>,
    pub index: JobIndex,
}

/// Drain a paginated listing. Pagination stops once more than `max_count`
/// jobs have been collected; the page that crossed the cap is kept whole.
pub async fn collect_jobs(
    listing: &dyn JobListing,
    filter: JobFilter,
    max_count: usize,
) -> std::result::Result<Vec<Job>, RemoteError> {
    let mut jobs = Vec::new();
    let mut marker = None;
    loop {
        let page = listing.list_jobs_page(filter, marker).await?;
        jobs.extend(page.jobs);
        if jobs.len() > max_count {
            break;
        }
        match page.marker {
            Some(next) => marker = Some(next),
            None => break,
        }
    }
    Ok(jobs)
}

#[derive(Debug, Clone)]
pub struct JobReconciler {
    max_job_count: usize,
    print_all_jobs: bool,
}

impl JobReconciler {
    pub fn new(max_job_count: usize) -> Self {
        Self {
            max_job_count,
            print_all_jobs: false,
        }
    }

    pub fn from_config(config: &RestoreConfig) -> Self {
        Self {
            max_job_count: config.max_job_count,
            print_all_jobs: config.print_all_jobs,
        }
    }

    /// List failed, succeeded and in-progress jobs and build the index.
    ///
    /// The failed listing is informational: its failure is logged and the
    /// run continues with no failed jobs. Failure of either other listing
    /// aborts reconciliation.
    pub async fn fetch_jobs(
        &self,
        listing: &dyn JobListing,
    ) -> Result<JobSnapshot> {
        let failed = match self.query(listing, JobQuery::Failed).await {
            Ok(jobs) => jobs,
            Err(err) => {
                warn!(error = %err, "failed to retrieve failed jobs");
                Vec::new()
            }
        };

        let succeeded = self.query_required(listing, JobQuery::Succeeded).await?;
        let in_progress =
            self.query_required(listing, JobQuery::InProgress).await?;

        info!(
            failed = failed.len(),
            succeeded = succeeded.len(),
            in_progress = in_progress.len(),
            "fetched vault jobs"
        );

        if self.print_all_jobs {
            for (query, jobs) in [
                (JobQuery::Failed, &failed),
                (JobQuery::Succeeded, &succeeded),
                (JobQuery::InProgress, &in_progress),
            ] {
                for job in jobs {
                    info!(query = %query, job = ?job, "job");
                }
            }
        }

        // Failed jobs stay out of the index so a retry can be initiated.
        let index = JobIndex::build(in_progress.iter().chain(succeeded.iter()));

        Ok(JobSnapshot {
            succeeded,
            failed,
            in_progress,
            index,
        })
    }

    async fn query(
        &self,
        listing: &dyn JobListing,
        query: JobQuery,
    ) -> std::result::Result<Vec<Job>, RemoteError> {
        collect_jobs(listing, query.filter(), self.max_job_count).await
    }

    async fn query_required(
        &self,
        listing: &dyn JobListing,
        query: JobQuery,
    ) -> Result<Vec<Job>> {
        self.query(listing, query).await.map_err(|source| {
            warn!(query = %query, error = %source, "failed to retrieve jobs");
            ThawError::JobListing { query, source }
        })
    }
}
