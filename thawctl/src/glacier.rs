//! SDK-backed implementation of the vault ports.

use std::{error::Error as StdError, fmt};

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_glacier::Client;
use aws_sdk_glacier::config::Region;
use aws_sdk_glacier::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_glacier::types::{GlacierJobDescription, JobParameters};
use chrono::{DateTime, Utc};
use thaw_core::model::{Job, JobAction, JobId, JobStatus};
use thaw_core::{
    JobFilter, JobInitiator, JobListing, JobOutcome, JobOutput,
    JobOutputFetcher, JobPage, RemoteError, RemoteErrorKind, RetrievalRequest,
    VaultTarget,
};
use tracing::{debug, warn};

const ARCHIVE_RETRIEVAL: &str = "archive-retrieval";

#[derive(Debug)]
pub struct GlacierVault {
    client: Client,
    target: VaultTarget,
}

impl GlacierVault {
    /// Build a client from the ambient credential chain for `region`.
    pub async fn connect(target: VaultTarget, region: String) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .load()
            .await;
        Self::new(Client::new(&config), target)
    }

    pub fn new(client: Client, target: VaultTarget) -> Self {
        Self { client, target }
    }
}

#[async_trait]
impl JobListing for GlacierVault {
    async fn list_jobs_page(
        &self,
        filter: JobFilter,
        marker: Option<String>,
    ) -> Result<JobPage, RemoteError> {
        let output = self
            .client
            .list_jobs()
            .account_id(&self.target.account_id)
            .vault_name(&self.target.vault_name)
            .set_marker(marker)
            .set_completed(filter.completed.map(|c| c.to_string()))
            .set_statuscode(filter.outcome.map(|outcome| {
                match outcome {
                    JobOutcome::Succeeded => JobStatus::Succeeded,
                    JobOutcome::Failed => JobStatus::Failed,
                }
                .as_str()
                .to_string()
            }))
            .send()
            .await
            .map_err(remote_error)?;

        let mut jobs = Vec::with_capacity(output.job_list().len());
        for description in output.job_list() {
            match job_from_description(description) {
                Ok(job) => jobs.push(job),
                Err(err) => {
                    warn!(error = %err, "skipping unreadable job description")
                }
            }
        }
        debug!(
            jobs = jobs.len(),
            more = output.marker().is_some(),
            "listed job page"
        );

        Ok(JobPage {
            jobs,
            marker: output.marker().map(str::to_string),
        })
    }
}

#[async_trait]
impl JobInitiator for GlacierVault {
    async fn initiate_retrieval_job(
        &self,
        request: &RetrievalRequest,
    ) -> Result<JobId, RemoteError> {
        let parameters = JobParameters::builder()
            .r#type(ARCHIVE_RETRIEVAL)
            .archive_id(request.archive_id.as_str())
            .description(&request.description)
            .tier(request.tier.as_str())
            .build();

        let output = self
            .client
            .initiate_job()
            .account_id(&self.target.account_id)
            .vault_name(&self.target.vault_name)
            .job_parameters(parameters)
            .send()
            .await
            .map_err(remote_error)?;

        output.job_id().map(JobId::from).ok_or_else(|| {
            RemoteError::other("initiate-job response carried no job id")
        })
    }
}

#[async_trait]
impl JobOutputFetcher for GlacierVault {
    async fn get_job_output(
        &self,
        job_id: &JobId,
    ) -> Result<JobOutput, RemoteError> {
        let output = self
            .client
            .get_job_output()
            .account_id(&self.target.account_id)
            .vault_name(&self.target.vault_name)
            .job_id(job_id.as_str())
            .send()
            .await
            .map_err(remote_error)?;

        let archive_description =
            output.archive_description().map(str::to_string);
        let body = output
            .body
            .collect()
            .await
            .map_err(|err| {
                RemoteError::other(format!("reading job output body: {err}"))
            })?
            .into_bytes()
            .to_vec();

        Ok(JobOutput {
            archive_description,
            body,
        })
    }
}

fn remote_error<E, R>(err: SdkError<E, R>) -> RemoteError
where
    E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
    R: fmt::Debug,
{
    let kind = err
        .code()
        .map(RemoteErrorKind::from_code)
        .unwrap_or(RemoteErrorKind::Other);
    RemoteError::new(kind, DisplayErrorContext(&err).to_string())
}

/// Translate one listed job into the model type.
pub(crate) fn job_from_description(
    description: &GlacierJobDescription,
) -> Result<Job, RemoteError> {
    let job_id = description
        .job_id()
        .filter(|id| !id.is_empty())
        .map(JobId::from)
        .ok_or_else(|| RemoteError::other("listed job has no job id"))?;
    let status = description
        .status_code()
        .ok_or_else(|| RemoteError::other(format!("job {job_id} has no status")))?
        .as_str()
        .parse::<JobStatus>()
        .map_err(|err| RemoteError::other(format!("job {job_id}: {err}")))?;
    let action = description
        .action()
        .map(|action| JobAction::from_service(action.as_str()))
        .unwrap_or_else(|| JobAction::Other(String::new()));

    let mut job = Job::new(job_id, action, status);
    job.archive_id = description.archive_id().map(Into::into);
    job.creation_date = description.creation_date().and_then(parse_timestamp);
    job.completion_date =
        description.completion_date().and_then(parse_timestamp);
    job.description = description.job_description().map(str::to_string);
    job.archive_size_bytes = description
        .archive_size_in_bytes()
        .and_then(|size| u64::try_from(size).ok());
    job.status_message = description.status_message().map(str::to_string);
    job.tier = description.tier().and_then(|tier| tier.parse().ok());
    Ok(job)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
}
