use thaw_model::Job;
use tracing::{info, warn};

use super::{RestoreOrchestrator, RestoreStore};
use crate::error::{Result, ThawError};
use crate::ports::JobOutputFetcher;

/// Outcome of the download pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub downloaded: usize,
    pub bytes_written: u64,
    pub skipped_on_disk: usize,
    pub skipped_missing_description: usize,
    pub skipped_unrestorable: usize,
}

impl DownloadReport {
    pub fn skipped(&self) -> usize {
        self.skipped_on_disk
            + self.skipped_missing_description
            + self.skipped_unrestorable
    }
}

impl<S: RestoreStore> RestoreOrchestrator<S> {
    /// Fetch and write the output of every succeeded retrieval job whose
    /// restore target doesn't exist yet. Fetch or write failures abort the
    /// pass.
    pub async fn download_completed(
        &self,
        fetcher: &dyn JobOutputFetcher,
        succeeded: &[Job],
    ) -> Result<DownloadReport> {
        let mut report = DownloadReport::default();

        for job in succeeded.iter().filter(|job| job.is_archive_retrieval()) {
            let Some(description) = job.description.as_deref() else {
                warn!(
                    job_id = %job.job_id,
                    archive_id = ?job.archive_id,
                    "skipping job with empty description"
                );
                report.skipped_missing_description += 1;
                continue;
            };

            let target = match self.layout.target_for(description) {
                Ok(target) => target,
                Err(err) => {
                    warn!(
                        job_id = %job.job_id,
                        description,
                        error = %err,
                        "skipping job without a usable restore path"
                    );
                    report.skipped_unrestorable += 1;
                    continue;
                }
            };

            if self.store.exists(&target).await? {
                info!(
                    job_id = %job.job_id,
                    path = %target.display(),
                    "skipping existing file"
                );
                report.skipped_on_disk += 1;
                continue;
            }

            let output = fetcher.get_job_output(&job.job_id).await.map_err(
                |source| ThawError::JobOutput {
                    job_id: job.job_id.clone(),
                    source,
                },
            )?;

            info!(
                job_id = %job.job_id,
                bytes = output.body.len(),
                declared_bytes = ?job.archive_size_bytes,
                path = %target.display(),
                "restoring job output"
            );
            self.store.write(&target, &output.body).await?;

            report.downloaded += 1;
            report.bytes_written += output.body.len() as u64;
        }

        info!(
            downloaded = report.downloaded,
            bytes = report.bytes_written,
            skipped = report.skipped(),
            "download pass finished"
        );
        Ok(report)
    }
}
