use chrono::Utc;
use thaw_model::{ArchiveId, Inventory, Job, JobId};
use tracing::{info, warn};

use super::{RestoreOrchestrator, RestoreStore};
use crate::error::{Result, ThawError};
use crate::ports::{JobInitiator, RetrievalRequest};
use crate::reconciler::JobIndex;

/// Outcome of the initiation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitiationReport {
    /// Jobs created this run, in inventory order.
    pub created: Vec<(ArchiveId, JobId)>,
    pub skipped_existing_job: usize,
    pub skipped_on_disk: usize,
    pub skipped_unrestorable: usize,
}

impl InitiationReport {
    pub fn skipped(&self) -> usize {
        self.skipped_existing_job
            + self.skipped_on_disk
            + self.skipped_unrestorable
    }
}

impl<S: RestoreStore> RestoreOrchestrator<S> {
    /// Create a retrieval job for every inventory archive that has neither an
    /// indexed job nor a restored file.
    ///
    /// New jobs are recorded in `index`, so an archive listed twice in the
    /// inventory still only gets one job. Any initiation failure aborts the
    /// pass.
    pub async fn initiate_missing(
        &self,
        initiator: &dyn JobInitiator,
        inventory: &Inventory,
        index: &mut JobIndex,
    ) -> Result<InitiationReport> {
        let mut report = InitiationReport::default();

        for archive in &inventory.archives {
            if let Some(existing) = index.get(&archive.archive_id) {
                info!(
                    archive_id = %archive.archive_id,
                    job_id = %existing.job_id,
                    status = %existing.status,
                    created = %existing.created_display(),
                    "existing job for archive"
                );
                report.skipped_existing_job += 1;
                continue;
            }

            let target = match self.layout.target_for(&archive.logical_path) {
                Ok(target) => target,
                Err(err) => {
                    warn!(
                        archive_id = %archive.archive_id,
                        logical_path = %archive.logical_path,
                        error = %err,
                        "skipping archive without a usable restore path"
                    );
                    report.skipped_unrestorable += 1;
                    continue;
                }
            };

            if self.store.exists(&target).await? {
                info!(
                    archive_id = %archive.archive_id,
                    path = %target.display(),
                    "skipping existing file"
                );
                report.skipped_on_disk += 1;
                continue;
            }

            let request = RetrievalRequest {
                archive_id: archive.archive_id.clone(),
                description: archive.logical_path.clone(),
                tier: self.tier,
            };
            let job_id = initiator
                .initiate_retrieval_job(&request)
                .await
                .map_err(|source| ThawError::Initiate {
                    archive_id: archive.archive_id.clone(),
                    source,
                })?;

            info!(
                archive_id = %archive.archive_id,
                job_id = %job_id,
                tier = %self.tier,
                "created retrieval job"
            );

            index.record(&Job::initiated(
                job_id.clone(),
                request.archive_id,
                request.description,
                request.tier,
                Utc::now(),
            ));
            report.created.push((archive.archive_id.clone(), job_id));
        }

        info!(
            created = report.created.len(),
            skipped = report.skipped(),
            "initiation pass finished"
        );
        Ok(report)
    }
}
