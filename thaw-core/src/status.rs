//! Log-line status report for existing jobs.

use thaw_model::Inventory;
use tracing::{info, warn};

use crate::reconciler::JobSnapshot;

/// How much of an inventory is covered by indexed jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryCoverage {
    pub archives: usize,
    pub with_job: usize,
    pub without_job: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub failed: usize,
    pub succeeded: usize,
    pub in_progress: usize,
    /// Declared size of succeeded retrieval jobs, i.e. what a download pass
    /// would fetch if nothing is on disk yet.
    pub bytes_ready: u64,
    pub coverage: Option<InventoryCoverage>,
}

impl StatusReport {
    pub fn build(snapshot: &JobSnapshot, inventory: Option<&Inventory>) -> Self {
        let bytes_ready = snapshot
            .succeeded
            .iter()
            .filter(|job| job.is_archive_retrieval())
            .filter_map(|job| job.archive_size_bytes)
            .sum();

        let coverage = inventory.map(|inventory| {
            let with_job = inventory
                .archives
                .iter()
                .filter(|archive| snapshot.index.contains(&archive.archive_id))
                .count();
            InventoryCoverage {
                archives: inventory.len(),
                with_job,
                without_job: inventory.len() - with_job,
            }
        });

        Self {
            failed: snapshot.failed.len(),
            succeeded: snapshot.succeeded.len(),
            in_progress: snapshot.in_progress.len(),
            bytes_ready,
            coverage,
        }
    }

    /// Build the report and log it, listing failed jobs individually.
    pub fn log(snapshot: &JobSnapshot, inventory: Option<&Inventory>) -> Self {
        let report = Self::build(snapshot, inventory);

        for job in &snapshot.failed {
            warn!(
                job_id = %job.job_id,
                archive_id = ?job.archive_id,
                action = %job.action,
                message = job.status_message.as_deref().unwrap_or(""),
                "failed job"
            );
        }

        info!(
            failed = report.failed,
            succeeded = report.succeeded,
            in_progress = report.in_progress,
            bytes_ready = report.bytes_ready,
            "job status"
        );
        if let Some(coverage) = report.coverage {
            info!(
                archives = coverage.archives,
                with_job = coverage.with_job,
                without_job = coverage.without_job,
                "inventory coverage"
            );
        }
        report
    }
}
