use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};

use crate::error::ModelError;
use crate::ids::{ArchiveId, JobId};
use crate::tier::RestoreTier;

/// Lifecycle state of a vault job: `InProgress` -> `Succeeded` | `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JobStatus {
    InProgress,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::InProgress => "InProgress",
            JobStatus::Succeeded => "Succeeded",
            JobStatus::Failed => "Failed",
        }
    }

    pub fn is_completed(self) -> bool {
        !matches!(self, JobStatus::InProgress)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "InProgress" => Ok(JobStatus::InProgress),
            "Succeeded" => Ok(JobStatus::Succeeded),
            "Failed" => Ok(JobStatus::Failed),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

/// What a job does. Only [`JobAction::ArchiveRetrieval`] jobs matter for
/// restores; the rest are carried so they can be reported and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JobAction {
    ArchiveRetrieval,
    InventoryRetrieval,
    Select,
    Other(String),
}

impl JobAction {
    /// Map the service's action code onto a typed action.
    pub fn from_service(code: &str) -> Self {
        match code {
            "ArchiveRetrieval" => JobAction::ArchiveRetrieval,
            "InventoryRetrieval" => JobAction::InventoryRetrieval,
            "Select" => JobAction::Select,
            other => JobAction::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobAction::ArchiveRetrieval => "ArchiveRetrieval",
            JobAction::InventoryRetrieval => "InventoryRetrieval",
            JobAction::Select => "Select",
            JobAction::Other(code) => code,
        }
    }
}

impl fmt::Display for JobAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observed state of a remote job.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Job {
    pub job_id: JobId,
    pub action: JobAction,
    /// Set for retrieval jobs only.
    pub archive_id: Option<ArchiveId>,
    pub status: JobStatus,
    pub creation_date: Option<DateTime<Utc>>,
    pub completion_date: Option<DateTime<Utc>>,
    /// Description supplied when the job was initiated. Retrieval jobs
    /// created by thaw store the restore-relative destination path here.
    pub description: Option<String>,
    pub archive_size_bytes: Option<u64>,
    pub status_message: Option<String>,
    pub tier: Option<RestoreTier>,
}

impl Job {
    pub fn new(job_id: JobId, action: JobAction, status: JobStatus) -> Self {
        Self {
            job_id,
            action,
            archive_id: None,
            status,
            creation_date: None,
            completion_date: None,
            description: None,
            archive_size_bytes: None,
            status_message: None,
            tier: None,
        }
    }

    pub fn retrieval(
        job_id: JobId,
        archive_id: ArchiveId,
        status: JobStatus,
    ) -> Self {
        Self {
            archive_id: Some(archive_id),
            ..Self::new(job_id, JobAction::ArchiveRetrieval, status)
        }
    }

    /// Record of a retrieval job initiated during the current run, before the
    /// service has reported anything back about it.
    pub fn initiated(
        job_id: JobId,
        archive_id: ArchiveId,
        description: String,
        tier: RestoreTier,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            creation_date: Some(now),
            description: Some(description),
            tier: Some(tier),
            ..Self::retrieval(job_id, archive_id, JobStatus::InProgress)
        }
    }

    pub fn is_archive_retrieval(&self) -> bool {
        self.action == JobAction::ArchiveRetrieval
    }

    /// Archive id for retrieval jobs; `None` for every other action.
    pub fn retrieval_archive_id(&self) -> Option<&ArchiveId> {
        if self.is_archive_retrieval() {
            self.archive_id.as_ref()
        } else {
            None
        }
    }

    /// Human-readable creation time for log lines.
    pub fn created_display(&self) -> String {
        self.creation_date
            .map(|date| date.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
