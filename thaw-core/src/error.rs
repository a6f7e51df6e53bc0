use std::{fmt, path::PathBuf};

use thaw_model::{ArchiveId, JobId, ModelError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::ports::JobQuery;

/// Classification of failures reported by the vault service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorKind {
    ResourceNotFound,
    InvalidParameter,
    MissingParameter,
    ServiceUnavailable,
    Other,
}

impl RemoteErrorKind {
    /// Map a service error code onto a kind. Unknown codes become `Other`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "ResourceNotFoundException" => RemoteErrorKind::ResourceNotFound,
            "InvalidParameterValueException" => {
                RemoteErrorKind::InvalidParameter
            }
            "MissingParameterValueException" => {
                RemoteErrorKind::MissingParameter
            }
            "ServiceUnavailableException" => {
                RemoteErrorKind::ServiceUnavailable
            }
            _ => RemoteErrorKind::Other,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            RemoteErrorKind::ResourceNotFound => "ResourceNotFoundException",
            RemoteErrorKind::InvalidParameter => {
                "InvalidParameterValueException"
            }
            RemoteErrorKind::MissingParameter => {
                "MissingParameterValueException"
            }
            RemoteErrorKind::ServiceUnavailable => {
                "ServiceUnavailableException"
            }
            RemoteErrorKind::Other => "RemoteError",
        }
    }
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Failure returned by a remote vault call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Other, message)
    }
}

#[derive(Debug, Error)]
pub enum ThawError {
    #[error("failed to read inventory {}", .path.display())]
    InventoryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed inventory snapshot")]
    MalformedInventory {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid vault reference in inventory")]
    InvalidVaultReference {
        #[source]
        source: ModelError,
    },

    #[error("malformed description for archive {archive_id}")]
    MalformedDescription {
        archive_id: ArchiveId,
        #[source]
        source: serde_json::Error,
    },

    #[error("restore path {path:?} escapes the restore directory")]
    PathEscape { path: String },

    #[error("restore path is empty")]
    EmptyRestorePath,

    #[error("failed to list {query} jobs")]
    JobListing {
        query: JobQuery,
        #[source]
        source: RemoteError,
    },

    #[error("failed to initiate retrieval job for archive {archive_id}")]
    Initiate {
        archive_id: ArchiveId,
        #[source]
        source: RemoteError,
    },

    #[error("failed to fetch output of job {job_id}")]
    JobOutput {
        job_id: JobId,
        #[source]
        source: RemoteError,
    },

    #[error("filesystem error at {}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ThawError {
    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ThawError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ThawError>;
