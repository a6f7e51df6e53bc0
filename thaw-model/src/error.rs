use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidId(String),
    InvalidArn { arn: String, reason: &'static str },
    UnknownTier(String),
    UnknownStatus(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidId(msg) => write!(f, "invalid id: {msg}"),
            ModelError::InvalidArn { arn, reason } => {
                write!(f, "invalid vault ARN '{arn}': {reason}")
            }
            ModelError::UnknownTier(tier) => write!(
                f,
                "unknown restore tier '{tier}' (expected Bulk, Standard or Expedited)"
            ),
            ModelError::UnknownStatus(status) => {
                write!(f, "unknown job status '{status}'")
            }
        }
    }
}

impl std::error::Error for ModelError {}
