//! Core data model definitions shared across thaw crates.
#![allow(missing_docs)]

pub mod archive;
pub mod error;
pub mod ids;
pub mod job;
pub mod tier;
pub mod vault;

pub use archive::{Archive, Inventory};
pub use error::ModelError;
pub use ids::{ArchiveId, JobId};
pub use job::{Job, JobAction, JobStatus};
pub use tier::RestoreTier;
pub use vault::VaultArn;
