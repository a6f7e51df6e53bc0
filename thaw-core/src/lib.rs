//! Job reconciliation and restore orchestration for cold-storage vaults.
//!
//! A vault does not hand out archive contents directly: a retrieval job has to
//! be initiated, it completes hours later, and its output can then be
//! downloaded once. This crate keeps that lifecycle idempotent across repeated
//! invocations:
//!
//! - [`inventory`] loads the vault inventory and derives each archive's
//!   restore path from its description,
//! - [`reconciler`] lists existing jobs and indexes them by archive,
//! - [`restore`] initiates jobs for archives that have none and writes the
//!   output of finished jobs exactly once,
//! - [`run`] ties the passes together according to a [`RestoreConfig`].
//!
//! Remote access goes through the traits in [`ports`].
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod inventory;
pub mod ports;
pub mod reconciler;
pub mod restore;
pub mod run;
pub mod status;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{ConfigError, RestoreConfig, VaultTarget};
pub use error::{RemoteError, RemoteErrorKind, Result, ThawError};
pub use ports::{
    JobFilter, JobInitiator, JobListing, JobOutcome, JobOutput,
    JobOutputFetcher, JobPage, JobQuery, RetrievalRequest, VaultClient,
};
pub use reconciler::{JobIndex, JobReconciler, JobSnapshot, collect_jobs};
pub use restore::{
    DownloadReport, InitiationReport, LocalRestoreStore, RestoreLayout,
    RestoreOrchestrator, RestoreStore,
};
pub use run::{RunSummary, run};
pub use status::{InventoryCoverage, StatusReport};

pub use thaw_model as model;
