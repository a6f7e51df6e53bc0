//! Restore orchestration: initiating missing retrieval jobs and materializing
//! the output of finished ones.
//!
//! Both passes work against the job snapshot taken at the start of the run and
//! decide per item whether work is needed, using two idempotence checks: an
//! archive with an indexed job never gets another one, and a restore target
//! that already exists on disk is never written again.

mod download;
mod initiate;
pub mod path;
pub mod store;

pub use download::DownloadReport;
pub use initiate::InitiationReport;
pub use path::RestoreLayout;
pub use store::{LocalRestoreStore, RestoreStore};

use thaw_model::RestoreTier;

use crate::config::RestoreConfig;
use crate::error::Result;

#[derive(Debug)]
pub struct RestoreOrchestrator<S = LocalRestoreStore> {
    layout: RestoreLayout,
    tier: RestoreTier,
    store: S,
}

impl<S: RestoreStore> RestoreOrchestrator<S> {
    pub fn new(config: &RestoreConfig, store: S) -> Result<Self> {
        Ok(Self {
            layout: RestoreLayout::new(&config.restore_path)?,
            tier: config.restore_tier,
            store,
        })
    }
}
