//! One full restore run: reconcile, report, initiate, download.

use thaw_model::Inventory;
use tracing::{info, warn};

use crate::config::RestoreConfig;
use crate::error::Result;
use crate::ports::VaultClient;
use crate::reconciler::JobReconciler;
use crate::restore::{
    DownloadReport, InitiationReport, RestoreOrchestrator, RestoreStore,
};
use crate::status::StatusReport;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub status: Option<StatusReport>,
    pub initiation: Option<InitiationReport>,
    pub download: Option<DownloadReport>,
}

/// Drive the passes enabled in `config` against a single job snapshot.
///
/// Nothing is re-queried mid-run; long-running jobs are picked up by the next
/// invocation.
pub async fn run<C, S>(
    config: &RestoreConfig,
    client: &C,
    store: S,
    inventory: Option<&Inventory>,
) -> Result<RunSummary>
where
    C: VaultClient,
    S: RestoreStore,
{
    let mut summary = RunSummary::default();
    if !config.should_fetch_jobs() {
        info!("no status check, download or initiation requested");
        return Ok(summary);
    }

    let orchestrator = RestoreOrchestrator::new(config, store)?;
    let mut snapshot =
        JobReconciler::from_config(config).fetch_jobs(client).await?;

    if config.check_status {
        summary.status = Some(StatusReport::log(&snapshot, inventory));
    }

    if config.initiate_restore {
        match inventory {
            Some(inventory) if !inventory.is_empty() => {
                summary.initiation = Some(
                    orchestrator
                        .initiate_missing(client, inventory, &mut snapshot.index)
                        .await?,
                );
            }
            _ => warn!(
                "initiate restore requested without a non-empty inventory"
            ),
        }
    }

    if config.download {
        summary.download = Some(
            orchestrator
                .download_completed(client, &snapshot.succeeded)
                .await?,
        );
    }

    Ok(summary)
}
