//! Command-line front end for thaw: argument and config-file handling, the
//! SDK-backed vault client, and the glue that drives one restore run.
#![allow(missing_docs)]

pub mod cli;
pub mod glacier;
pub mod settings;

use anyhow::Context;
use thaw_core::model::Inventory;
use thaw_core::{LocalRestoreStore, RunSummary, VaultTarget, inventory};
use tracing::info;

use crate::glacier::GlacierVault;
use crate::settings::Settings;

/// Load the inventory, resolve the vault and run every enabled pass.
///
/// Configuration problems surface before any remote call is made.
pub async fn execute(settings: Settings) -> anyhow::Result<RunSummary> {
    let inventory = load_inventory(&settings)?;
    let target = VaultTarget::resolve(
        settings.account_id.as_deref(),
        settings.vault_name.as_deref(),
        inventory.as_ref().map(|inventory| &inventory.vault),
    )
    .context("invalid vault target")?;
    let region = settings.region(inventory.as_ref());

    info!(
        account_id = %target.account_id,
        vault = %target.vault_name,
        region = %region,
        restore_path = %settings.restore.restore_path.display(),
        tier = %settings.restore.restore_tier,
        "starting restore run"
    );

    let vault = GlacierVault::connect(target, region).await;
    let summary = thaw_core::run(
        &settings.restore,
        &vault,
        LocalRestoreStore,
        inventory.as_ref(),
    )
    .await?;
    log_summary(&summary);
    Ok(summary)
}

fn load_inventory(settings: &Settings) -> anyhow::Result<Option<Inventory>> {
    settings
        .inventory
        .as_deref()
        .map(|path| {
            inventory::load_from_path(path).with_context(|| {
                format!("loading inventory {}", path.display())
            })
        })
        .transpose()
}

fn log_summary(summary: &RunSummary) {
    if let Some(initiation) = &summary.initiation {
        info!(
            created = initiation.created.len(),
            skipped = initiation.skipped(),
            "initiation finished"
        );
    }
    if let Some(download) = &summary.download {
        info!(
            downloaded = download.downloaded,
            bytes = download.bytes_written,
            skipped = download.skipped(),
            "download finished"
        );
    }
}
