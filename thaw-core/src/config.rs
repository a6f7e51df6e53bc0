//! Run configuration threaded explicitly through the reconciler and
//! orchestrator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thaw_model::{RestoreTier, VaultArn};
use thiserror::Error;

/// Toggles and tunables for one restore run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RestoreConfig {
    /// Base directory that restored archives are written under, using the
    /// path recorded in each archive's description.
    pub restore_path: PathBuf,
    /// Tier requested for new retrieval jobs.
    pub restore_tier: RestoreTier,
    /// Soft cap for paginated job listings. Pagination stops once more than
    /// this many jobs have been collected, so a listing can overshoot by up
    /// to one page.
    pub max_job_count: usize,
    /// Log a status report of existing jobs.
    pub check_status: bool,
    /// Download output of succeeded retrieval jobs.
    pub download: bool,
    /// Create retrieval jobs for inventory archives that lack one.
    pub initiate_restore: bool,
    /// Log every fetched job individually.
    pub print_all_jobs: bool,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            restore_path: PathBuf::from("restore/"),
            restore_tier: RestoreTier::Bulk,
            max_job_count: usize::MAX,
            check_status: true,
            download: false,
            initiate_restore: false,
            print_all_jobs: false,
        }
    }
}

impl RestoreConfig {
    pub fn should_fetch_jobs(&self) -> bool {
        self.check_status || self.download || self.initiate_restore
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("account id {explicit} doesn't match inventory vault ARN {arn}")]
    AccountMismatch { explicit: String, arn: String },
    #[error("vault name {explicit} doesn't match inventory vault ARN {arn}")]
    VaultMismatch { explicit: String, arn: String },
    #[error(
        "account id and vault name are blank; pass an inventory or set both explicitly"
    )]
    MissingVaultTarget,
}

/// Account and vault every remote call is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultTarget {
    pub account_id: String,
    pub vault_name: String,
}

impl VaultTarget {
    /// Merge explicitly supplied identifiers with the inventory's vault ARN.
    ///
    /// Explicit values must agree with the ARN when both are present; blank
    /// explicit values are filled from the ARN.
    pub fn resolve(
        account_id: Option<&str>,
        vault_name: Option<&str>,
        inventory_vault: Option<&VaultArn>,
    ) -> Result<Self, ConfigError> {
        let account_id = account_id.map(str::trim).filter(|s| !s.is_empty());
        let vault_name = vault_name.map(str::trim).filter(|s| !s.is_empty());

        let (account_id, vault_name) = match inventory_vault {
            Some(arn) => {
                if let Some(explicit) = account_id
                    && explicit != arn.account_id
                {
                    return Err(ConfigError::AccountMismatch {
                        explicit: explicit.to_string(),
                        arn: arn.to_string(),
                    });
                }
                if let Some(explicit) = vault_name
                    && explicit != arn.vault_name
                {
                    return Err(ConfigError::VaultMismatch {
                        explicit: explicit.to_string(),
                        arn: arn.to_string(),
                    });
                }
                (arn.account_id.as_str(), arn.vault_name.as_str())
            }
            None => match (account_id, vault_name) {
                (Some(account), Some(vault)) => (account, vault),
                _ => return Err(ConfigError::MissingVaultTarget),
            },
        };

        Ok(Self {
            account_id: account_id.to_string(),
            vault_name: vault_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arn() -> VaultArn {
        VaultArn::parse("arn:aws:glacier:us-east-1:111122223333:vaults/media")
            .unwrap()
    }

    #[test]
    fn fills_blank_values_from_inventory() {
        let target = VaultTarget::resolve(None, Some(""), Some(&arn()))
            .expect("resolves from arn");
        assert_eq!(target.account_id, "111122223333");
        assert_eq!(target.vault_name, "media");
    }

    #[test]
    fn mismatched_account_is_rejected() {
        let err =
            VaultTarget::resolve(Some("999999999999"), None, Some(&arn()))
                .unwrap_err();
        assert!(matches!(err, ConfigError::AccountMismatch { .. }));
    }

    #[test]
    fn mismatched_vault_is_rejected() {
        let err = VaultTarget::resolve(None, Some("other"), Some(&arn()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::VaultMismatch { .. }));
    }

    #[test]
    fn explicit_values_are_enough_without_inventory() {
        let target =
            VaultTarget::resolve(Some("123"), Some("photos"), None).unwrap();
        assert_eq!(target.vault_name, "photos");
        assert_eq!(
            VaultTarget::resolve(Some("123"), None, None),
            Err(ConfigError::MissingVaultTarget)
        );
    }

    #[test]
    fn defaults_only_check_status() {
        let config = RestoreConfig::default();
        assert!(config.should_fetch_jobs());
        assert!(!config.download && !config.initiate_restore);

        let idle = RestoreConfig {
            check_status: false,
            ..RestoreConfig::default()
        };
        assert!(!idle.should_fetch_jobs());
    }
}
