use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use thaw_core::RestoreConfig;
use thaw_core::model::RestoreTier;

use crate::settings::{FileConfig, Settings};

#[derive(Debug, Parser)]
#[command(
    name = "thawctl",
    version,
    about = "Restore archives from a cold-storage vault",
    long_about = "Reconciles vault retrieval jobs against an inventory: \
                  initiates jobs for archives that have none and downloads \
                  the output of finished jobs. Safe to re-run; existing jobs \
                  and already restored files are skipped."
)]
pub struct Cli {
    /// Vault inventory JSON. Supplies the account id and vault name, and the
    /// archive list used by --initiate-restore
    #[arg(long, env = "THAW_INVENTORY")]
    pub inventory: Option<PathBuf>,

    /// Account id owning the vault (must match the inventory if both given)
    #[arg(long, env = "THAW_ACCOUNT_ID")]
    pub account_id: Option<String>,

    /// Vault name (must match the inventory if both given)
    #[arg(long, env = "THAW_VAULT_NAME")]
    pub vault_name: Option<String>,

    /// Service region [default: inventory vault region, else us-east-1]
    #[arg(long, env = "THAW_REGION")]
    pub region: Option<String>,

    /// Directory restored files are written under, using the path stored in
    /// each archive description [default: restore/]
    #[arg(long, env = "THAW_RESTORE_PATH")]
    pub restore_path: Option<PathBuf>,

    /// Tier for new retrieval jobs. Expedited is very expensive
    /// [default: bulk]
    #[arg(long, value_enum, env = "THAW_RESTORE_TIER")]
    pub restore_tier: Option<TierArg>,

    /// Stop paginating job listings once more than this many jobs were
    /// returned [default: unlimited]
    #[arg(long, env = "THAW_MAX_JOB_COUNT")]
    pub max_job_count: Option<usize>,

    /// Log a status report of existing jobs [default: true]
    #[arg(
        long,
        env = "THAW_CHECK_STATUS",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub check_status: Option<bool>,

    /// Download output of succeeded retrieval jobs
    #[arg(
        long,
        env = "THAW_DOWNLOAD",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub download: Option<bool>,

    /// Initiate retrieval jobs for inventory archives that lack one
    #[arg(
        long,
        env = "THAW_INITIATE_RESTORE",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub initiate_restore: Option<bool>,

    /// Log every fetched job
    #[arg(
        long,
        env = "THAW_PRINT_ALL_JOBS",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub print_all_jobs: Option<bool>,

    /// TOML or JSON file with defaults for any of the options above
    #[arg(long, env = "THAW_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TierArg {
    Bulk,
    Standard,
    Expedited,
}

impl From<TierArg> for RestoreTier {
    fn from(value: TierArg) -> Self {
        match value {
            TierArg::Bulk => RestoreTier::Bulk,
            TierArg::Standard => RestoreTier::Standard,
            TierArg::Expedited => RestoreTier::Expedited,
        }
    }
}

impl Cli {
    /// Merge with the config file layer; command-line values win.
    pub fn into_settings(self, file: FileConfig) -> Settings {
        let defaults = RestoreConfig::default();
        let restore = RestoreConfig {
            restore_path: self
                .restore_path
                .or(file.restore_path)
                .unwrap_or(defaults.restore_path),
            restore_tier: self
                .restore_tier
                .map(RestoreTier::from)
                .or(file.restore_tier)
                .unwrap_or(defaults.restore_tier),
            max_job_count: self
                .max_job_count
                .or(file.max_job_count)
                .unwrap_or(defaults.max_job_count),
            check_status: self
                .check_status
                .or(file.check_status)
                .unwrap_or(defaults.check_status),
            download: self
                .download
                .or(file.download)
                .unwrap_or(defaults.download),
            initiate_restore: self
                .initiate_restore
                .or(file.initiate_restore)
                .unwrap_or(defaults.initiate_restore),
            print_all_jobs: self
                .print_all_jobs
                .or(file.print_all_jobs)
                .unwrap_or(defaults.print_all_jobs),
        };

        Settings {
            inventory: self.inventory.or(file.inventory),
            account_id: self.account_id.or(file.account_id),
            vault_name: self.vault_name.or(file.vault_name),
            region: self.region.or(file.region),
            restore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("thawctl").chain(args.iter().copied()))
            .expect("args parse")
    }

    #[test]
    fn bare_flags_enable_passes() {
        let settings = parse(&["--download", "--initiate-restore"])
            .into_settings(FileConfig::default());
        assert!(settings.restore.download);
        assert!(settings.restore.initiate_restore);
        assert!(settings.restore.check_status);
        assert_eq!(settings.restore.restore_tier, RestoreTier::Bulk);
        assert_eq!(settings.restore.max_job_count, usize::MAX);
    }

    #[test]
    fn check_status_can_be_switched_off() {
        let settings = parse(&["--check-status=false"])
            .into_settings(FileConfig::default());
        assert!(!settings.restore.should_fetch_jobs());
    }

    #[test]
    fn command_line_wins_over_file() {
        let file = FileConfig {
            vault_name: Some("from-file".to_string()),
            restore_tier: Some(RestoreTier::Standard),
            download: Some(true),
            max_job_count: Some(10),
            ..FileConfig::default()
        };
        let settings = parse(&[
            "--vault-name",
            "from-cli",
            "--restore-tier",
            "expedited",
            "--download=false",
        ])
        .into_settings(file);

        assert_eq!(settings.vault_name.as_deref(), Some("from-cli"));
        assert_eq!(settings.restore.restore_tier, RestoreTier::Expedited);
        assert!(!settings.restore.download);
        assert_eq!(settings.restore.max_job_count, 10);
    }

    #[test]
    fn rejects_unknown_tier() {
        let result = Cli::try_parse_from(["thawctl", "--restore-tier", "glacial"]);
        assert!(result.is_err());
    }
}
