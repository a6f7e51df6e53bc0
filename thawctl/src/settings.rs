//! Config-file layer and the merged settings for one invocation.
//!
//! Precedence: command line, then the optional `--config` file, then the
//! built-in defaults of [`RestoreConfig`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use serde::Deserialize;
use thaw_core::RestoreConfig;
use thaw_core::model::{Inventory, RestoreTier};

pub const DEFAULT_REGION: &str = "us-east-1";

/// Optional values read from a TOML or JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub inventory: Option<PathBuf>,
    pub account_id: Option<String>,
    pub vault_name: Option<String>,
    pub region: Option<String>,
    pub restore_path: Option<PathBuf>,
    pub restore_tier: Option<RestoreTier>,
    pub max_job_count: Option<usize>,
    pub check_status: Option<bool>,
    pub download: Option<bool>,
    pub initiate_restore: Option<bool>,
    pub print_all_jobs: Option<bool>,
}

impl FileConfig {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents).with_context(|| {
                format!("invalid config {}", path.display())
            }),
            Some("toml") => toml::from_str(&contents).map_err(|err| {
                anyhow!("invalid config {}: {}", path.display(), err)
            }),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<Self> {
        // Try TOML first, then JSON.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }
}

/// Everything one invocation needs, after merging all layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub inventory: Option<PathBuf>,
    pub account_id: Option<String>,
    pub vault_name: Option<String>,
    pub region: Option<String>,
    pub restore: RestoreConfig,
}

impl Settings {
    /// Explicit region, else the region of the inventory's vault, else
    /// [`DEFAULT_REGION`].
    pub fn region(&self, inventory: Option<&Inventory>) -> String {
        self.region
            .clone()
            .filter(|region| !region.trim().is_empty())
            .or_else(|| {
                inventory
                    .map(|inventory| inventory.vault.region.clone())
                    .filter(|region| !region.is_empty())
            })
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toml_with_lowercase_tier() {
        let config = FileConfig::parse_from_str(
            r#"
            vault_name = "photos"
            restore_tier = "expedited"
            download = true
            max_job_count = 50
            "#,
            "inline",
        )
        .expect("toml parses");
        assert_eq!(config.vault_name.as_deref(), Some("photos"));
        assert_eq!(config.restore_tier, Some(RestoreTier::Expedited));
        assert_eq!(config.download, Some(true));
        assert_eq!(config.max_job_count, Some(50));
    }

    #[test]
    fn falls_back_to_json() {
        let config = FileConfig::parse_from_str(
            r#"{"restore_tier": "Standard", "restore_path": "/srv/restore"}"#,
            "inline",
        )
        .expect("json parses");
        assert_eq!(config.restore_tier, Some(RestoreTier::Standard));
        assert_eq!(config.restore_path, Some(PathBuf::from("/srv/restore")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(
            FileConfig::parse_from_str("restore_teir = \"bulk\"", "inline")
                .is_err()
        );
    }

    #[test]
    fn loads_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thaw.toml");
        fs::write(&path, "check_status = false\n").unwrap();
        let config = FileConfig::load_from_file(&path).unwrap();
        assert_eq!(config.check_status, Some(false));
    }

    #[test]
    fn region_prefers_explicit_then_default() {
        let settings = Settings {
            inventory: None,
            account_id: None,
            vault_name: None,
            region: Some("eu-central-1".to_string()),
            restore: RestoreConfig::default(),
        };
        assert_eq!(settings.region(None), "eu-central-1");

        let unset = Settings {
            region: None,
            ..settings
        };
        assert_eq!(unset.region(None), DEFAULT_REGION);
    }
}
