//! Loading of vault inventory snapshots.
//!
//! The snapshot is the JSON document the vault service produces for an
//! inventory-retrieval job. Loading happens in two steps: decode the document
//! and parse the vault ARN, then [`process`] every archive description into a
//! logical restore path. Processing is fail-fast: the first description that
//! isn't valid JSON aborts the whole load.

use std::{fs::File, io::Read, path::Path};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thaw_model::{Archive, ArchiveId, Inventory, VaultArn};
use tracing::{debug, info};

use crate::error::{Result, ThawError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InventoryDocument {
    #[serde(rename = "VaultARN")]
    vault_arn: String,
    inventory_date: DateTime<Utc>,
    #[serde(default)]
    archive_list: Vec<ArchiveRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ArchiveRecord {
    archive_id: String,
    #[serde(default)]
    archive_description: String,
    creation_date: DateTime<Utc>,
    size: u64,
    #[serde(rename = "SHA256TreeHash", default)]
    sha256_tree_hash: String,
}

impl From<ArchiveRecord> for Archive {
    fn from(record: ArchiveRecord) -> Self {
        Archive {
            archive_id: ArchiveId(record.archive_id),
            description: record.archive_description,
            logical_path: String::new(),
            size_bytes: record.size,
            creation_date: record.creation_date,
            content_hash: record.sha256_tree_hash,
        }
    }
}

/// Structured payload our uploads store in the archive description.
#[derive(Debug, Default, Deserialize)]
struct SerializedDescription {
    #[serde(default)]
    path: String,
}

/// Decode a snapshot without processing archive descriptions.
pub fn decode(json: &str) -> Result<Inventory> {
    let document: InventoryDocument = serde_json::from_str(json)
        .map_err(|source| ThawError::MalformedInventory { source })?;
    into_inventory(document)
}

/// Decode and process a snapshot.
pub fn load(reader: impl Read) -> Result<Inventory> {
    let document: InventoryDocument = serde_json::from_reader(reader)
        .map_err(|source| ThawError::MalformedInventory { source })?;
    let mut inventory = into_inventory(document)?;
    process(&mut inventory)?;
    info!(
        vault = %inventory.vault,
        archives = inventory.len(),
        total_bytes = inventory.total_size_bytes(),
        inventory_date = %inventory.inventory_date,
        "loaded inventory"
    );
    Ok(inventory)
}

pub fn load_from_str(json: &str) -> Result<Inventory> {
    load(json.as_bytes())
}

pub fn load_from_path(path: &Path) -> Result<Inventory> {
    let file = File::open(path).map_err(|source| ThawError::InventoryIo {
        path: path.to_path_buf(),
        source,
    })?;
    load(std::io::BufReader::new(file))
}

fn into_inventory(document: InventoryDocument) -> Result<Inventory> {
    let vault = VaultArn::parse(&document.vault_arn)
        .map_err(|source| ThawError::InvalidVaultReference { source })?;
    Ok(Inventory {
        vault,
        inventory_date: document.inventory_date,
        archives: document.archive_list.into_iter().map(Archive::from).collect(),
    })
}

/// Fill in every archive's logical path from its description.
pub fn process(inventory: &mut Inventory) -> Result<()> {
    for archive in &mut inventory.archives {
        archive.logical_path =
            logical_path(&archive.archive_id, &archive.description)?;
        if !archive.has_logical_path() {
            debug!(archive_id = %archive.archive_id, "archive description has no path");
        }
    }
    Ok(())
}

/// Extract the `path` field from a serialized archive description.
pub fn logical_path(archive_id: &ArchiveId, description: &str) -> Result<String> {
    let parsed: SerializedDescription = serde_json::from_str(description)
        .map_err(|source| ThawError::MalformedDescription {
            archive_id: archive_id.clone(),
            source,
        })?;
    Ok(parsed.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARN: &str = "arn:aws:glacier:us-east-1:123456789012:vaults/photos";

    fn snapshot(descriptions: &[&str]) -> String {
        let archives: Vec<serde_json::Value> = descriptions
            .iter()
            .enumerate()
            .map(|(idx, description)| {
                serde_json::json!({
                    "ArchiveId": format!("A{}", idx + 1),
                    "ArchiveDescription": description,
                    "CreationDate": "2020-01-01T00:00:00Z",
                    "Size": 100 * (idx as u64 + 1),
                    "SHA256TreeHash": "deadbeef",
                })
            })
            .collect();
        serde_json::json!({
            "VaultARN": ARN,
            "InventoryDate": "2021-03-01T10:00:00Z",
            "ArchiveList": archives,
        })
        .to_string()
    }

    #[test]
    fn loads_archives_with_logical_paths() {
        let inventory = load_from_str(&snapshot(&[
            r#"{"path":"docs/readme.txt"}"#,
            r#"{"path":"photos/2020/beach.jpg"}"#,
        ]))
        .expect("inventory loads");

        assert_eq!(inventory.vault.vault_name, "photos");
        assert_eq!(inventory.vault.account_id, "123456789012");
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.archives[0].archive_id.as_str(), "A1");
        assert_eq!(inventory.archives[0].logical_path, "docs/readme.txt");
        assert_eq!(inventory.archives[1].logical_path, "photos/2020/beach.jpg");
        assert_eq!(inventory.total_size_bytes(), 300);

        let beach = inventory.archive(&"A2".into()).expect("A2 is listed");
        assert_eq!(beach.logical_path, "photos/2020/beach.jpg");
        assert!(inventory.archive(&"A9".into()).is_none());
    }

    #[test]
    fn description_without_path_yields_empty_logical_path() {
        let inventory =
            load_from_str(&snapshot(&[r#"{"owner":"me"}"#])).unwrap();
        assert!(!inventory.archives[0].has_logical_path());
    }

    #[test]
    fn one_corrupt_description_aborts_the_load() {
        let err = load_from_str(&snapshot(&[
            r#"{"path":"ok.txt"}"#,
            "uploaded by hand",
            r#"{"path":"never-reached.txt"}"#,
        ]))
        .unwrap_err();
        match err {
            ThawError::MalformedDescription { archive_id, .. } => {
                assert_eq!(archive_id.as_str(), "A2")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn undecodable_snapshot_is_malformed() {
        assert!(matches!(
            load_from_str("{not json"),
            Err(ThawError::MalformedInventory { .. })
        ));
        assert!(matches!(
            load_from_str(r#"{"VaultARN": "x"}"#),
            Err(ThawError::MalformedInventory { .. })
        ));
    }

    #[test]
    fn unparseable_vault_arn_is_rejected() {
        let json = snapshot(&[]).replace(ARN, "arn:aws:glacier");
        assert!(matches!(
            load_from_str(&json),
            Err(ThawError::InvalidVaultReference { .. })
        ));
    }

    #[test]
    fn decode_leaves_paths_unprocessed() {
        let mut inventory =
            decode(&snapshot(&[r#"{"path":"a.txt"}"#])).unwrap();
        assert!(inventory.archives[0].logical_path.is_empty());
        process(&mut inventory).unwrap();
        assert_eq!(inventory.archives[0].logical_path, "a.txt");
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err =
            load_from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
