use chrono::{DateTime, Utc};

use crate::ids::ArchiveId;
use crate::vault::VaultArn;

/// A single stored object in the vault as listed by an inventory snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Archive {
    pub archive_id: ArchiveId,
    /// Free-text description set at upload time. Uploads made by our tooling
    /// store a small JSON object with a `path` key here.
    pub description: String,
    /// Restore-relative path decoded from `description`; empty when the
    /// description carried no path.
    pub logical_path: String,
    pub size_bytes: u64,
    pub creation_date: DateTime<Utc>,
    /// SHA-256 tree hash reported by the vault.
    pub content_hash: String,
}

impl Archive {
    pub fn has_logical_path(&self) -> bool {
        !self.logical_path.is_empty()
    }
}

/// Point-in-time listing of every archive in one vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    pub vault: VaultArn,
    pub inventory_date: DateTime<Utc>,
    pub archives: Vec<Archive>,
}

impl Inventory {
    pub fn len(&self) -> usize {
        self.archives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }

    pub fn archive(&self, id: &ArchiveId) -> Option<&Archive> {
        self.archives.iter().find(|archive| &archive.archive_id == id)
    }

    pub fn total_size_bytes(&self) -> u64 {
        self.archives.iter().map(|archive| archive.size_bytes).sum()
    }
}
