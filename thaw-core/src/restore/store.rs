use std::path::Path;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{Result, ThawError};

/// Filesystem operations the orchestrator needs for restored files.
#[async_trait]
pub trait RestoreStore: Send + Sync {
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Write `bytes` to `path`, creating parent directories first.
    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<()>;
}

/// Restored files on local disk.
///
/// Writes go to a sibling temp file that is renamed into place, so an
/// interrupted download never leaves a truncated file behind that a later
/// run would mistake for a finished restore.
#[derive(Clone, Debug, Default)]
pub struct LocalRestoreStore;

#[async_trait]
impl RestoreStore for LocalRestoreStore {
    async fn exists(&self, path: &Path) -> Result<bool> {
        tokio::fs::try_exists(path)
            .await
            .map_err(|source| ThawError::fs(path, source))
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| ThawError::fs(parent, source))?;

        // Fixed-length name so any target name that fits also fits here.
        let tmp =
            parent.join(format!(".thaw-{}.part", Uuid::new_v4().simple()));

        if let Err(err) = write_tmp(&tmp, bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err);
        }

        tokio::fs::rename(&tmp, path).await.map_err(|source| {
            ThawError::fs(path, source)
        })
    }
}

async fn write_tmp(tmp: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = tokio::fs::File::create(tmp)
        .await
        .map_err(|source| ThawError::fs(tmp, source))?;
    file.write_all(bytes)
        .await
        .map_err(|source| ThawError::fs(tmp, source))?;
    file.sync_all()
        .await
        .map_err(|source| ThawError::fs(tmp, source))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_creates_parents_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deeper/file.bin");
        let store = LocalRestoreStore;

        assert!(!store.exists(&target).await.unwrap());
        store.write(&target, b"payload").await.expect("write ok");
        assert!(store.exists(&target).await.unwrap());
        assert_eq!(std::fs::read(&target).unwrap(), b"payload");

        let siblings: Vec<_> = std::fs::read_dir(target.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(siblings.len(), 1, "temp file left behind: {siblings:?}");
    }

    #[tokio::test]
    async fn long_file_names_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let name = format!("{}.jpg", "x".repeat(240));
        let target = dir.path().join(&name);

        LocalRestoreStore
            .write(&target, b"payload")
            .await
            .expect("write ok");

        assert_eq!(std::fs::read(&target).unwrap(), b"payload");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn write_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let err = LocalRestoreStore
            .write(&blocker.join("child.txt"), b"payload")
            .await
            .unwrap_err();
        assert!(matches!(err, ThawError::Filesystem { .. }));
    }
}
