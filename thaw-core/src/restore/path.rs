use std::path::{Component, Path, PathBuf};

use crate::error::{Result, ThawError};

/// Maps restore-relative logical paths onto the local restore directory.
///
/// Leading `/` (or a Windows prefix) and `.` components are dropped; any `..`
/// component is rejected so nothing can land outside the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreLayout {
    root: PathBuf,
}

impl RestoreLayout {
    /// Anchor the layout at `root`, made absolute against the working
    /// directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = std::path::absolute(root)
            .map_err(|source| ThawError::fs(root, source))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whitespace is significant except in an all-blank path, which is
    /// treated as empty.
    pub fn target_for(&self, logical_path: &str) -> Result<PathBuf> {
        if logical_path.trim().is_empty() {
            return Err(ThawError::EmptyRestorePath);
        }

        let mut target = self.root.clone();
        let mut pushed = false;

        for component in Path::new(logical_path).components() {
            match component {
                Component::Prefix(_)
                | Component::RootDir
                | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(ThawError::PathEscape {
                        path: logical_path.to_string(),
                    });
                }
                Component::Normal(part) => {
                    target.push(part);
                    pushed = true;
                }
            }
        }

        if !pushed {
            return Err(ThawError::EmptyRestorePath);
        }
        Ok(target)
    }
}
