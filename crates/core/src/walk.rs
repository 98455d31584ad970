use crate::exclusions::{check_exclusions, ExclusionMatcher, ExclusionRecord};
use anyhow::Result;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Error)]
pub enum WalkError {
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("directory does not exist: {0}")]
    Missing(PathBuf),
    #[error("cannot compute path of {path} relative to {root}")]
    RelativePath { path: PathBuf, root: PathBuf },
}

pub fn ensure_directory(root: &Path) -> Result<(), WalkError> {
    if !root.exists() {
        return Err(WalkError::Missing(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(WalkError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Depth-first pre-order walk in file-name order.
///
/// The root is never visited. Unreadable entries are warned about and
/// skipped; excluded directories are pruned. The visitor sees every other
/// entry along with its root-relative path and may abort the walk by
/// returning an error.
pub fn walk_tree<F>(
    root: &Path,
    file_matchers: &[ExclusionMatcher],
    dir_matchers: &[ExclusionMatcher],
    mut visit: F,
) -> Result<Vec<ExclusionRecord>>
where
    F: FnMut(&DirEntry, &Path) -> Result<()>,
{
    let mut exclusions = Vec::new();
    let mut entries = WalkDir::new(root).sort_by_file_name().into_iter();

    while let Some(entry) = entries.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                warn!("could not access {path}: {err}");
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }

        let rel_path = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| WalkError::RelativePath {
                path: entry.path().to_path_buf(),
                root: root.to_path_buf(),
            })?;
        let is_dir = entry.file_type().is_dir();

        if let Some(record) = check_exclusions(rel_path, is_dir, file_matchers, dir_matchers) {
            debug!(path = %rel_path.display(), reason = %record.reason, "excluded");
            exclusions.push(record);
            if is_dir {
                entries.skip_current_dir();
            }
            continue;
        }

        visit(&entry, rel_path)?;
    }

    Ok(exclusions)
}
