use crate::exclusions::{dotted_extension, ExclusionMatcher, ExclusionRecord};
use crate::output::Metadata;
use crate::walk::{ensure_directory, walk_tree};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const NO_EXTENSION: &str = "(no extension)";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileType {
    pub extension: String,
    pub count: usize,
    pub total_size: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectoryInfo {
    pub path: PathBuf,
    pub file_count: usize,
    pub total_size: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DirStatResult {
    pub total_files: usize,
    pub total_size: u64,
    pub largest_file: Option<FileInfo>,
    pub file_types: Vec<FileType>,
    pub directories: Vec<DirectoryInfo>,
    pub exclusions: Vec<ExclusionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Default)]
struct Bucket {
    count: usize,
    size: u64,
}

pub fn analyze_directory(
    root: &Path,
    file_matchers: &[ExclusionMatcher],
    dir_matchers: &[ExclusionMatcher],
) -> Result<DirStatResult> {
    ensure_directory(root)?;

    let mut total_files = 0usize;
    let mut total_size = 0u64;
    let mut largest_file: Option<FileInfo> = None;
    let mut types = BTreeMap::<String, Bucket>::new();
    let mut dirs = BTreeMap::<PathBuf, Bucket>::new();

    let exclusions = walk_tree(root, file_matchers, dir_matchers, |entry, rel_path| {
        if entry.file_type().is_dir() {
            dirs.insert(rel_path.to_path_buf(), Bucket::default());
            return Ok(());
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                warn!("could not access {}: {err}", entry.path().display());
                return Ok(());
            }
        };

        total_files += 1;
        total_size += size;

        if largest_file.as_ref().map_or(true, |largest| size > largest.size) {
            largest_file = Some(FileInfo {
                name: entry.file_name().to_string_lossy().to_string(),
                size,
                path: rel_path.to_path_buf(),
            });
        }

        let extension = dotted_extension(rel_path)
            .map(|ext| ext.to_lowercase())
            .unwrap_or_else(|| NO_EXTENSION.to_string());
        let bucket = types.entry(extension).or_default();
        bucket.count += 1;
        bucket.size += size;

        // Files sitting directly under the root have no bucket.
        if let Some(bucket) = rel_path.parent().and_then(|parent| dirs.get_mut(parent)) {
            bucket.count += 1;
            bucket.size += size;
        }

        Ok(())
    })
    .with_context(|| format!("failed to analyze {}", root.display()))?;

    let mut file_types: Vec<FileType> = types
        .into_iter()
        .map(|(extension, bucket)| FileType {
            extension,
            count: bucket.count,
            total_size: bucket.size,
            percentage: percentage(bucket.size, total_size),
        })
        .collect();
    file_types.sort_by(|a, b| b.total_size.cmp(&a.total_size));

    let mut directories: Vec<DirectoryInfo> = dirs
        .into_iter()
        .filter(|(_, bucket)| bucket.count > 0)
        .map(|(path, bucket)| DirectoryInfo {
            path,
            file_count: bucket.count,
            total_size: bucket.size,
            percentage: percentage(bucket.size, total_size),
        })
        .collect();
    directories.sort_by(|a, b| b.total_size.cmp(&a.total_size));

    Ok(DirStatResult {
        total_files,
        total_size,
        largest_file,
        file_types,
        directories,
        exclusions,
        metadata: None,
    })
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}
