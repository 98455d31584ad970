use crate::exclusions::{ExclusionMatcher, ExclusionRecord};
use crate::output::Metadata;
use crate::walk::{ensure_directory, walk_tree};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

const BUFFER_SIZE: usize = 8192;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DupfindError {
    #[error("unsupported hash algorithm '{0}'. Supported: md5, sha1, sha256")]
    UnsupportedAlgorithm(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = DupfindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha256" => Ok(HashAlgorithm::Sha256),
            other => Err(DupfindError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub hash: String,
    pub hash_type: HashAlgorithm,
    /// Size of the first file, or -1 when it could not be read.
    pub size: i64,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DuplicateResult {
    pub groups: Vec<DuplicateGroup>,
    pub found: bool,
    pub exclusions: Vec<ExclusionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Streams the file through the digest and returns lower-case hex.
pub fn calculate_hash(path: &Path, algorithm: HashAlgorithm) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;

    let hex = match algorithm {
        HashAlgorithm::Md5 => {
            let mut context = md5::Context::new();
            stream_chunks(&mut file, path, |chunk| context.consume(chunk))?;
            format!("{:x}", context.compute())
        }
        HashAlgorithm::Sha1 => {
            let mut hasher = Sha1::new();
            stream_chunks(&mut file, path, |chunk| hasher.update(chunk))?;
            format!("{:x}", hasher.finalize())
        }
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            stream_chunks(&mut file, path, |chunk| hasher.update(chunk))?;
            format!("{:x}", hasher.finalize())
        }
    };

    Ok(hex)
}

fn stream_chunks<F>(file: &mut File, path: &Path, mut consume: F) -> Result<()>
where
    F: FnMut(&[u8]),
{
    let mut buffer = [0u8; BUFFER_SIZE];
    loop {
        let read = file
            .read(&mut buffer)
            .with_context(|| format!("read from {}", path.display()))?;
        if read == 0 {
            return Ok(());
        }
        consume(&buffer[..read]);
    }
}

pub fn find_duplicates(
    root: &Path,
    algorithm: HashAlgorithm,
    file_matchers: &[ExclusionMatcher],
    dir_matchers: &[ExclusionMatcher],
) -> Result<DuplicateResult> {
    ensure_directory(root)?;

    let mut by_hash = HashMap::<String, Vec<PathBuf>>::new();
    let exclusions = walk_tree(root, file_matchers, dir_matchers, |entry, _| {
        if entry.file_type().is_dir() {
            return Ok(());
        }

        match calculate_hash(entry.path(), algorithm) {
            Ok(hash) => {
                debug!(path = %entry.path().display(), %hash, "hashed");
                by_hash.entry(hash).or_default().push(entry.path().to_path_buf());
            }
            Err(err) => warn!("could not hash file {}: {err:#}", entry.path().display()),
        }
        Ok(())
    })?;

    let mut groups: Vec<DuplicateGroup> = by_hash
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(hash, mut files)| {
            files.sort();
            let size = fs::metadata(&files[0])
                .ok()
                .and_then(|meta| i64::try_from(meta.len()).ok())
                .unwrap_or(-1);
            DuplicateGroup {
                hash,
                hash_type: algorithm,
                size,
                files,
            }
        })
        .collect();
    groups.sort_by(|a, b| a.files[0].cmp(&b.files[0]));

    Ok(DuplicateResult {
        found: !groups.is_empty(),
        groups,
        exclusions,
        metadata: None,
    })
}
