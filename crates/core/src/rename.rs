use crate::exclusions::{ExclusionMatcher, ExclusionRecord};
use crate::output::Metadata;
use crate::sed::SedExpression;
use crate::walk::{ensure_directory, walk_tree};
use anyhow::Result;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const TARGET_EXISTS: &str = "target file already exists";
pub const EMPTY_NAME: &str = "replacement produced an empty name";

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("invalid match pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

#[derive(Debug, Clone)]
pub struct RenameOptions {
    pub root: PathBuf,
    pub match_pattern: String,
    pub sed: SedExpression,
    pub dry_run: bool,
    pub force_overwrite: bool,
    pub file_matchers: Vec<ExclusionMatcher>,
    pub dir_matchers: Vec<ExclusionMatcher>,
}

impl RenameOptions {
    pub fn new(root: impl Into<PathBuf>, match_pattern: impl Into<String>, sed: SedExpression) -> Self {
        Self {
            root: root.into(),
            match_pattern: match_pattern.into(),
            sed,
            dry_run: true,
            force_overwrite: false,
            file_matchers: Vec::new(),
            dir_matchers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenameOperation {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl RenameOperation {
    pub fn is_ok(&self) -> bool {
        self.error.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameResult {
    pub operations: Vec<RenameOperation>,
    pub dry_run: bool,
    pub exclusions: Vec<ExclusionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Walks `options.root` and renames every matching file whose name the
/// substitution changes.
///
/// Only an invalid glob or an unresolvable relative path aborts the run.
/// Conflicts and failed renames are recorded on their operation and the walk
/// moves on; there is no rollback of renames already made.
pub fn plan_renames(options: &RenameOptions) -> Result<RenameResult> {
    ensure_directory(&options.root)?;

    let glob = Pattern::new(&options.match_pattern).map_err(|source| RenameError::InvalidGlob {
        pattern: options.match_pattern.clone(),
        source,
    })?;

    let mut operations = Vec::new();
    let exclusions = walk_tree(
        &options.root,
        &options.file_matchers,
        &options.dir_matchers,
        |entry, rel_path| {
            if entry.file_type().is_dir() {
                return Ok(());
            }

            let Some(old_name) = entry.file_name().to_str() else {
                debug!(path = %rel_path.display(), "skipping non UTF-8 file name");
                return Ok(());
            };
            if !glob.matches(old_name) {
                return Ok(());
            }

            let new_name = options.sed.apply(old_name);
            if new_name == old_name {
                return Ok(());
            }

            let source = entry.path();
            let target = source.with_file_name(&new_name);
            let mut operation = RenameOperation {
                old_path: rel_path.to_path_buf(),
                new_path: rel_path.with_file_name(&new_name),
                error: String::new(),
            };

            if new_name.is_empty() {
                operation.error = EMPTY_NAME.to_string();
            } else if let Some(conflict) = check_target(&target, options.force_overwrite) {
                operation.error = conflict;
            }

            if !options.dry_run && operation.is_ok() {
                match fs::rename(source, &target) {
                    Ok(()) => info!(
                        from = %operation.old_path.display(),
                        to = %operation.new_path.display(),
                        "renamed"
                    ),
                    Err(err) => operation.error = format!("rename failed: {err}"),
                }
            }

            operations.push(operation);
            Ok(())
        },
    )?;

    Ok(RenameResult {
        operations,
        dry_run: options.dry_run,
        exclusions,
        metadata: None,
    })
}

fn check_target(target: &Path, force_overwrite: bool) -> Option<String> {
    match fs::metadata(target) {
        Ok(_) if force_overwrite => None,
        Ok(_) => Some(TARGET_EXISTS.to_string()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => Some(format!("cannot check target: {err}")),
    }
}
