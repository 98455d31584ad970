use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    FilePattern,
    DirPattern,
    FileType,
}

impl ExclusionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ExclusionReason::FilePattern => "file_pattern",
            ExclusionReason::DirPattern => "dir_pattern",
            ExclusionReason::FileType => "file_type",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExclusionRecord {
    pub path: PathBuf,
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionTarget {
    Files,
    Dirs,
}

#[derive(Debug, Clone)]
pub enum ExclusionMatcher {
    /// Shell glob tested against the entry's base name.
    Glob {
        pattern: Pattern,
        reason: ExclusionReason,
    },
    /// Case-insensitive extension match, files only. `extension` keeps its dot.
    FileType { extension: String },
}

impl ExclusionMatcher {
    pub fn matches(&self, path: &Path, is_dir: bool) -> bool {
        match self {
            ExclusionMatcher::Glob { pattern, .. } => path
                .file_name()
                .map(|name| pattern.matches(&name.to_string_lossy()))
                .unwrap_or(false),
            ExclusionMatcher::FileType { extension } => {
                if is_dir {
                    return false;
                }
                let Some(ext) = dotted_extension(path) else {
                    return false;
                };
                extension == ".*" || ext.eq_ignore_ascii_case(extension)
            }
        }
    }

    pub fn reason(&self) -> ExclusionReason {
        match self {
            ExclusionMatcher::Glob { reason, .. } => *reason,
            ExclusionMatcher::FileType { .. } => ExclusionReason::FileType,
        }
    }
}

/// Parses a comma-separated pattern list.
///
/// For file targets, `*.ext` items become extension matchers and anything else
/// a file glob. Malformed globs are dropped with a warning.
pub fn parse_exclusions(patterns: &str, target: ExclusionTarget) -> Vec<ExclusionMatcher> {
    let mut matchers = Vec::new();

    for item in patterns.split(',').map(str::trim) {
        if item.is_empty() {
            continue;
        }

        if target == ExclusionTarget::Files && item.starts_with("*.") {
            matchers.push(ExclusionMatcher::FileType {
                extension: item[1..].to_string(),
            });
            continue;
        }

        let reason = match target {
            ExclusionTarget::Files => ExclusionReason::FilePattern,
            ExclusionTarget::Dirs => ExclusionReason::DirPattern,
        };
        match Pattern::new(item) {
            Ok(pattern) => matchers.push(ExclusionMatcher::Glob { pattern, reason }),
            Err(err) => warn!("ignoring invalid exclusion pattern '{item}': {err}"),
        }
    }

    matchers
}

pub fn check_exclusions(
    path: &Path,
    is_dir: bool,
    file_matchers: &[ExclusionMatcher],
    dir_matchers: &[ExclusionMatcher],
) -> Option<ExclusionRecord> {
    let matchers = if is_dir { dir_matchers } else { file_matchers };

    matchers
        .iter()
        .find(|matcher| matcher.matches(path, is_dir))
        .map(|matcher| ExclusionRecord {
            path: path.to_path_buf(),
            reason: matcher.reason(),
        })
}

/// Extension from the last `.` of the base name, dot included.
///
/// Dotfiles such as `.bashrc` count as having the extension `.bashrc`.
pub(crate) fn dotted_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let dot = name.rfind('.')?;
    Some(name[dot..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_patterns_split_into_type_and_glob_matchers() {
        let matchers = parse_exclusions("*.log, temp_*,, *.TMP ", ExclusionTarget::Files);
        assert_eq!(matchers.len(), 3);
        assert!(matches!(&matchers[0], ExclusionMatcher::FileType { extension } if extension == ".log"));
        assert!(matches!(
            &matchers[1],
            ExclusionMatcher::Glob { reason: ExclusionReason::FilePattern, .. }
        ));
        assert!(matches!(&matchers[2], ExclusionMatcher::FileType { extension } if extension == ".TMP"));
    }

    #[test]
    fn dir_patterns_are_always_globs() {
        let matchers = parse_exclusions("node_modules,*.git", ExclusionTarget::Dirs);
        assert_eq!(matchers.len(), 2);
        assert!(matchers
            .iter()
            .all(|m| m.reason() == ExclusionReason::DirPattern));
    }

    #[test]
    fn empty_input_yields_no_matchers() {
        assert!(parse_exclusions("", ExclusionTarget::Files).is_empty());
        assert!(parse_exclusions(" , ", ExclusionTarget::Dirs).is_empty());
    }

    #[test]
    fn invalid_glob_is_dropped() {
        let matchers = parse_exclusions("[unclosed,keep", ExclusionTarget::Dirs);
        assert_eq!(matchers.len(), 1);
    }

    #[test]
    fn file_type_matches_case_insensitively_and_skips_dirs() {
        let matcher = ExclusionMatcher::FileType {
            extension: ".log".to_string(),
        };
        assert!(matcher.matches(Path::new("logs/App.LOG"), false));
        assert!(!matcher.matches(Path::new("logs/app.log"), true));
        assert!(!matcher.matches(Path::new("logs/app.txt"), false));
        assert!(!matcher.matches(Path::new("README"), false));
    }

    #[test]
    fn any_extension_wildcard() {
        let matchers = parse_exclusions("*.*", ExclusionTarget::Files);
        assert!(matchers[0].matches(Path::new("a.txt"), false));
        assert!(!matchers[0].matches(Path::new("Makefile"), false));
    }

    #[test]
    fn glob_matches_base_name_only() {
        let matchers = parse_exclusions("build", ExclusionTarget::Dirs);
        assert!(matchers[0].matches(Path::new("src/build"), true));
        assert!(!matchers[0].matches(Path::new("build/src"), true));
    }

    #[test]
    fn check_uses_matchers_for_entry_kind() {
        let files = parse_exclusions("*.log", ExclusionTarget::Files);
        let dirs = parse_exclusions("cache", ExclusionTarget::Dirs);

        let record = check_exclusions(Path::new("a/debug.log"), false, &files, &dirs)
            .expect("log file excluded");
        assert_eq!(record.reason, ExclusionReason::FileType);
        assert_eq!(record.path, PathBuf::from("a/debug.log"));

        let record = check_exclusions(Path::new("cache"), true, &files, &dirs)
            .expect("cache dir excluded");
        assert_eq!(record.reason, ExclusionReason::DirPattern);

        assert!(check_exclusions(Path::new("cache"), false, &files, &dirs).is_none());
        assert!(check_exclusions(Path::new("debug.log"), true, &files, &dirs).is_none());
    }

    #[test]
    fn reason_serializes_to_snake_case() {
        let json = serde_json::to_string(&ExclusionReason::DirPattern).expect("serialize");
        assert_eq!(json, "\"dir_pattern\"");
        assert_eq!(ExclusionReason::FileType.to_string(), "file_type");
    }

    #[test]
    fn dotted_extension_uses_last_dot() {
        assert_eq!(dotted_extension(Path::new("a.tar.gz")).as_deref(), Some(".gz"));
        assert_eq!(dotted_extension(Path::new(".bashrc")).as_deref(), Some(".bashrc"));
        assert_eq!(dotted_extension(Path::new("Makefile")), None);
    }
}
