mod config;
mod dirstat;
mod dupfind;
mod exclusions;
mod output;
mod rename;
mod sed;
mod walk;

pub use config::{
    app_paths, load_config, load_config_from, save_config, save_config_to, AppConfig, AppPaths,
};
pub use dirstat::{analyze_directory, DirStatResult, DirectoryInfo, FileInfo, FileType, NO_EXTENSION};
pub use dupfind::{
    calculate_hash, find_duplicates, DupfindError, DuplicateGroup, DuplicateResult, HashAlgorithm,
};
pub use exclusions::{
    check_exclusions, parse_exclusions, ExclusionMatcher, ExclusionReason, ExclusionRecord,
    ExclusionTarget,
};
pub use output::{format_size, Flag, Metadata, OutputFormat, UnknownFormat, TOOL_NAME};
pub use rename::{
    plan_renames, RenameError, RenameOperation, RenameOptions, RenameResult, EMPTY_NAME,
    TARGET_EXISTS,
};
pub use sed::{parse_sed_expression, SedError, SedExpression};
pub use walk::{ensure_directory, walk_tree, WalkError};
