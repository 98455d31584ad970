use crate::dupfind::HashAlgorithm;
use crate::output::OutputFormat;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User defaults read from `config.toml`. Every field is optional in the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub output: OutputFormat,
    pub hash: HashAlgorithm,
    pub exclude_files: Vec<String>,
    pub exclude_dirs: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("dev", "filetools", "filetools")
        .context("could not determine the platform config directory")?;
    let config_dir = proj.config_dir().to_path_buf();
    Ok(AppPaths {
        config_path: config_dir.join("config.toml"),
        config_dir,
    })
}

pub fn load_config() -> Result<AppConfig> {
    let paths = app_paths()?;
    load_config_from(&paths.config_path)
}

/// Missing file means defaults.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config = toml::from_str::<AppConfig>(&raw)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    Ok(config)
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    let paths = app_paths()?;
    save_config_to(config, &paths.config_path)
}

pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory: {}", dir.display()))?;
    }
    let body = toml::to_string_pretty(config).context("failed to serialize config")?;
    fs::write(path, body)
        .with_context(|| format!("failed to write config file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().expect("tempdir");
        let config = load_config_from(&temp.path().join("config.toml")).expect("load");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.output, OutputFormat::Text);
        assert_eq!(config.hash, HashAlgorithm::Md5);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "hash = \"sha256\"\nexclude_dirs = [\".git\", \"target\"]\n")
            .expect("write");

        let config = load_config_from(&path).expect("load");
        assert_eq!(config.hash, HashAlgorithm::Sha256);
        assert_eq!(config.output, OutputFormat::Text);
        assert_eq!(config.exclude_dirs, vec![".git", "target"]);
        assert!(config.exclude_files.is_empty());
    }

    #[test]
    fn save_then_load() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("nested/config.toml");
        let config = AppConfig {
            output: OutputFormat::Html,
            hash: HashAlgorithm::Sha1,
            exclude_files: vec!["*.tmp".to_string()],
            exclude_dirs: Vec::new(),
        };

        save_config_to(&config, &path).expect("save");
        let raw = fs::read_to_string(&path).expect("read");
        assert!(raw.contains("output = \"html\""));
        assert_eq!(load_config_from(&path).expect("load"), config);
    }

    #[test]
    fn unknown_values_are_rejected() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "hash = \"crc32\"\n").expect("write");

        let err = load_config_from(&path).expect_err("must fail");
        assert!(format!("{err:#}").contains("failed to parse config file"));
    }
}
