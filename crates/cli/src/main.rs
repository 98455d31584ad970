mod logging;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use filetools_core::{
    analyze_directory, app_paths, find_duplicates, load_config, parse_exclusions,
    parse_sed_expression, plan_renames, save_config, AppConfig, ExclusionMatcher,
    ExclusionTarget, Flag, HashAlgorithm, Metadata, OutputFormat, RenameOptions,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "filetools", version)]
#[command(about = "Directory statistics, duplicate detection and sed-style bulk renaming")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// text, json, xml or html
    #[arg(short, long, global = true)]
    output: Option<String>,
    #[arg(short, long, global = true)]
    json: bool,
    #[arg(short = 'x', long, global = true)]
    xml: bool,
    #[arg(short = 'w', long, global = true)]
    html: bool,
    /// Write the report to this file instead of stdout
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,
    /// Comma-separated file patterns to skip (`*.log`, `*.*`)
    #[arg(long, global = true)]
    exclude_file: Option<String>,
    /// Comma-separated directory patterns to skip (`.git`, `node_modules`)
    #[arg(long, global = true)]
    exclude_dir: Option<String>,
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Summarise file counts and sizes by extension and subdirectory
    Dirstat(DirstatArgs),
    /// Find files with identical content
    Dupfind(DupfindArgs),
    /// Rename files with a sed substitution (dry run unless --force)
    Rename(RenameArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct DirstatArgs {
    #[arg(default_value = ".")]
    dir: PathBuf,
}

#[derive(Debug, Args)]
struct DupfindArgs {
    #[arg(default_value = ".")]
    dir: PathBuf,
    /// md5, sha1 or sha256
    #[arg(short = 'H', long)]
    hash: Option<String>,
}

#[derive(Debug, Args)]
struct RenameArgs {
    #[arg(default_value = ".")]
    dir: PathBuf,
    /// Glob matched against file names, e.g. `*.jpg`
    #[arg(long = "match")]
    match_pattern: String,
    /// Substitution such as `s/IMG_/photo_/g`
    #[arg(long)]
    sed: String,
    /// Perform the renames and overwrite existing targets
    #[arg(long)]
    force: bool,
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    /// Write a config file with the default settings
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.global.verbose)?;

    let config = load_config()?;
    debug!(?config, "loaded config");

    match cli.command {
        Commands::Dirstat(args) => cmd_dirstat(&cli.global, &config, args),
        Commands::Dupfind(args) => cmd_dupfind(&cli.global, &config, args),
        Commands::Rename(args) => cmd_rename(&cli.global, &config, args),
        Commands::Config(config_args) => match config_args.action {
            ConfigAction::Show => cmd_config_show(&config),
            ConfigAction::Init { force } => cmd_config_init(force),
        },
    }
}

fn cmd_dirstat(global: &GlobalArgs, config: &AppConfig, args: DirstatArgs) -> Result<()> {
    let (file_matchers, dir_matchers) = exclusion_matchers(global, config);
    let format = output_format(global, config);

    let mut result = analyze_directory(&args.dir, &file_matchers, &dir_matchers)?;
    result.metadata = Some(run_metadata("dirstat", Vec::new(), global, format));

    write_report(global, |out| format.write_dirstat(&result, out))
}

fn cmd_dupfind(global: &GlobalArgs, config: &AppConfig, args: DupfindArgs) -> Result<()> {
    let (file_matchers, dir_matchers) = exclusion_matchers(global, config);
    let format = output_format(global, config);
    let algorithm = match &args.hash {
        Some(name) => name.parse::<HashAlgorithm>()?,
        None => config.hash,
    };

    let mut result = find_duplicates(&args.dir, algorithm, &file_matchers, &dir_matchers)?;
    let flags = vec![Flag::new("hash", algorithm.as_str())];
    result.metadata = Some(run_metadata("dupfind", flags, global, format));

    write_report(global, |out| format.write_duplicates(&result, out))
}

fn cmd_rename(global: &GlobalArgs, config: &AppConfig, args: RenameArgs) -> Result<()> {
    let sed = parse_sed_expression(&args.sed)?;
    let (file_matchers, dir_matchers) = exclusion_matchers(global, config);
    let format = output_format(global, config);

    let mut options = RenameOptions::new(&args.dir, &args.match_pattern, sed);
    options.dry_run = !args.force;
    options.force_overwrite = args.force;
    options.file_matchers = file_matchers;
    options.dir_matchers = dir_matchers;

    let mut result = plan_renames(&options)?;
    let flags = vec![
        Flag::new("match", args.match_pattern.as_str()),
        Flag::new("sed", args.sed.as_str()),
        Flag::new("dry-run", options.dry_run.to_string()),
    ];
    result.metadata = Some(run_metadata("rename", flags, global, format));

    write_report(global, |out| format.write_rename(&result, out))
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let paths = app_paths()?;
    println!("Config file: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn cmd_config_init(force: bool) -> Result<()> {
    let paths = app_paths()?;
    if paths.config_path.exists() && !force {
        anyhow::bail!(
            "config file already exists: {} (use --force to replace it)",
            paths.config_path.display()
        );
    }
    save_config(&AppConfig::default())?;
    println!("Wrote {}", paths.config_path.display());
    Ok(())
}

/// Shortcut flags beat `--output`, which beats the config file.
fn output_format(global: &GlobalArgs, config: &AppConfig) -> OutputFormat {
    if global.json {
        OutputFormat::Json
    } else if global.xml {
        OutputFormat::Xml
    } else if global.html {
        OutputFormat::Html
    } else if let Some(name) = &global.output {
        OutputFormat::from_name(name)
    } else {
        config.output
    }
}

fn exclusion_matchers(
    global: &GlobalArgs,
    config: &AppConfig,
) -> (Vec<ExclusionMatcher>, Vec<ExclusionMatcher>) {
    let files = merge_patterns(&config.exclude_files, global.exclude_file.as_deref());
    let dirs = merge_patterns(&config.exclude_dirs, global.exclude_dir.as_deref());
    (
        parse_exclusions(&files, ExclusionTarget::Files),
        parse_exclusions(&dirs, ExclusionTarget::Dirs),
    )
}

fn merge_patterns(configured: &[String], flag: Option<&str>) -> String {
    configured
        .iter()
        .map(String::as_str)
        .chain(flag)
        .collect::<Vec<_>>()
        .join(",")
}

fn run_metadata(
    sub_command: &str,
    mut flags: Vec<Flag>,
    global: &GlobalArgs,
    format: OutputFormat,
) -> Metadata {
    flags.push(Flag::new("output", format.as_str()));
    if let Some(file) = &global.file {
        flags.push(Flag::new("file", file.display().to_string()));
    }
    if let Some(patterns) = &global.exclude_file {
        flags.push(Flag::new("exclude-file", patterns.as_str()));
    }
    if let Some(patterns) = &global.exclude_dir {
        flags.push(Flag::new("exclude-dir", patterns.as_str()));
    }

    Metadata::new(sub_command, flags)
}

fn write_report<F>(global: &GlobalArgs, render: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let mut out: Box<dyn Write> = match &global.file {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("failed to create output file: {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    render(out.as_mut()).context("failed to write report")?;
    out.flush().context("failed to flush report")?;
    Ok(())
}
