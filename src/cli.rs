//! CLI definitions and entry point
//!
//! Every flag falls back to the `INPUTS_*` environment variable a GitHub
//! Action receives, then to the optional TOML config file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use release_builder::adapters::{GitRepository, LogReporter, MesonCli};
use release_builder::config::{ConfigError, FileConfig, ProjectConfig, parse_bool};
use release_builder::output::ActionOutputs;
use release_builder::Project;

/// release-builder - cut a release from the changelog
#[derive(Parser, Debug)]
#[command(
    name = "release-builder",
    version,
    about = "Cut a tagged release from a Keep-a-Changelog file",
    long_about = "Finds the newest changelog entry without a git tag, tags HEAD,\n\
                  builds zip and tar.gz archives with a sha256 manifest and\n\
                  pushes the tag. Does nothing when the newest entry is tagged."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// TOML file with default settings
    #[arg(long, env = "INPUTS_CONFIG")]
    pub config: Option<String>,

    /// Repository slug (org/name)
    #[arg(long, env = "INPUTS_SLUG")]
    pub slug: Option<String>,

    /// Local checkout root
    #[arg(long, env = "INPUTS_WORKSPACE")]
    pub workspace: Option<String>,

    /// Token used to push tags (optional with --dry-run)
    #[arg(long, env = "INPUTS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Prefix stripped from tags when naming archives
    #[arg(long, env = "INPUTS_TAG_PREFIX")]
    pub tag_prefix: Option<String>,

    /// Changelog path relative to the workspace
    #[arg(long, env = "INPUTS_CHANGELOG")]
    pub changelog: Option<String>,

    /// Artifact directory relative to the workspace
    #[arg(long, env = "INPUTS_ARTIFACT_DIR")]
    pub artifact_dir: Option<String>,

    /// Name of the sha256 manifest
    #[arg(long, env = "INPUTS_SHASUM_FILE")]
    pub shasum_file: Option<String>,

    /// Meson dependency name ("default" uses the repository name)
    #[arg(long, env = "INPUTS_MESON_PROVIDES")]
    pub meson_provides: Option<String>,

    /// Where to write the release notes
    #[arg(long, env = "INPUTS_NOTES_FILE")]
    pub notes_file: Option<String>,

    /// Forge URL used in download links
    #[arg(long, env = "GITHUB_SERVER_URL")]
    pub server_url: Option<String>,

    /// Examine only: "true" or "false"
    #[arg(
        long,
        env = "INPUTS_DRY_RUN",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub dry_run: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Path inputs arrive as strings so an empty `INPUTS_*` value means "unset"
fn non_empty_path(value: Option<String>) -> Option<PathBuf> {
    non_empty(value).map(PathBuf::from)
}

impl Cli {
    /// Merge flags/environment over the config file and defaults
    pub fn into_config(self, file: FileConfig) -> Result<ProjectConfig, ConfigError> {
        // Present but empty is still a value, and not a valid one
        let dry_run = match self.dry_run {
            Some(value) => parse_bool(&value)?,
            None => file.dry_run.unwrap_or(false),
        };
        let defaults = ProjectConfig::default();

        Ok(ProjectConfig {
            slug: non_empty(self.slug).or(file.slug).unwrap_or_default(),
            base_path: non_empty_path(self.workspace)
                .or(file.workspace)
                .unwrap_or(defaults.base_path),
            token: self.token.unwrap_or_default(),
            tag_prefix: non_empty(self.tag_prefix).or(file.tag_prefix).unwrap_or_default(),
            changelog_file: non_empty(self.changelog).or(file.changelog).unwrap_or_default(),
            artifact_dir: non_empty(self.artifact_dir).or(file.artifact_dir).unwrap_or_default(),
            checksum_file: non_empty(self.shasum_file).or(file.shasum_file).unwrap_or_default(),
            packaging_name: non_empty(non_empty(self.meson_provides).or(file.meson_provides)),
            notes_file: non_empty_path(self.notes_file)
                .or(file.notes_file)
                .unwrap_or(defaults.notes_file),
            release_date: defaults.release_date,
            server_url: non_empty(self.server_url)
                .or(file.server_url)
                .unwrap_or(defaults.server_url),
            dry_run,
        })
    }
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let file = match non_empty_path(cli.config.clone()) {
        Some(path) => FileConfig::load(&path).context("Error validating input")?,
        None => FileConfig::default(),
    };
    let config = cli.into_config(file).context("Error validating input")?;

    log::info!("BasePath:      '{}'", config.base_path.display());
    log::info!("ChangelogFile: '{}'", config.changelog_file);
    log::info!("DryRun:        {}", config.dry_run);

    let mut project = Project::new(config, GitRepository::open)
        .context("Error validating input")?
        .with_reporter(LogReporter)
        .with_packaging(MesonCli::default());

    project.examine_project().context("Error examining project")?;
    project.release().context("Error releasing")?;
    project
        .output_data(&mut ActionOutputs::from_env())
        .context("Error outputting")?;

    Ok(())
}
