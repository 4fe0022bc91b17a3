//! Run configuration
//!
//! A [`ProjectConfig`] is assembled once per run (CLI flags, environment
//! variables, an optional TOML file) and validated before the repository is
//! touched.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

/// Default release-notes file, relative to the process working directory
pub const DEFAULT_NOTES_FILE: &str = "release-notes.md";

/// Default forge used in download URLs
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Configuration errors, raised before any side effect
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required input is empty
    #[error("{0} must be specified")]
    MissingField(Field),

    /// The slug is not `org/name`
    #[error("the slug format is invalid: '{0}' invalid")]
    InvalidSlugFormat(String),

    /// A push credential is required outside dry-run mode
    #[error("token must be specified")]
    MissingToken,

    /// A boolean input is not `true` or `false`
    #[error("the string should be 'true' or 'false', got '{0}'")]
    InvalidBool(String),

    /// The config file could not be read
    #[error("unable to read config file '{}'", path.display())]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this tool
    #[error("unable to parse config file '{}'", path.display())]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },
}

/// Required inputs that can be missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Repository slug
    Slug,
    /// Changelog file
    Changelog,
    /// Artifact directory
    ArtifactDir,
    /// Checksum manifest name
    ShasumFile,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Slug => "repository",
            Self::Changelog => "changelog",
            Self::ArtifactDir => "artifact dir",
            Self::ShasumFile => "shasum-file",
        })
    }
}

/// `org/name` repository identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slug {
    /// Owner or organisation
    pub org: String,
    /// Repository name
    pub repo: String,
}

impl Slug {
    /// Parse `org/name`; exactly one `/` with text on both sides
    pub fn parse(slug: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidSlugFormat(slug.to_string());
        let (org, repo) = slug.split_once('/').ok_or_else(invalid)?;
        if org.is_empty() || repo.is_empty() || repo.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            org: org.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.repo)
    }
}

/// Parse a strict `"true"` / `"false"` flag
pub fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ConfigError::InvalidBool(other.to_string())),
    }
}

/// Validated inputs for one release run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Repository slug, `org/name`
    pub slug: String,
    /// Local checkout root
    pub base_path: PathBuf,
    /// Push credential; may be empty in dry-run mode
    pub token: String,
    /// Prefix stripped from tags when naming archives (e.g. `v`)
    pub tag_prefix: String,
    /// Changelog path relative to `base_path`
    pub changelog_file: String,
    /// Artifact directory relative to `base_path`
    pub artifact_dir: String,
    /// Checksum manifest file name
    pub checksum_file: String,
    /// Meson dependency name; enables the wrap file when set
    pub packaging_name: Option<String>,
    /// Where the release notes are written
    pub notes_file: PathBuf,
    /// Date used in the release name
    pub release_date: NaiveDate,
    /// Forge base URL for download links
    pub server_url: String,
    /// Examine only; never tag, archive, write or push
    pub dry_run: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            slug: String::new(),
            base_path: PathBuf::from("."),
            token: String::new(),
            tag_prefix: String::new(),
            changelog_file: String::new(),
            artifact_dir: String::new(),
            checksum_file: String::new(),
            packaging_name: None,
            notes_file: PathBuf::from(DEFAULT_NOTES_FILE),
            release_date: chrono::Utc::now().date_naive(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            dry_run: false,
        }
    }
}

impl ProjectConfig {
    /// Check required fields, slug shape and token presence
    ///
    /// Returns the parsed slug. Touches neither the filesystem nor git.
    pub fn validate(&self) -> Result<Slug, ConfigError> {
        let required = [
            (Field::Slug, &self.slug),
            (Field::Changelog, &self.changelog_file),
            (Field::ArtifactDir, &self.artifact_dir),
            (Field::ShasumFile, &self.checksum_file),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(ConfigError::MissingField(*field));
        }

        let slug = Slug::parse(&self.slug)?;

        if !self.dry_run && self.token.is_empty() {
            return Err(ConfigError::MissingToken);
        }

        Ok(slug)
    }

    /// Absolute-or-relative path of the changelog
    #[must_use]
    pub fn changelog_path(&self) -> PathBuf {
        self.base_path.join(&self.changelog_file)
    }

    /// Path of the artifact directory
    #[must_use]
    pub fn artifact_path(&self) -> PathBuf {
        self.base_path.join(&self.artifact_dir)
    }
}

/// Optional settings read from a TOML file
///
/// The token is deliberately absent; credentials come from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    /// Repository slug
    pub slug: Option<String>,
    /// Checkout root
    pub workspace: Option<PathBuf>,
    /// Tag prefix
    pub tag_prefix: Option<String>,
    /// Changelog path
    pub changelog: Option<String>,
    /// Artifact directory
    pub artifact_dir: Option<String>,
    /// Checksum manifest name
    pub shasum_file: Option<String>,
    /// Meson dependency name
    pub meson_provides: Option<String>,
    /// Release-notes path
    pub notes_file: Option<PathBuf>,
    /// Forge base URL
    pub server_url: Option<String>,
    /// Dry-run mode
    pub dry_run: Option<bool>,
}

impl FileConfig {
    /// Parse TOML text
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }
}
