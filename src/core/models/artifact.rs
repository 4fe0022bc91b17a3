//! Release artifacts

use std::fmt;
use std::path::PathBuf;

/// Archive formats produced for every release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// `.zip`
    Zip,
    /// `.tar.gz`
    TarGz,
}

impl ArchiveFormat {
    /// File extension, also the `git archive --format` value
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Files written under the artifact directory by one release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    /// The artifact directory
    pub dir: PathBuf,
    /// `<slug>.zip`
    pub zip: PathBuf,
    /// `<slug>.tar.gz`
    pub tarball: PathBuf,
    /// Meson wrap file, when a packaging dependency is configured
    pub wrap: Option<PathBuf>,
    /// Checksum manifest
    pub checksums: PathBuf,
}

/// Archive base name: `<repo>-<version without tag prefix>`
#[must_use]
pub fn release_slug(repo_name: &str, version: &str, tag_prefix: &str) -> String {
    let bare = version.strip_prefix(tag_prefix).unwrap_or(version);
    format!("{repo_name}-{bare}")
}
