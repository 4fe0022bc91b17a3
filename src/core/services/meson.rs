//! Meson packaging support
//!
//! Writes the wrap file other Meson projects use to pull the released
//! tarball as a subproject, and validates that `meson.build` declares the
//! version being released.

use std::path::{Path, PathBuf};

use crate::config::Slug;
use crate::error::{ReleaseError, Result};

/// Build marker whose presence enables the Meson version check
pub const MESON_MARKER: &str = "meson.build";

/// Dependency name meaning "use the repository name"
pub const DEFAULT_PROVIDES: &str = "default";

/// Everything needed to render a wrap file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapFile<'a> {
    /// Archive base name (`<repo>-<version>`)
    pub slug: &'a str,
    /// Repository slug used in the download URL
    pub repo: &'a Slug,
    /// Release tag
    pub version: &'a str,
    /// Lowercase hex SHA-256 of the tarball
    pub source_hash: &'a str,
    /// Dependency name exposed through `[provide]`
    pub provides: &'a str,
    /// Forge base URL, e.g. `https://github.com`
    pub server_url: &'a str,
}

impl WrapFile<'_> {
    /// Render the wrap-file text
    #[must_use]
    pub fn render(&self) -> String {
        let server = self.server_url.trim_end_matches('/');
        format!(
            "[wrap-file]\n\
             directory = {slug}\n\
             \n\
             source_filename = {slug}.tar.gz\n\
             source_url = {server}/{repo}/releases/download/{version}/{slug}.tar.gz\n\
             source_hash = {hash}\n\
             \n\
             [provide]\n\
             lib{provides} = lib{provides}_dep\n",
            slug = self.slug,
            repo = self.repo,
            version = self.version,
            hash = self.source_hash,
            provides = self.provides,
        )
    }

    /// Write `<dir>/<provides>.wrap`
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.wrap", self.provides));
        std::fs::write(&path, self.render())
            .map_err(|e| ReleaseError::io("create file", &path, e))?;
        Ok(path)
    }
}

/// Resolve the configured dependency name, mapping the sentinel to `repo_name`
#[must_use]
pub fn resolve_provides<'a>(configured: &'a str, repo_name: &'a str) -> &'a str {
    if configured.is_empty() || configured.eq_ignore_ascii_case(DEFAULT_PROVIDES) {
        repo_name
    } else {
        configured
    }
}

/// Check the Meson-declared version against the changelog version
///
/// `declared` is the raw version from `meson introspect`; the tag prefix is
/// added before comparing.
pub fn check_version(
    changelog: &Path,
    expected: &str,
    tag_prefix: &str,
    declared: &str,
) -> Result<()> {
    let declared = format!("{tag_prefix}{declared}");
    if declared == expected {
        return Ok(());
    }
    Err(ReleaseError::VersionMismatch {
        changelog: changelog.to_path_buf(),
        expected: expected.to_string(),
        declared,
    })
}
