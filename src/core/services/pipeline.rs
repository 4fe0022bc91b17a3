//! The release pipeline
//!
//! A [`Project`] runs three steps, once each and in order:
//!
//! 1. [`Project::examine_project`] parses the changelog and decides whether a
//!    release is due.
//! 2. [`Project::release`] tags HEAD, builds archives, writes checksums (and
//!    the Meson wrap file) and pushes the tag.
//! 3. [`Project::output_data`] writes the release notes and publishes named
//!    outputs for the CI job.
//!
//! Nothing is rolled back: a failure after tagging leaves the tag in place,
//! and the next run sees the tag and treats the release as already cut.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::changelog;
use crate::config::{ProjectConfig, Slug};
use crate::core::models::{
    ArchiveFormat, ArtifactSet, Changelog, NextRelease, Release, release_slug,
};
use crate::core::ports::{
    NotInstalled, OutputSink, PackagingTool, ReleaseVcs, Reporter, Silent, VcsError,
};
use crate::core::services::checksum;
use crate::core::services::meson::{self, MESON_MARKER, WrapFile};
use crate::error::{ReleaseError, Result};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Constructed and validated
    Initialized,
    /// Changelog read and tags compared
    Examined,
    /// Release step finished (or skipped)
    Released,
    /// Outputs published
    OutputEmitted,
}

/// Pick the release that is due, if any
///
/// Only the newest entry that is not `Unreleased` is considered. If it is
/// already tagged nothing is due; older entries are never released.
pub fn next_release<E>(
    releases: &[Release],
    mut tag_exists: impl FnMut(&str) -> std::result::Result<bool, E>,
) -> std::result::Result<NextRelease, E> {
    let Some(newest) = releases.iter().find(|r| !r.is_unreleased()) else {
        return Ok(NextRelease::NoReleaseDue);
    };

    if tag_exists(&newest.version)? {
        Ok(NextRelease::NoReleaseDue)
    } else {
        Ok(NextRelease::ReleaseDue(newest.clone()))
    }
}

/// One release run against one repository
pub struct Project<V> {
    config: ProjectConfig,
    slug: Slug,
    vcs: V,
    packaging: Box<dyn PackagingTool>,
    reporter: Box<dyn Reporter>,
    changelog: Option<Changelog>,
    next: NextRelease,
    stage: Stage,
}

impl<V: fmt::Debug> fmt::Debug for Project<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("config", &self.config)
            .field("slug", &self.slug)
            .field("vcs", &self.vcs)
            .field("next", &self.next)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl<V: ReleaseVcs> Project<V> {
    /// Validate `config`, then open the working copy with `open`
    ///
    /// Validation happens first, so a bad configuration never touches the
    /// repository.
    pub fn new(
        config: ProjectConfig,
        open: impl FnOnce(&Path) -> std::result::Result<V, VcsError>,
    ) -> Result<Self> {
        let slug = config.validate()?;
        let vcs = open(&config.base_path)
            .map_err(|e| ReleaseError::repository("open the repository", e))?;
        Ok(Self::assemble(config, slug, vcs))
    }

    /// Validate `config` and use an already opened gateway
    pub fn with_vcs(config: ProjectConfig, vcs: V) -> Result<Self> {
        let slug = config.validate()?;
        Ok(Self::assemble(config, slug, vcs))
    }

    fn assemble(config: ProjectConfig, slug: Slug, vcs: V) -> Self {
        Self {
            config,
            slug,
            vcs,
            packaging: Box::new(NotInstalled),
            reporter: Box::new(Silent),
            changelog: None,
            next: NextRelease::NoReleaseDue,
            stage: Stage::Initialized,
        }
    }

    /// Send progress messages to `reporter`
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Use `tool` for the build-system version check
    #[must_use]
    pub fn with_packaging(mut self, tool: impl PackagingTool + 'static) -> Self {
        self.packaging = Box::new(tool);
        self
    }

    /// The run's configuration
    pub const fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Parsed repository slug
    pub const fn slug(&self) -> &Slug {
        &self.slug
    }

    /// The version control gateway
    pub const fn vcs(&self) -> &V {
        &self.vcs
    }

    /// Parsed changelog, once examined
    pub const fn changelog(&self) -> Option<&Changelog> {
        self.changelog.as_ref()
    }

    /// The release decision
    pub const fn next_release(&self) -> &NextRelease {
        &self.next
    }

    /// Whether a release is due
    pub const fn found_new_release(&self) -> bool {
        self.next.is_due()
    }

    /// Current stage
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Archive base name for the due release
    pub fn release_slug(&self) -> Option<String> {
        self.next
            .due()
            .map(|r| release_slug(&self.slug.repo, &r.version, &self.config.tag_prefix))
    }

    fn report(&self, message: &str) {
        self.reporter.info(message);
    }

    fn require(&self, stage: Stage, step: &'static str, requires: &'static str) -> Result<()> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(ReleaseError::StepOrder { step, requires })
        }
    }

    /// Read the changelog and decide whether a release is due
    pub fn examine_project(&mut self) -> Result<&NextRelease> {
        self.require(Stage::Initialized, "examine_project", "construction")?;

        self.report(&format!("Processing the {} file.", self.config.changelog_file));
        let changelog = self.read_changelog()?;

        self.report("Examining the git repo tags.");
        let next = next_release(&changelog.releases, |tag| self.vcs.tag_exists(tag))
            .map_err(|e| ReleaseError::repository("process git repo", e))?;
        self.changelog = Some(changelog);

        match &next {
            NextRelease::NoReleaseDue => self.report("No new release found."),
            NextRelease::ReleaseDue(release) => self.examine_meson_project(release)?,
        }

        self.next = next;
        self.stage = Stage::Examined;
        Ok(&self.next)
    }

    fn read_changelog(&self) -> Result<Changelog> {
        let path = self.config.changelog_path();
        let file = File::open(&path)
            .map_err(|e| ReleaseError::io("open the changelog file found here", &path, e))?;
        changelog::from_reader(file).map_err(|source| ReleaseError::Changelog { path, source })
    }

    fn examine_meson_project(&self, release: &Release) -> Result<()> {
        let marker = self.config.base_path.join(MESON_MARKER);
        let found = marker
            .try_exists()
            .map_err(|e| ReleaseError::io("check for", &marker, e))?;
        if !found {
            return Ok(());
        }

        self.report("Examining the meson project.");
        let Some(declared) = self.packaging.declared_version(&self.config.base_path)? else {
            self.report("meson is not available; skipping the version check.");
            return Ok(());
        };

        self.report(&format!(
            "Validating that the release version in the meson.build file matches the version in {}.",
            self.config.changelog_file
        ));
        meson::check_version(
            Path::new(&self.config.changelog_file),
            &release.version,
            &self.config.tag_prefix,
            &declared,
        )
    }

    /// Tag, archive, checksum and push the due release
    ///
    /// Returns the produced artifacts, or `None` when nothing is due or the
    /// run is a dry run.
    pub fn release(&mut self) -> Result<Option<ArtifactSet>> {
        self.require(Stage::Examined, "release", "examine_project")?;

        let Some(release) = self.next.due().cloned() else {
            self.report("No new release found.");
            self.stage = Stage::Released;
            return Ok(None);
        };

        self.report(&format!("Preparing the release: {}.", release.version));

        if self.config.dry_run {
            self.report("This is a dry run, not tagging, archiving or pushing.");
            self.stage = Stage::Released;
            return Ok(None);
        }

        let artifacts = self.cut(&release)?;
        self.stage = Stage::Released;
        Ok(Some(artifacts))
    }

    fn cut(&self, release: &Release) -> Result<ArtifactSet> {
        let version = release.version.as_str();

        self.report("Tagging the repository.");
        self.vcs
            .tag_head(version, &format!("Releasing: {version}"))
            .map_err(|e| ReleaseError::repository(format!("tag HEAD as '{version}'"), e))?;

        self.report("Ensuring the artifact directory is present.");
        let dir = self.config.artifact_path();
        ensure_dir(&dir)?;

        let slug = release_slug(&self.slug.repo, version, &self.config.tag_prefix);

        self.report("Creating the zip archive.");
        let zip = self.archive(&slug, version, ArchiveFormat::Zip, &dir)?;
        self.report("Creating the tar.gz archive.");
        let tarball = self.archive(&slug, version, ArchiveFormat::TarGz, &dir)?;

        let wrap = match self.config.packaging_name.as_deref() {
            Some(configured) => {
                self.report("Generating the meson wrap file.");
                let source_hash = checksum::hash_hex(&tarball)?;
                let wrap = WrapFile {
                    slug: &slug,
                    repo: &self.slug,
                    version,
                    source_hash: &source_hash,
                    provides: meson::resolve_provides(configured, &self.slug.repo),
                    server_url: &self.config.server_url,
                };
                Some(wrap.write(&dir)?)
            },
            None => None,
        };

        self.report("Creating the sha256sum file.");
        let checksums = checksum::write_manifest(&dir, &self.config.checksum_file)?;

        self.report("Pushing the tags to the upstream repository.");
        self.vcs
            .push_tags(&self.config.token)
            .map_err(|e| ReleaseError::repository("push tags to origin", e))?;

        Ok(ArtifactSet {
            dir,
            zip,
            tarball,
            wrap,
            checksums,
        })
    }

    fn archive(&self, slug: &str, rev: &str, format: ArchiveFormat, dir: &Path) -> Result<PathBuf> {
        self.vcs
            .create_archive(slug, rev, format, dir)
            .map_err(|source| ReleaseError::Archive {
                format: format.to_string(),
                source,
            })
    }

    /// Write the release notes and publish outputs for the CI job
    ///
    /// With nothing due this emits nothing. In dry-run mode the notes file is
    /// not written but the outputs are still published.
    pub fn output_data(&mut self, sink: &mut dyn OutputSink) -> Result<()> {
        self.require(Stage::Released, "output_data", "release")?;

        let Some(release) = self.next.due() else {
            self.stage = Stage::OutputEmitted;
            return Ok(());
        };

        let notes_file = &self.config.notes_file;
        if !self.config.dry_run {
            let mut notes = release.notes().join("\n");
            notes.push('\n');
            std::fs::write(notes_file, notes)
                .map_err(|e| ReleaseError::io("write release notes to", notes_file, e))?;
        }

        let name = format!("{} {}", release.version, self.config.release_date.format("%Y-%m-%d"));
        let outputs = [
            ("release-tag", release.version.clone()),
            ("release-name", name),
            ("release-body-file", notes_file.display().to_string()),
            ("artifact-dir", self.config.artifact_dir.clone()),
        ];
        for (key, value) in &outputs {
            sink.set_output(key, value).map_err(|source| ReleaseError::Output {
                name: (*key).to_string(),
                source,
            })?;
        }

        self.stage = Stage::OutputEmitted;
        Ok(())
    }
}

/// Create `path` (and parents) unless it is already a directory
fn ensure_dir(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ReleaseError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => std::fs::create_dir_all(path)
            .map_err(|e| ReleaseError::io("make directory", path, e)),
        Err(e) => Err(ReleaseError::io("check directory", path, e)),
    }
}
